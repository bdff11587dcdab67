//! Recursive descent parser for the template syntax.
//!
//! Parsing never fails: malformed input degrades to literal text, and a
//! call cut short by the end of input is dropped.

use tracing::debug;

use crate::formatters::darkplaces::color_for_digit;
use crate::string::{
    Color12, Conditional, Element, FilterCall, FormatFlags, FormattedString, Loop, MethodCall,
    Placeholder,
};

use super::lexer::{Lexer, Mode, Token};

/// Parse template source into a formatted string.
pub fn parse(source: &str) -> FormattedString {
    Parser::new(source).parse()
}

/// Block keywords that end the body of an enclosing block.
#[derive(Debug, Clone, PartialEq)]
enum Terminator {
    Else,
    ElseIf(FormattedString),
    EndIf,
    EndFor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    If,
    For,
}

impl Terminator {
    fn closes(&self, block: Block) -> bool {
        match self {
            Terminator::Else | Terminator::ElseIf(_) | Terminator::EndIf => block == Block::If,
            Terminator::EndFor => block == Block::For,
        }
    }
}

/// Outcome of parsing one `$( ... )`.
enum Call {
    /// The element, plus a terminator it ran into if it was an unterminated block.
    Element(Element, Option<Terminator>),
    Terminator(Terminator),
    /// Cut short by the end of input.
    Abandoned,
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Blocks whose body is being parsed, innermost last.
    blocks: Vec<Block>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            blocks: Vec::new(),
        }
    }

    pub fn parse(mut self) -> FormattedString {
        let (output, _) = self.parse_text();
        output
    }

    /// Whether a terminator belongs to a block that is currently open.
    fn is_open(&self, terminator: &Terminator) -> bool {
        self.blocks.iter().any(|block| terminator.closes(*block))
    }

    /// Text mode up to the end of input or a terminator of an open block.
    fn parse_text(&mut self) -> (FormattedString, Option<Terminator>) {
        let mut output = FormattedString::new();
        loop {
            match self.lexer.next_token(Mode::Text) {
                Token::End => return (output, None),
                Token::Text(text) => {
                    output.push_str(&text);
                }
                Token::Placeholder(name) => {
                    output.push(Placeholder::new(name));
                }
                Token::CallOpen => match self.parse_call(false) {
                    Call::Element(element, leftover) => {
                        output.push(element);
                        if leftover.is_some() {
                            return (output, leftover);
                        }
                    }
                    Call::Terminator(terminator) => {
                        if self.is_open(&terminator) {
                            return (output, Some(terminator));
                        }
                        debug!(?terminator, "Dropping block terminator with no open block");
                    }
                    Call::Abandoned => {}
                },
                // Only produced in argument mode
                Token::CallClose | Token::Space | Token::Quoted(_) => {}
            }
        }
    }

    /// Arguments up to the closing `)`, `None` if the input ends first.
    fn parse_arguments(&mut self) -> Option<Vec<FormattedString>> {
        let mut arguments = Vec::new();
        let mut current = FormattedString::new();
        let mut started = false;

        loop {
            match self.lexer.next_token(Mode::Argument) {
                Token::End => return None,
                Token::CallClose => {
                    if started {
                        arguments.push(current);
                    }
                    return Some(arguments);
                }
                Token::Space => {
                    if started {
                        arguments.push(std::mem::take(&mut current));
                        started = false;
                    }
                }
                Token::Text(text) => {
                    current.push_str(&text);
                    started = true;
                }
                Token::Quoted(raw) => {
                    current.append(parse(&raw));
                    started = true;
                }
                Token::Placeholder(name) => {
                    current.push(Placeholder::new(name));
                    started = true;
                }
                Token::CallOpen => {
                    match self.parse_call(true) {
                        Call::Element(element, _) => {
                            current.push(element);
                        }
                        Call::Terminator(_) => {}
                        Call::Abandoned => return None,
                    }
                    started = true;
                }
            }
        }
    }

    /// Everything after `$(`.
    fn parse_call(&mut self, in_argument: bool) -> Call {
        let head = self.lexer.call_head();
        let Some(mut arguments) = self.parse_arguments() else {
            debug!(call = %head, "Dropping call not closed before end of input");
            return Call::Abandoned;
        };

        if let Some(letters) = head.strip_prefix('-') {
            return Call::Element(format_element(letters), None);
        }

        if let Some(reference) = head.strip_prefix('$') {
            let element = match reference.rsplit_once('.') {
                Some((target, method)) => MethodCall::new(target, method, arguments).into(),
                None => Placeholder::new(reference).into(),
            };
            return Call::Element(element, None);
        }

        if arguments.is_empty() {
            if let Some(color) = parse_color(&head) {
                return Call::Element(Element::Color(color), None);
            }
        }

        if head == "if" && arguments.len() > 1 {
            return Call::Element(FilterCall::new("ifeq", arguments).into(), None);
        }

        if in_argument {
            return Call::Element(FilterCall::new(head, arguments).into(), None);
        }

        match head.as_str() {
            "if" => {
                let condition = arguments.pop().unwrap_or_default();
                let (conditional, leftover) = self.parse_if(condition);
                Call::Element(conditional.into(), leftover)
            }
            "for" => {
                let mut arguments = arguments.into_iter();
                let variable = arguments.next().map(|v| v.to_plain()).unwrap_or_default();
                let source = arguments.fold(FormattedString::new(), |source, arg| source + arg);
                let (lp, leftover) = self.parse_for(variable, source);
                Call::Element(lp.into(), leftover)
            }
            "else" => {
                let is_else_if = arguments.first().map_or(false, |a| a.to_plain() == "if");
                if is_else_if && arguments.len() > 1 {
                    Call::Terminator(Terminator::ElseIf(arguments.swap_remove(1)))
                } else {
                    Call::Terminator(Terminator::Else)
                }
            }
            "endif" => Call::Terminator(Terminator::EndIf),
            "endfor" => Call::Terminator(Terminator::EndFor),
            _ => Call::Element(FilterCall::new(head, arguments).into(), None),
        }
    }

    /// Body of an `if`, following `else if` chains.
    fn parse_if(&mut self, condition: FormattedString) -> (Conditional, Option<Terminator>) {
        self.blocks.push(Block::If);
        let (if_true, terminator) = self.parse_text();
        self.blocks.pop();

        let mut if_false = FormattedString::new();
        let leftover = match terminator {
            None | Some(Terminator::EndIf) => None,
            Some(Terminator::ElseIf(condition)) => {
                let (nested, leftover) = self.parse_if(condition);
                if_false.push(nested);
                leftover
            }
            Some(Terminator::Else) => {
                self.blocks.push(Block::If);
                let leftover = loop {
                    let (body, terminator) = self.parse_text();
                    if_false.append(body);
                    match terminator {
                        None | Some(Terminator::EndIf) => break None,
                        Some(Terminator::Else) | Some(Terminator::ElseIf(_)) => {
                            debug!("Ignoring else after else");
                        }
                        Some(other) => break Some(other),
                    }
                };
                self.blocks.pop();
                leftover
            }
            Some(other) => Some(other),
        };

        (Conditional::new(condition, if_true, if_false), leftover)
    }

    fn parse_for(&mut self, variable: String, source: FormattedString) -> (Loop, Option<Terminator>) {
        self.blocks.push(Block::For);
        let (body, terminator) = self.parse_text();
        self.blocks.pop();

        let leftover = match terminator {
            None | Some(Terminator::EndFor) => None,
            // belongs to an enclosing block, which ends this one too
            Some(other) => Some(other),
        };
        (Loop::new(variable, source, body), leftover)
    }
}

/// `$(-bui)` style flags, `$(-n)` for none; `$(-)` clears formatting.
fn format_element(letters: &str) -> Element {
    if letters.is_empty() {
        return Element::ClearFormatting;
    }
    let mut flags = FormatFlags::empty();
    for letter in letters.chars() {
        match letter {
            'b' => flags |= FormatFlags::BOLD,
            'u' => flags |= FormatFlags::UNDERLINE,
            'i' => flags |= FormatFlags::ITALIC,
            _ => {}
        }
    }
    Element::Format(flags)
}

/// Color call names: `nocolor`, a palette digit, `xRGB`/`xRRGGBB` or a color name.
fn parse_color(name: &str) -> Option<Color12> {
    if name == "nocolor" {
        return Some(Color12::NOCOLOR);
    }

    let mut chars = name.chars();
    if let (Some(digit), None) = (chars.next(), chars.next()) {
        if digit.is_ascii_digit() {
            return Some(color_for_digit(digit));
        }
    }

    if let Some(hex) = name.strip_prefix('x') {
        let color = Color12::from_hex(hex);
        if color.is_valid() {
            return Some(color);
        }
    }

    let color = Color12::from_name(name);
    color.is_valid().then_some(color)
}
