//! Tokenizer for the template syntax.
//!
//! The lexer has two modes. In [`Mode::Text`] everything is literal except
//! `$` sequences; in [`Mode::Argument`] (inside `$( ... )`) whitespace
//! separates arguments, `)` closes the call and quotes delimit nested text.

/// Which rules to tokenize with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Text,
    Argument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, or a bare word in argument mode.
    Text(String),
    /// `$name` or `${name}`.
    Placeholder(String),
    /// `$(`
    CallOpen,
    /// `)` in argument mode.
    CallClose,
    /// A run of whitespace in argument mode.
    Space,
    /// Raw contents of a quoted argument.
    Quoted(String),
    End,
}

pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
}

fn is_identifier(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.position..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume characters while `predicate` holds.
    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|&(_, c)| !predicate(c))
            .map_or(rest.len(), |(i, _)| i);
        self.position += end;
        &rest[..end]
    }

    pub fn next_token(&mut self, mode: Mode) -> Token {
        let Some(c) = self.peek_char() else {
            return Token::End;
        };

        if c == '$' {
            return self.dollar();
        }

        match mode {
            Mode::Text => Token::Text(self.take_while(|c| c != '$').to_string()),
            Mode::Argument => match c {
                ')' => {
                    self.position += 1;
                    Token::CallClose
                }
                '\'' | '"' => self.quoted(c),
                c if c.is_whitespace() => {
                    self.take_while(char::is_whitespace);
                    Token::Space
                }
                _ => Token::Text(
                    self.take_while(|c| {
                        !c.is_whitespace() && !matches!(c, ')' | '$' | '\'' | '"')
                    })
                    .to_string(),
                ),
            },
        }
    }

    /// Name of a call, read raw up to whitespace or `)`.
    pub fn call_head(&mut self) -> String {
        self.take_while(|c| !c.is_whitespace() && c != ')').to_string()
    }

    fn dollar(&mut self) -> Token {
        self.position += 1;
        match self.peek_char() {
            Some('$') => {
                self.position += 1;
                Token::Text("$".to_string())
            }
            Some('(') => {
                self.position += 1;
                Token::CallOpen
            }
            Some('{') => {
                let rest = &self.rest()[1..];
                match rest.find('}') {
                    Some(end) => {
                        self.position += end + 2;
                        Token::Placeholder(rest[..end].to_string())
                    }
                    None => Token::Text("$".to_string()),
                }
            }
            Some(c) if is_identifier(c) => Token::Placeholder(self.take_while(is_identifier).to_string()),
            _ => Token::Text("$".to_string()),
        }
    }

    fn quoted(&mut self, quote: char) -> Token {
        self.position += quote.len_utf8();
        let contents = self.take_while(|c| c != quote).to_string();
        if self.peek_char() == Some(quote) {
            self.position += quote.len_utf8();
        }
        Token::Quoted(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str, mode: Mode) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            match lexer.next_token(mode) {
                Token::End => break,
                token => tokens.push(token),
            }
        }
        tokens
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn test_text_mode() {
        assert_eq!(
            tokens("a $$b $name, ${long name}) $(x $", Mode::Text),
            vec![
                text("a "),
                text("$"),
                text("b "),
                Token::Placeholder("name".to_string()),
                text(", "),
                Token::Placeholder("long name".to_string()),
                text(") "),
                Token::CallOpen,
                text("x "),
                text("$"),
            ]
        );
    }

    #[test]
    fn test_unclosed_brace_is_literal() {
        assert_eq!(tokens("${oops", Mode::Text), vec![text("$"), text("{oops")]);
    }

    #[test]
    fn test_argument_mode() {
        assert_eq!(
            tokens("red  'hello $x' \"a b\"$y)z", Mode::Argument),
            vec![
                text("red"),
                Token::Space,
                Token::Quoted("hello $x".to_string()),
                Token::Space,
                Token::Quoted("a b".to_string()),
                Token::Placeholder("y".to_string()),
                Token::CallClose,
                text("z"),
            ]
        );
    }

    #[test]
    fn test_call_head() {
        let mut lexer = Lexer::new("$relay.name arg)");
        assert_eq!(lexer.call_head(), "$relay.name");
        assert_eq!(lexer.next_token(Mode::Argument), Token::Space);
        assert_eq!(lexer.next_token(Mode::Argument), text("arg"));
        assert_eq!(lexer.next_token(Mode::Argument), Token::CallClose);
        assert_eq!(lexer.next_token(Mode::Argument), Token::End);
    }

    #[test]
    fn test_unicode_text() {
        assert_eq!(tokens("è$x", Mode::Text), vec![text("è"), Token::Placeholder("x".to_string())]);
    }
}
