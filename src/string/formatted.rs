//! The formatted string container.

use std::collections::HashMap;
use std::ops::{Add, AddAssign, Index, RangeBounds};

use super::element::Element;
use super::encoding::split_utf8;

/// Resolves `$(target.method args)` calls against an object owned by the caller.
///
/// Returning `None` leaves the call unbound; unbound calls render empty.
pub trait MethodResolver {
    fn call(&self, target: &str, method: &str, arguments: &[FormattedString])
        -> Option<FormattedString>;
}

/// An ordered sequence of [`Element`]s.
///
/// This is a plain value: `clone()` is a deep copy, so a template can be
/// cloned per recipient and bound without affecting the original.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormattedString {
    elements: Vec<Element>,
}

impl FormattedString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Element> {
        self.elements.iter_mut()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn first(&self) -> Option<&Element> {
        self.elements.first()
    }

    pub fn last(&self) -> Option<&Element> {
        self.elements.last()
    }

    /// Append a single element.
    pub fn push(&mut self, element: impl Into<Element>) -> &mut Self {
        self.elements.push(element.into());
        self
    }

    /// Append text, splitting it into ASCII runs and Unicode elements.
    ///
    /// ASCII is merged into a trailing ASCII run, so runs stay maximal.
    pub fn push_str(&mut self, text: &str) -> &mut Self {
        for element in split_utf8(text) {
            match (self.elements.last_mut(), element) {
                (Some(Element::Ascii(run)), Element::Ascii(more)) => run.push_str(&more),
                (_, element) => self.elements.push(element),
            }
        }
        self
    }

    /// Append every element of `other`.
    pub fn append(&mut self, other: FormattedString) -> &mut Self {
        self.elements.extend(other.elements);
        self
    }

    pub fn insert(&mut self, index: usize, element: impl Into<Element>) {
        let index = index.min(self.elements.len());
        self.elements.insert(index, element.into());
    }

    /// Insert all elements of `other` at `index`.
    pub fn insert_all(&mut self, index: usize, other: FormattedString) {
        let index = index.min(self.elements.len());
        self.elements.splice(index..index, other.elements);
    }

    pub fn remove(&mut self, index: usize) -> Option<Element> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }

    /// Remove the elements in `range`.
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) {
        self.elements.drain(range);
    }

    pub fn drain<R: RangeBounds<usize>>(&mut self, range: R) -> std::vec::Drain<'_, Element> {
        self.elements.drain(range)
    }

    /// Copy of the elements in `start..end`, clamped to the string bounds.
    pub fn slice(&self, start: usize, end: usize) -> FormattedString {
        let end = end.min(self.elements.len());
        let start = start.min(end);
        self.elements[start..end].iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Join `items` with `separator` between each pair.
    pub fn implode<I>(separator: &FormattedString, items: I) -> FormattedString
    where
        I: IntoIterator<Item = FormattedString>,
    {
        let mut result = FormattedString::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                result.elements.extend(separator.elements.iter().cloned());
            }
            result.append(item);
        }
        result
    }

    /// Visit every element, descending into nested strings.
    ///
    /// The visitor sees a parent before its children.
    pub fn walk_mut(&mut self, visitor: &mut dyn FnMut(&mut Element)) {
        for element in &mut self.elements {
            visitor(element);
            for nested in element.nested_mut() {
                nested.walk_mut(visitor);
            }
        }
    }

    /// Visit every element, descending into nested strings.
    pub fn walk(&self, visitor: &mut dyn FnMut(&Element)) {
        for element in &self.elements {
            visitor(element);
            for nested in element.nested() {
                nested.walk(visitor);
            }
        }
    }

    /// Bind every placeholder called `name` to `value`.
    pub fn replace(&mut self, name: &str, value: impl Into<FormattedString>) -> &mut Self {
        let value = value.into();
        self.walk_mut(&mut |element| {
            if let Element::Placeholder(placeholder) = element {
                if placeholder.name() == name {
                    placeholder.bind(value.clone());
                }
            }
        });
        self
    }

    /// Bind every placeholder whose name is a key of `values`.
    pub fn replace_all(&mut self, values: &HashMap<String, FormattedString>) -> &mut Self {
        self.walk_mut(&mut |element| {
            if let Element::Placeholder(placeholder) = element {
                if let Some(value) = values.get(placeholder.name()) {
                    placeholder.bind(value.clone());
                }
            }
        });
        self
    }

    /// Copy of this string with `name` bound to `value`.
    pub fn replaced(&self, name: &str, value: impl Into<FormattedString>) -> FormattedString {
        let mut copy = self.clone();
        copy.replace(name, value);
        copy
    }

    /// Resolve every method call through `resolver`.
    ///
    /// Arguments are bound before the call, so a call's own arguments may
    /// contain other method calls.
    pub fn bind_methods(&mut self, resolver: &dyn MethodResolver) -> &mut Self {
        for element in &mut self.elements {
            for nested in element.nested_mut() {
                nested.bind_methods(resolver);
            }
            if let Element::MethodCall(call) = element {
                if let Some(result) = resolver.call(&call.target, &call.method, &call.arguments) {
                    call.bind(result);
                }
            }
        }
        self
    }

    /// Names of all placeholders, in order of appearance, without duplicates.
    pub fn placeholder_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        self.walk(&mut |element| {
            if let Element::Placeholder(placeholder) = element {
                if !names.iter().any(|name| name == placeholder.name()) {
                    names.push(placeholder.name().to_string());
                }
            }
        });
        names
    }
}

impl From<&str> for FormattedString {
    fn from(text: &str) -> Self {
        let mut string = FormattedString::new();
        string.push_str(text);
        string
    }
}

impl From<String> for FormattedString {
    fn from(text: String) -> Self {
        FormattedString::from(text.as_str())
    }
}

impl From<&String> for FormattedString {
    fn from(text: &String) -> Self {
        FormattedString::from(text.as_str())
    }
}

impl From<Element> for FormattedString {
    fn from(element: Element) -> Self {
        Self {
            elements: vec![element],
        }
    }
}

impl From<Vec<Element>> for FormattedString {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

impl FromIterator<Element> for FormattedString {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Extend<Element> for FormattedString {
    fn extend<I: IntoIterator<Item = Element>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl IntoIterator for FormattedString {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a FormattedString {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Index<usize> for FormattedString {
    type Output = Element;

    fn index(&self, index: usize) -> &Element {
        &self.elements[index]
    }
}

impl Add for FormattedString {
    type Output = FormattedString;

    fn add(mut self, rhs: FormattedString) -> FormattedString {
        self.append(rhs);
        self
    }
}

impl Add<&str> for FormattedString {
    type Output = FormattedString;

    fn add(mut self, rhs: &str) -> FormattedString {
        self.push_str(rhs);
        self
    }
}

impl AddAssign for FormattedString {
    fn add_assign(&mut self, rhs: FormattedString) {
        self.append(rhs);
    }
}

impl AddAssign<&str> for FormattedString {
    fn add_assign(&mut self, rhs: &str) {
        self.push_str(rhs);
    }
}
