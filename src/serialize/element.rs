//! Element tree boundary type

use crate::error::{DawError, Result};

/// One node of a parsed or rendered document: tag, ordered attributes,
/// ordered children and optional text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attr(&self, key: &str) -> Result<&str> {
        self.attr(key)
            .ok_or_else(|| DawError::missing(&self.name, key))
    }

    /// Set an attribute, replacing an existing one with the same key.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Set an attribute only when a value is present.
    pub fn set_opt_attr(&mut self, key: &str, value: Option<String>) {
        if let Some(value) = value {
            self.set_attr(key, value);
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given tag
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn required_child(&self, name: &str) -> Result<&Element> {
        self.child(name)
            .ok_or_else(|| DawError::missing(&self.name, name))
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Fail unless this element has the expected tag.
    pub fn expect_name(&self, expected: &str) -> Result<()> {
        if self.name == expected {
            Ok(())
        } else {
            Err(DawError::UnexpectedElement {
                expected: expected.to_string(),
                found: self.name.clone(),
            })
        }
    }

    /// Copy with attributes sorted by key at every level, for comparisons
    /// that ignore attribute order.
    pub fn normalized(&self) -> Element {
        let mut attributes = self.attributes.clone();
        attributes.sort();
        Element {
            name: self.name.clone(),
            attributes,
            children: self.children.iter().map(Element::normalized).collect(),
            text: self.text.clone(),
        }
    }

    /// Total number of elements in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Element::count).sum::<usize>()
    }
}
