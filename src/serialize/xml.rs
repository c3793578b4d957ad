//! XML text adapter
//!
//! Converts between `Element` trees and XML text with quick-xml. The engine
//! itself only ever sees `Element`s.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{DawError, Result};
use crate::serialize::Element;

/// Options for rendering XML text
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// Spaces per nesting level; 0 writes everything on one line
    pub indent: usize,
    /// Emit the `<?xml ...?>` declaration
    pub declaration: bool,
}

impl WriteOptions {
    pub const DEFAULT_INDENT: usize = 2;

    pub fn compact() -> Self {
        Self {
            indent: 0,
            declaration: false,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: Self::DEFAULT_INDENT,
            declaration: true,
        }
    }
}

/// Parse XML text into an element tree. Whitespace-only text is dropped.
pub fn parse(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(DawError::xml)? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DawError::xml("closing tag without an open element"))?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(DawError::xml)?;
                if !value.trim().is_empty() {
                    append_text(&mut stack, &value);
                }
            }
            Event::CData(data) => {
                let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                append_text(&mut stack, &value);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(DawError::xml("unexpected end of document"));
    }
    root.ok_or_else(|| DawError::xml("document has no root element"))
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(DawError::xml)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(DawError::xml)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn close_element(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(DawError::xml("more than one root element")),
    }
    Ok(())
}

fn append_text(stack: &mut [Element], value: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.get_or_insert_with(String::new).push_str(value);
    }
}

/// Render an element tree as XML text.
pub fn render(root: &Element, options: &WriteOptions) -> Result<String> {
    let mut writer = if options.indent > 0 {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', options.indent)
    } else {
        Writer::new(Cursor::new(Vec::new()))
    };

    if options.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(DawError::xml)?;
    }
    write_element(&mut writer, root)?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(DawError::xml)
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(DawError::xml);
    }

    writer.write_event(Event::Start(start)).map_err(DawError::xml)?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(DawError::xml)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(DawError::xml)
}
