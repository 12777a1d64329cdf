//! Minimal owned XML element tree.
//!
//! lshw documents are small, so the whole document is materialized and
//! queried by walking the tree. Names, attributes and text are decoded with
//! the encoding from the XML declaration (UTF-8 when there is none).

use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// An XML element with its attributes, child elements and text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Concatenated, trimmed text content directly inside this element
    pub text: String,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, decoder: Decoder) -> Result<Self> {
        let name = decode(decoder, start.name().as_ref())?;
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::MalformedXml(e.to_string()))?;
            let key = decode(decoder, attr.key.as_ref())?;
            let raw = decode(decoder, &attr.value)?;
            let value = unescape(&raw)
                .map_err(|e| Error::MalformedXml(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    /// Value of an attribute
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct children with the given name, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants (excluding `self`) in document order
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut pending: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(el) = pending.pop() {
            out.push(el);
            pending.extend(el.children.iter().rev());
        }
        out
    }

    /// Descendants with the given name, in document order
    pub fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().into_iter().filter(move |el| el.name == name)
    }

    /// Non-empty text of each direct child with the given name
    pub fn child_texts<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.children_named(name)
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Whether any direct child with the given name has exactly this text
    pub fn has_child_text(&self, name: &str, text: &str) -> bool {
        self.children_named(name).any(|c| c.text == text)
    }
}

/// Parse a complete document into its root element.
///
/// Fails with [`Error::MalformedXml`] on any well-formedness problem:
/// mismatched or unclosed tags, bad attributes, a missing root, or more than
/// one root element.
pub fn parse(input: &[u8]) -> Result<Element> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(Element::from_start(&e, reader.decoder())?),
            Ok(Event::Empty(e)) => {
                let el = Element::from_start(&e, reader.decoder())?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::End(e)) => match stack.pop() {
                Some(el) => attach(&mut stack, &mut root, el)?,
                None => {
                    return Err(Error::MalformedXml(format!(
                        "unexpected closing tag </{}>",
                        decode(reader.decoder(), e.name().as_ref())?
                    )))
                }
            },
            Ok(Event::Text(t)) => {
                let text = t.unescape()?;
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(Error::MalformedXml(
                            "text outside of the root element".to_string(),
                        ))
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&decode(reader.decoder(), &c)?);
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions, doctype
            Ok(_) => {}
            Err(e) => {
                return Err(Error::MalformedXml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::MalformedXml(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| Error::MalformedXml("document has no root element".to_string()))
}

fn decode(decoder: Decoder, bytes: &[u8]) -> Result<String> {
    decoder
        .decode(bytes)
        .map(|s| s.into_owned())
        .map_err(|e| Error::MalformedXml(e.to_string()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        Ok(())
    } else if root.is_none() {
        *root = Some(el);
        Ok(())
    } else {
        Err(Error::MalformedXml(format!(
            "second root element <{}>",
            el.name
        )))
    }
}
