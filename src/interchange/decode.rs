//! XML decoding into a generic nested tree.
//!
//! XMI documents differ wildly between authoring tools, so nothing here
//! assumes a schema. Every element becomes a JSON-style object:
//!
//! ```text
//! <packagedElement xmi:type="uml:Class" xmi:id="c1" name="Box">
//!   <ownedAttribute xmi:id="a1" name="width"/>
//! </packagedElement>
//!
//! { "packagedElement": {
//!     "@xmi:type": "uml:Class", "@xmi:id": "c1", "@name": "Box",
//!     "ownedAttribute": { "@xmi:id": "a1", "@name": "width" } } }
//! ```
//!
//! Attributes live under `@`-prefixed keys, character data under `#text`,
//! and child elements under their tag name. A tag that repeats within one
//! parent collapses into an array in document order.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use super::InterchangeError;

/// Prefix for attribute keys in decoded objects.
pub const ATTR_PREFIX: &str = "@";

/// Key under which element text is stored.
pub const TEXT_KEY: &str = "#text";

/// Decode XML text into a nested tree.
///
/// The returned value is a synthetic document object whose single key is the
/// root element's tag. Fails only when the text is not a well-formed XML
/// document with at least one element.
pub fn decode(input: &str) -> Result<Value, InterchangeError> {
    if input.trim().is_empty() {
        return Err(InterchangeError::empty("document has no content"));
    }

    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    // Bottom entry is the synthetic document node.
    let mut stack: Vec<(String, Map<String, Value>)> = vec![(String::new(), Map::new())];
    let mut seen_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                seen_element = true;
                stack.push(open_element(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                seen_element = true;
                let (tag, node) = open_element(e)?;
                attach(&mut stack, tag, node);
            }
            Ok(Event::End(_)) => {
                if stack.len() > 1 {
                    if let Some((tag, node)) = stack.pop() {
                        attach(&mut stack, tag, node);
                    }
                }
            }
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| InterchangeError::xml(format!("Text error: {e}")))?;
                append_text(&mut stack, &text);
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                append_text(&mut stack, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(InterchangeError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            // Declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(InterchangeError::xml(format!(
            "unexpected end of document: {} unclosed element(s)",
            stack.len() - 1
        )));
    }
    if !seen_element {
        return Err(InterchangeError::empty("document contains no elements"));
    }

    let document = stack.pop().map(|(_, node)| node).unwrap_or_default();
    Ok(Value::Object(document))
}

/// Build the object for a start tag, carrying its attributes.
fn open_element(e: &BytesStart<'_>) -> Result<(String, Map<String, Value>), InterchangeError> {
    let tag = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| InterchangeError::xml(format!("Invalid tag name: {e}")))?
        .to_string();

    let mut node = Map::new();
    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|e| InterchangeError::xml(format!("Attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| InterchangeError::xml(format!("Attribute key error: {e}")))?;
        if key.starts_with("xmlns") {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| InterchangeError::xml(format!("Attribute value error: {e}")))?;
        node.insert(
            format!("{ATTR_PREFIX}{key}"),
            Value::String(value.into_owned()),
        );
    }

    Ok((tag, node))
}

/// Insert a finished element under its parent, turning repeats into arrays.
fn attach(stack: &mut [(String, Map<String, Value>)], tag: String, node: Map<String, Value>) {
    let Some((_, parent)) = stack.last_mut() else {
        return;
    };
    let node = Value::Object(node);
    match parent.get_mut(&tag) {
        Some(Value::Array(items)) => items.push(node),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, node]);
        }
        None => {
            parent.insert(tag, node);
        }
    }
}

fn append_text(stack: &mut [(String, Map<String, Value>)], text: &str) {
    if text.is_empty() {
        return;
    }
    let Some((_, node)) = stack.last_mut() else {
        return;
    };
    match node.get_mut(TEXT_KEY) {
        Some(Value::String(existing)) => existing.push_str(text),
        _ => {
            node.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
    }
}
