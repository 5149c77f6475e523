//! Minimal XML element tree used by the codec.
//!
//! Decoding reads the whole document into an [`Element`] tree keyed by local
//! names, so namespace prefixes chosen by the producer do not matter.
//! Encoding builds a tree with qualified names and writes it back out with
//! `quick_xml::Writer`.

use std::borrow::Cow;
use std::cell::Cell;
use std::io::{BufRead, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};

/// Deepest element nesting accepted by [`read_document`].
///
/// OVF descriptors stay well below this. Everything that walks the tree
/// recurses, so unbounded input depth would overflow the stack.
pub(crate) const MAX_DEPTH: usize = 128;

/// Prefix whose attribute wins when two attributes share a local name.
const OVF_PREFIX: &[u8] = b"ovf";

/// Namespace URIs declared on an encoded envelope.
pub mod ns {
    pub const OVF: &str = "http://schemas.dmtf.org/ovf/envelope/1";
    pub const RASD: &str =
        "http://schemas.dmtf.org/wbem/wscim/1/cim-schema/2/CIM_ResourceAllocationSettingData";
    pub const VSSD: &str =
        "http://schemas.dmtf.org/wbem/wscim/1/cim-schema/2/CIM_VirtualSystemSettingData";
    pub const SASD: &str =
        "http://schemas.dmtf.org/wbem/wscim/1/cim-schema/2/CIM_StorageAllocationSettingData";
    pub const CIM: &str = "http://schemas.dmtf.org/wbem/wscim/1/common";
    pub const VMW: &str = "http://www.vmware.com/schema/ovf";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

    /// `(attribute, uri)` pairs in the order they are written.
    pub const DECLARATIONS: [(&str, &str); 8] = [
        ("xmlns", OVF),
        ("xmlns:ovf", OVF),
        ("xmlns:rasd", RASD),
        ("xmlns:vssd", VSSD),
        ("xmlns:sasd", SASD),
        ("xmlns:cim", CIM),
        ("xmlns:vmw", VMW),
        ("xmlns:xsi", XSI),
    ];
}

/// An XML element with its attributes, child elements and text.
///
/// Text is the concatenation of all character data directly inside the
/// element; it is only meaningful for leaf elements.
///
/// `visited` is set when a lookup returns the element, so the decoder can
/// report children no record asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
    visited: Cell<bool>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.name == name)
            .inspect(|c| c.visited.set(true))
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children
            .iter()
            .filter(move |c| c.name == name)
            .inspect(|c| c.visited.set(true))
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Follow a path of child names, taking the first match at each step.
    pub fn descend(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Append a leaf child holding `text`.
    pub fn push_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        let mut child = Element::new(name);
        child.text = text.into();
        self.children.push(child);
    }

    /// Number of elements in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Element::count).sum::<usize>()
    }

    /// Descendants never returned by a lookup. Subtrees of an unvisited
    /// element are not listed separately.
    pub fn unvisited(&self) -> Vec<&Element> {
        let mut skipped = Vec::new();
        let mut pending = vec![self];
        while let Some(el) = pending.pop() {
            for child in &el.children {
                if child.visited.get() {
                    pending.push(child);
                } else {
                    skipped.push(child);
                }
            }
        }
        skipped
    }
}

fn local_name(qualified: &[u8]) -> &[u8] {
    match qualified.iter().position(|&b| b == b':') {
        Some(i) => &qualified[i + 1..],
        None => qualified,
    }
}

fn utf8<'b>(bytes: &'b [u8], what: &str) -> Result<&'b str> {
    std::str::from_utf8(bytes).map_err(|e| Error::decode(format!("invalid UTF-8 in {what}: {e}")))
}

/// Attributes are keyed by local name. When two prefixes collide the `ovf:`
/// attribute is kept, otherwise the first one.
fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let mut el = Element::new(utf8(start.local_name().as_ref(), "element name")?);
    for attr in start.attributes() {
        let attr = attr?;
        // Namespace declarations carry no model data.
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = utf8(local_name(attr.key.as_ref()), "attribute name")?.to_string();
        let value = attr.unescape_value()?.into_owned();
        let is_ovf = attr.key.prefix().is_some_and(|p| p.into_inner() == OVF_PREFIX);
        match el.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => {
                tracing::trace!(element = %el.name, attribute = %key, "duplicate local attribute name");
                if is_ovf {
                    existing.1 = value;
                }
            }
            None => el.attributes.push((key, value)),
        }
    }
    Ok(el)
}

/// Parse a complete document into its root element.
pub(crate) fn read_document<R: BufRead>(input: R) -> Result<Element> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::xml_at(e, reader.error_position() as u64))?;
        match event {
            Event::Start(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::decode(format!(
                        "element nesting exceeds {MAX_DEPTH} levels"
                    )));
                }
                stack.push(open_element(&start)?);
            }
            Event::Empty(start) => {
                let el = open_element(&start)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                // The reader checks that end tags match their start tags.
                let el = stack
                    .pop()
                    .ok_or_else(|| Error::decode("unexpected closing tag"))?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    let data = data.into_inner();
                    top.text.push_str(utf8(&data, "CDATA section")?);
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::decode(format!(
            "document ended inside <{}>",
            stack.last().map(|e| e.name.as_str()).unwrap_or_default()
        )));
    }
    root.ok_or_else(|| Error::decode("document has no root element"))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(el);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(el);
            Ok(())
        }
        None => Err(Error::decode(format!(
            "second root element <{}> after document end",
            el.name
        ))),
    }
}

/// Write `root` as a document.
pub(crate) fn write_document<W: Write>(
    output: W,
    root: &Element,
    indent: Option<usize>,
    declaration: bool,
) -> Result<()> {
    let mut writer = match indent {
        Some(width) => Writer::new_with_indent(output, b' ', width),
        None => Writer::new(output),
    };
    if declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    write_element(&mut writer, root)?;
    writer.into_inner().flush()?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &Element) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() && el.text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if !el.text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&el.text)))?;
    }
    for child in &el.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(Cow::Borrowed(el.name.as_str()))))?;
    Ok(())
}
