//! Decoding and encoding of OVF descriptors.
//!
//! Decoding is lenient in the way OVF consumers have to be: unknown elements
//! and attributes are skipped, namespace prefixes are ignored, and structural
//! rules such as "exactly one of `VirtualSystem` and
//! `VirtualSystemCollection`" are left to the caller. Values that cannot be
//! represented (a non-numeric `ResourceType`, a boolean spelled `yes`) fail
//! the decode.
//!
//! # Example
//!
//! ```no_run
//! use ovfkit_core::codec::{decode_file, encode_file, EncodeOptions};
//! use std::path::Path;
//!
//! let envelope = decode_file(Path::new("/path/to/appliance.ovf")).unwrap();
//! for vs in envelope.virtual_systems() {
//!     println!("{}", vs.content.id);
//! }
//! encode_file(&envelope, Path::new("/path/to/copy.ovf"), &EncodeOptions::default()).unwrap();
//! ```

mod decode;
mod encode;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::xml::{self, Element};

/// Build a model value from its element.
pub(crate) trait FromElement: Sized {
    fn from_element(el: &Element) -> Result<Self>;
}

/// Render a model value as an element called `name`.
pub(crate) trait ToElement {
    fn to_element(&self, name: &str) -> Element;
}

/// Default indentation width for encoded documents.
pub const DEFAULT_INDENT: usize = 2;

/// Options for encoding an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Indent nested elements by this many spaces; `None` writes one line.
    pub indent: Option<usize>,
    /// Emit the `<?xml version="1.0" encoding="UTF-8"?>` declaration.
    pub xml_declaration: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent: Some(DEFAULT_INDENT),
            xml_declaration: true,
        }
    }
}

impl EncodeOptions {
    /// Create new encode options with specified settings.
    pub fn new(indent: Option<usize>, xml_declaration: bool) -> Self {
        Self {
            indent,
            xml_declaration,
        }
    }

    /// Single-line output without a declaration, e.g. for embedding.
    pub fn compact() -> Self {
        Self {
            indent: None,
            xml_declaration: false,
        }
    }

    /// Indented output with a declaration.
    pub fn pretty() -> Self {
        Self::default()
    }
}

/// Decode an envelope from a descriptor.
///
/// # Errors
///
/// Returns [`Error::Xml`] if the input is not well-formed and
/// [`Error::Decode`] if the root is not `Envelope` or a value does not fit
/// its field.
pub fn decode<R: BufRead>(input: R) -> Result<Envelope> {
    let root = xml::read_document(input)?;
    if root.name != "Envelope" {
        return Err(Error::decode(format!(
            "root element is <{}>, expected <Envelope>",
            root.name
        )));
    }

    let envelope = <Envelope as FromElement>::from_element(&root)?;
    for skipped in root.unvisited() {
        tracing::trace!(element = %skipped.name, "skipped unrecognized element");
    }
    tracing::debug!(
        elements = root.count(),
        files = envelope.references.len(),
        virtual_systems = envelope.virtual_systems().count(),
        "decoded OVF envelope"
    );
    match (
        envelope.virtual_system.is_some(),
        envelope.virtual_system_collection.is_some(),
    ) {
        (true, true) => {
            tracing::warn!("envelope has both VirtualSystem and VirtualSystemCollection")
        }
        (false, false) => tracing::warn!("envelope has no VirtualSystem content"),
        _ => {}
    }
    Ok(envelope)
}

/// Decode an envelope from a descriptor file.
pub fn decode_file(path: &Path) -> Result<Envelope> {
    let file = File::open(path).map_err(|e| Error::io(e, path))?;
    decode(BufReader::new(file)).map_err(|err| match err {
        Error::Io { source, path: None } => Error::io(source, path),
        other => other,
    })
}

/// Encode an envelope as a descriptor.
pub fn encode<W: Write>(envelope: &Envelope, output: W, options: &EncodeOptions) -> Result<()> {
    let root = envelope.to_element("Envelope");
    tracing::debug!(
        elements = root.count(),
        indent = ?options.indent,
        "encoding OVF envelope"
    );
    xml::write_document(output, &root, options.indent, options.xml_declaration)
}

/// Encode an envelope to a descriptor file, replacing any existing file.
pub fn encode_file(envelope: &Envelope, path: &Path, options: &EncodeOptions) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(e, path))?;
    encode(envelope, BufWriter::new(file), options).map_err(|err| match err {
        Error::Io { source, path: None } => Error::io(source, path),
        other => other,
    })
}

impl Envelope {
    /// Encode with the given options into a string.
    pub fn to_xml_string(&self, options: &EncodeOptions) -> Result<String> {
        let mut out = Vec::new();
        encode(self, &mut out, options)?;
        String::from_utf8(out).map_err(|e| Error::encode(format!("output is not UTF-8: {e}")))
    }
}

impl FromStr for Envelope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode(s.as_bytes())
    }
}
