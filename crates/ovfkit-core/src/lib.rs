//! ovfkit Core Library
//!
//! This crate provides a typed model of OVF (Open Virtualization Format)
//! descriptors and the DMTF CIM setting data they embed, together with an XML
//! codec that fills the model from a descriptor and writes it back.
//!
//! # Overview
//!
//! An OVF descriptor is an XML document rooted at `Envelope`. It lists the
//! package files, declares disks and networks, and describes one virtual
//! system or a collection of them, including their virtual hardware.
//! [`Envelope`] mirrors that tree; optional schema fields are `Option` so an
//! absent element never reads as a zero value.
//!
//! # Modules
//!
//! - [`error`] - Error types and Result alias
//! - [`envelope`] - OVF envelope, content and section types
//! - [`cim`] - CIM resource types and setting data
//! - [`codec`] - Descriptor decoding and encoding
//!
//! # Quick Start
//!
//! ```no_run
//! use ovfkit_core::{decode_file, CimResourceType};
//! use std::path::Path;
//!
//! let envelope = decode_file(Path::new("/path/to/appliance.ovf")).unwrap();
//! for vs in envelope.virtual_systems() {
//!     for hw in &vs.virtual_hardware {
//!         for mem in hw.items_of_type(CimResourceType::Memory) {
//!             println!("{}: {:?}", vs.content.id, mem.cim.virtual_quantity);
//!         }
//!     }
//! }
//! ```

pub mod cim;
pub mod codec;
pub mod envelope;
pub mod error;
mod xml;

pub use error::{Error, Result};

// Re-export the model and codec entry points for convenience
pub use cim::{
    CimResourceAllocationSettingData, CimResourceType, CimStorageAllocationSettingData,
    CimVirtualSystemSettingData, ResourceType,
};
pub use codec::{decode, decode_file, encode, encode_file, EncodeOptions};
pub use envelope::{
    AnnotationSection, Config, Content, CoresPerSocket, DeploymentOptionConfiguration,
    DeploymentOptionSection, DiskSection, Envelope, EulaSection, File, Network, NetworkSection,
    OperatingSystemSection, ProductSection, Property, PropertyConfigurationValue,
    ResourceAllocationSection, ResourceAllocationSettingData, Section,
    StorageAllocationSettingData, VirtualDiskDesc, VirtualHardwareSection, VirtualSystem,
    VirtualSystemCollection, VirtualSystemSettingData,
};

/// Namespace URIs written on encoded envelopes.
pub use xml::ns;
