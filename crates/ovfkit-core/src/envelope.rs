//! OVF envelope data model.
//!
//! The types here mirror DSP0243 (Open Virtualization Format 2.1.1):
//! <https://www.dmtf.org/sites/default/files/standards/documents/DSP0243_2.1.1.pdf>.
//! Section 9 of that document describes the parent/child relationships.
//!
//! The model is a plain value tree. Fields that are optional in the schema
//! are `Option`, so "absent from the document" never reads as a zero value.
//! Identifiers that point at other entities (`VirtualDiskDesc::file_ref`,
//! `VirtualDiskDesc::parent_ref`, network names in `Connection`) are stored
//! as strings; nothing here checks that they resolve.
//!
//! Shared attribute sets are composed rather than inherited: every section
//! carries a [`Section`] in its `section` field and both content types carry
//! a [`Content`]. On the wire those fields sit directly on the owning element.

use crate::cim::{
    CimResourceAllocationSettingData, CimStorageAllocationSettingData,
    CimVirtualSystemSettingData, ResourceType,
};

/// Root of an OVF descriptor.
///
/// A well-formed document sets exactly one of `virtual_system` and
/// `virtual_system_collection`. Decoding does not enforce that, so callers
/// must handle both, either, or neither being present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    /// `References>File`, the package-level file manifest.
    pub references: Vec<File>,

    // Package level meta-data
    pub disk: Option<DiskSection>,
    pub network: Option<NetworkSection>,
    pub deployment_option: Option<DeploymentOptionSection>,

    // Content
    pub virtual_system: Option<VirtualSystem>,
    pub virtual_system_collection: Option<VirtualSystemCollection>,
}

impl Envelope {
    /// Iterate every virtual system in the envelope: the top-level one
    /// first, then the children of the collection.
    pub fn virtual_systems(&self) -> impl Iterator<Item = &VirtualSystem> {
        self.virtual_system.iter().chain(
            self.virtual_system_collection
                .iter()
                .flat_map(|c| c.virtual_system.iter()),
        )
    }

    /// Look up a file reference by its `id`.
    pub fn file(&self, id: &str) -> Option<&File> {
        self.references.iter().find(|f| f.id == id)
    }
}

/// One payload file of the package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    pub id: String,
    pub href: String,
    pub size: u64,
    /// Compression applied to the file, e.g. `gzip`.
    pub compression: Option<String>,
    /// Set when the file is split into chunks of this many bytes.
    pub chunk_size: Option<i64>,
}

/// Identity shared by `VirtualSystem` and `VirtualSystemCollection`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub id: String,
    pub info: String,
    pub name: Option<String>,
}

/// A single deployable virtual machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualSystem {
    pub content: Content,

    pub annotation: Option<AnnotationSection>,
    pub product: Vec<ProductSection>,
    pub eula: Vec<EulaSection>,
    pub operating_system: Option<OperatingSystemSection>,
    /// Zero or more hardware profiles.
    pub virtual_hardware: Vec<VirtualHardwareSection>,
}

/// A group of virtual systems deployed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualSystemCollection {
    pub content: Content,

    // Collection level meta-data
    pub resource_allocation: Option<ResourceAllocationSection>,
    pub annotation: Option<AnnotationSection>,
    pub product: Vec<ProductSection>,
    pub eula: Vec<EulaSection>,

    pub virtual_system: Vec<VirtualSystem>,
}

/// Attributes common to every `*Section` element.
///
/// A consumer that does not understand a section must fail when the section
/// is required, and may skip it otherwise. The model only records the flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub required: Option<bool>,
    pub info: String,
    pub category: String,
}

impl Section {
    /// Effective `ovf:required` value; an absent attribute means false.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSection {
    pub section: Section,

    pub annotation: String,
}

/// Product metadata and the configurable properties of a virtual system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSection {
    pub section: Section,

    pub class: Option<String>,
    pub instance: Option<String>,

    pub product: String,
    pub vendor: String,
    pub version: String,
    pub full_version: String,
    pub product_url: String,
    pub vendor_url: String,
    pub app_url: String,
    pub property: Vec<Property>,
}

impl ProductSection {
    /// Fully qualified key of `prop` within this section.
    ///
    /// DSP0243 9.5.1: `key-value-env = [class-value "."] key-value-prod ["." instance-value]`.
    /// Membership of `prop` in [`ProductSection::property`] is not checked.
    pub fn key(&self, prop: &Property) -> String {
        let mut key = String::new();
        if let Some(class) = &self.class {
            key.push_str(class);
            key.push('.');
        }
        key.push_str(&prop.key);
        if let Some(instance) = &self.instance {
            key.push('.');
            key.push_str(instance);
        }
        key
    }

    /// Qualified keys of every property, in document order.
    pub fn keys(&self) -> impl Iterator<Item = (String, &Property)> {
        self.property.iter().map(move |p| (self.key(p), p))
    }
}

/// A configurable product parameter.
///
/// `kind` holds the declared `ovf:type` verbatim; it is not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub kind: String,
    pub qualifiers: Option<String>,
    pub user_configurable: Option<bool>,
    /// `ovf:value`, the default value.
    pub default: Option<String>,
    pub password: Option<bool>,
    pub configuration: Option<String>,

    pub label: Option<String>,
    pub description: Option<String>,

    pub values: Vec<PropertyConfigurationValue>,
}

impl Property {
    /// Whether consumers must treat the value as a secret.
    pub fn is_password(&self) -> bool {
        self.password.unwrap_or(false)
    }

    pub fn is_user_configurable(&self) -> bool {
        self.user_configurable.unwrap_or(false)
    }
}

/// A property value that applies under a named deployment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyConfigurationValue {
    pub value: String,
    pub configuration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSection {
    pub section: Section,

    pub networks: Vec<Network>,
}

impl NetworkSection {
    pub fn network(&self, name: &str) -> Option<&Network> {
        self.networks.iter().find(|n| n.name == name)
    }
}

/// A logical network, referenced by name from hardware `Connection`s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    pub name: String,

    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskSection {
    pub section: Section,

    pub disks: Vec<VirtualDiskDesc>,
}

impl DiskSection {
    pub fn disk(&self, disk_id: &str) -> Option<&VirtualDiskDesc> {
        self.disks.iter().find(|d| d.disk_id == disk_id)
    }
}

/// A virtual disk declaration.
///
/// `parent_ref` chains delta disks to their parent. Walking that chain, and
/// detecting cycles in it, is left to the consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualDiskDesc {
    pub disk_id: String,
    /// `id` of a [`File`] in the envelope references.
    pub file_ref: Option<String>,
    /// Kept as text: it may be a `${property}` reference.
    pub capacity: String,
    pub capacity_allocation_units: Option<String>,
    pub format: Option<String>,
    pub populated_size: Option<i64>,
    pub parent_ref: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatingSystemSection {
    pub section: Section,

    /// CIM operating system type code.
    pub id: i16,
    pub version: Option<String>,
    pub os_type: Option<String>,

    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EulaSection {
    pub section: Section,

    pub license: String,
}

/// A vendor key/value pair (`vmw:Config` or `vmw:ExtraConfig`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub required: Option<bool>,
    pub key: String,
    pub value: String,
}

/// One hardware profile of a virtual system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualHardwareSection {
    pub section: Section,

    pub id: Option<String>,
    pub transport: Option<String>,

    pub system: Option<VirtualSystemSettingData>,
    pub item: Vec<ResourceAllocationSettingData>,
    pub storage_item: Vec<StorageAllocationSettingData>,
    pub config: Vec<Config>,
    pub extra_config: Vec<Config>,
}

impl VirtualHardwareSection {
    /// Items whose `ResourceType` equals `kind`.
    pub fn items_of_type(
        &self,
        kind: impl Into<ResourceType>,
    ) -> impl Iterator<Item = &ResourceAllocationSettingData> {
        let kind = kind.into();
        self.item
            .iter()
            .filter(move |item| item.cim.resource_type == Some(kind))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualSystemSettingData {
    pub cim: CimVirtualSystemSettingData,
}

/// A hardware `Item`: CIM resource data plus the OVF item attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAllocationSettingData {
    pub cim: CimResourceAllocationSettingData,

    pub required: Option<bool>,
    /// Deployment configurations this item applies to.
    pub configuration: Option<String>,
    /// `min`, `max` or `normal` for ranged allocations.
    pub bound: Option<String>,
    pub config: Vec<Config>,
    pub cores_per_socket: Option<CoresPerSocket>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageAllocationSettingData {
    pub cim: CimStorageAllocationSettingData,

    pub required: Option<bool>,
    pub configuration: Option<String>,
    pub bound: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAllocationSection {
    pub section: Section,

    pub item: Vec<ResourceAllocationSettingData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentOptionSection {
    pub section: Section,

    pub configuration: Vec<DeploymentOptionConfiguration>,
}

impl DeploymentOptionSection {
    /// The first configuration flagged as default.
    ///
    /// OVF expects exactly one; documents with several are not rejected.
    pub fn default_configuration(&self) -> Option<&DeploymentOptionConfiguration> {
        self.configuration.iter().find(|c| c.is_default())
    }
}

/// A named deployment profile such as "small" or "large".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentOptionConfiguration {
    pub id: String,
    pub default: Option<bool>,

    pub label: String,
    pub description: String,
}

impl DeploymentOptionConfiguration {
    pub fn is_default(&self) -> bool {
        self.default.unwrap_or(false)
    }
}

/// `vmw:CoresPerSocket` on a processor item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoresPerSocket {
    pub required: Option<bool>,
    pub value: i32,
}
