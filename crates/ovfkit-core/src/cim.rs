//! DMTF CIM setting data embedded in OVF descriptors.
//!
//! OVF reuses three CIM classes to describe virtual hardware:
//!
//! - `CIM_VirtualSystemSettingData` (`vssd`), the `System` element of a
//!   hardware section
//! - `CIM_ResourceAllocationSettingData` (`rasd`), every `Item`
//! - `CIM_StorageAllocationSettingData` (`sasd`), every `StorageItem`
//!
//! Schemas: <https://schemas.dmtf.org/wbem/wscim/1/cim-schema/2.24.0/>
//!
//! CIM describes a superset of what any single resource needs, so apart from
//! `ElementName` and `InstanceID` every field is optional and real documents
//! populate only the subset relevant to the item's [`ResourceType`].

use std::fmt;

/// `CIM_ResourceAllocationSettingData.ResourceType` value map.
///
/// The discriminants are dictated by the CIM schema and are pinned
/// explicitly; they must never be derived from declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CimResourceType {
    Other = 1,
    ComputerSystem = 2,
    Processor = 3,
    Memory = 4,
    IdeController = 5,
    ParallelScsiHba = 6,
    FcHba = 7,
    IScsiHba = 8,
    IbHba = 9,
    EthernetAdapter = 10,
    OtherNetwork = 11,
    IoSlot = 12,
    IoDevice = 13,
    FloppyDrive = 14,
    CdDrive = 15,
    DvdDrive = 16,
    DiskDrive = 17,
    TapeDrive = 18,
    StorageExtent = 19,
    OtherStorage = 20,
    SerialPort = 21,
    ParallelPort = 22,
    UsbController = 23,
    Graphics = 24,
    Ieee1394 = 25,
    PartitionableUnit = 26,
    BasePartitionable = 27,
    PowerSupply = 28,
    CoolingDevice = 29,
    EthernetSwitchPort = 30,
    LogicalDisk = 31,
    StorageVolume = 32,
    EthernetConnection = 33,
}

impl CimResourceType {
    /// Every pinned resource type, in code order.
    pub const ALL: [CimResourceType; 33] = [
        Self::Other,
        Self::ComputerSystem,
        Self::Processor,
        Self::Memory,
        Self::IdeController,
        Self::ParallelScsiHba,
        Self::FcHba,
        Self::IScsiHba,
        Self::IbHba,
        Self::EthernetAdapter,
        Self::OtherNetwork,
        Self::IoSlot,
        Self::IoDevice,
        Self::FloppyDrive,
        Self::CdDrive,
        Self::DvdDrive,
        Self::DiskDrive,
        Self::TapeDrive,
        Self::StorageExtent,
        Self::OtherStorage,
        Self::SerialPort,
        Self::ParallelPort,
        Self::UsbController,
        Self::Graphics,
        Self::Ieee1394,
        Self::PartitionableUnit,
        Self::BasePartitionable,
        Self::PowerSupply,
        Self::CoolingDevice,
        Self::EthernetSwitchPort,
        Self::LogicalDisk,
        Self::StorageVolume,
        Self::EthernetConnection,
    ];

    /// The numeric code written to `ResourceType` elements.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Human-readable name as used in the CIM value map.
    pub fn name(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::ComputerSystem => "Computer System",
            Self::Processor => "Processor",
            Self::Memory => "Memory",
            Self::IdeController => "IDE Controller",
            Self::ParallelScsiHba => "Parallel SCSI HBA",
            Self::FcHba => "FC HBA",
            Self::IScsiHba => "iSCSI HBA",
            Self::IbHba => "IB HCA",
            Self::EthernetAdapter => "Ethernet Adapter",
            Self::OtherNetwork => "Other Network Adapter",
            Self::IoSlot => "I/O Slot",
            Self::IoDevice => "I/O Device",
            Self::FloppyDrive => "Floppy Drive",
            Self::CdDrive => "CD Drive",
            Self::DvdDrive => "DVD drive",
            Self::DiskDrive => "Disk Drive",
            Self::TapeDrive => "Tape Drive",
            Self::StorageExtent => "Storage Extent",
            Self::OtherStorage => "Other storage device",
            Self::SerialPort => "Serial port",
            Self::ParallelPort => "Parallel port",
            Self::UsbController => "USB Controller",
            Self::Graphics => "Graphics controller",
            Self::Ieee1394 => "IEEE 1394 Controller",
            Self::PartitionableUnit => "Partitionable Unit",
            Self::BasePartitionable => "Base Partitionable Unit",
            Self::PowerSupply => "Power",
            Self::CoolingDevice => "Cooling Capacity",
            Self::EthernetSwitchPort => "Ethernet Switch Port",
            Self::LogicalDisk => "Logical Disk",
            Self::StorageVolume => "Storage Volume",
            Self::EthernetConnection => "Ethernet Connection",
        }
    }
}

impl TryFrom<u16> for CimResourceType {
    type Error = u16;

    /// Map a code to its pinned variant, handing back codes with no variant.
    fn try_from(code: u16) -> std::result::Result<Self, u16> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for CimResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of a `ResourceType` element.
///
/// Codes outside the pinned set come from newer CIM revisions or vendor
/// ranges; they are kept verbatim so a document re-encodes unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Cim(CimResourceType),
    Unknown(u16),
}

impl ResourceType {
    /// The numeric code, known or not.
    pub fn code(self) -> u16 {
        match self {
            Self::Cim(t) => t.code(),
            Self::Unknown(code) => code,
        }
    }

    /// The pinned variant, if this code has one.
    pub fn known(self) -> Option<CimResourceType> {
        match self {
            Self::Cim(t) => Some(t),
            Self::Unknown(_) => None,
        }
    }
}

impl From<u16> for ResourceType {
    fn from(code: u16) -> Self {
        match CimResourceType::try_from(code) {
            Ok(t) => Self::Cim(t),
            Err(code) => Self::Unknown(code),
        }
    }
}

impl From<CimResourceType> for ResourceType {
    fn from(t: CimResourceType) -> Self {
        Self::Cim(t)
    }
}

impl PartialEq<CimResourceType> for ResourceType {
    fn eq(&self, other: &CimResourceType) -> bool {
        *self == Self::Cim(*other)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cim(t) => write!(f, "{} ({})", t, t.code()),
            Self::Unknown(code) => write!(f, "Unknown ({code})"),
        }
    }
}

/// `CIM_VirtualSystemSettingData`, written with the `vssd` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CimVirtualSystemSettingData {
    pub element_name: String,
    pub instance_id: String,

    pub automatic_recovery_action: Option<u8>,
    pub automatic_shutdown_action: Option<u8>,
    pub automatic_startup_action: Option<u8>,
    /// `AutomaticStartupActionDelay>Interval`, a CIM interval datetime.
    pub automatic_startup_action_delay: Option<String>,
    pub automatic_startup_action_sequence_number: Option<u16>,
    pub caption: Option<String>,
    pub configuration_data_root: Option<String>,
    pub configuration_file: Option<String>,
    pub configuration_id: Option<String>,
    pub creation_time: Option<String>,
    pub description: Option<String>,
    pub log_data_root: Option<String>,
    pub notes: Vec<String>,
    pub recovery_file: Option<String>,
    pub snapshot_data_root: Option<String>,
    pub suspend_data_root: Option<String>,
    pub swap_file_data_root: Option<String>,
    pub virtual_system_identifier: Option<String>,
    /// Platform type, e.g. `vmx-13` or `virtualbox-2.2`.
    pub virtual_system_type: Option<String>,
}

/// `CIM_ResourceAllocationSettingData`, written with the `rasd` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CimResourceAllocationSettingData {
    pub element_name: String,
    pub instance_id: String,

    pub resource_type: Option<ResourceType>,
    pub other_resource_type: Option<String>,
    pub resource_sub_type: Option<String>,

    pub address_on_parent: Option<String>,
    pub address: Option<String>,
    /// Programmatic units such as `byte * 2^20` or `hertz * 10^6`.
    pub allocation_units: Option<String>,
    pub automatic_allocation: Option<bool>,
    pub automatic_deallocation: Option<bool>,
    pub caption: Option<String>,
    /// Network names this item connects to.
    pub connection: Vec<String>,
    pub consumer_visibility: Option<u16>,
    pub description: Option<String>,
    /// Host resources backing this item, e.g. `ovf:/disk/vmdisk1`.
    pub host_resource: Vec<String>,
    pub limit: Option<u64>,
    pub mapping_behavior: Option<u16>,
    /// `InstanceID` of the controller this item hangs off.
    pub parent: Option<String>,
    pub pool_id: Option<String>,
    pub reservation: Option<u64>,
    pub virtual_quantity: Option<u64>,
    pub virtual_quantity_units: Option<String>,
    pub weight: Option<u32>,
}

/// `CIM_StorageAllocationSettingData`, written with the `sasd` prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CimStorageAllocationSettingData {
    pub element_name: String,
    pub instance_id: String,

    pub resource_type: Option<ResourceType>,
    pub other_resource_type: Option<String>,
    pub resource_sub_type: Option<String>,

    pub access: Option<u16>,
    pub address: Option<String>,
    pub address_on_parent: Option<String>,
    pub allocation_units: Option<String>,
    pub automatic_allocation: Option<bool>,
    pub automatic_deallocation: Option<bool>,
    pub caption: Option<String>,
    pub changeable_type: Option<u16>,
    /// Embedded CIM instances, kept as opaque text.
    pub component_setting: Vec<String>,
    pub configuration_name: Option<String>,
    pub connection: Vec<String>,
    pub consumer_visibility: Option<u16>,
    pub description: Option<String>,
    pub generation: Option<u64>,
    pub host_extent_name: Option<String>,
    pub host_extent_name_format: Option<u16>,
    pub host_extent_name_namespace: Option<u16>,
    pub host_extent_starting_address: Option<u64>,
    pub host_resource: Vec<String>,
    pub host_resource_block_size: Option<u64>,
    pub limit: Option<u64>,
    pub mapping_behavior: Option<u16>,
    pub other_host_extent_name_format: Option<String>,
    pub other_host_extent_name_namespace: Option<String>,
    pub parent: Option<String>,
    pub pool_id: Option<String>,
    pub reservation: Option<u64>,
    pub so_id: Option<String>,
    pub so_org_id: Option<String>,
    pub virtual_quantity: Option<u64>,
    pub virtual_quantity_units: Option<String>,
    pub virtual_resource_block_size: Option<u64>,
    pub weight: Option<u32>,
}
