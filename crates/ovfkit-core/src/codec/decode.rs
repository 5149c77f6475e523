//! Element tree to model mapping.
//!
//! Names are matched on their local part. Unknown elements and attributes are
//! ignored. A missing non-optional field takes its zero value, while a
//! present field whose text does not parse is an error.

use std::fmt::Display;
use std::str::FromStr;

use crate::cim::{
    CimResourceAllocationSettingData, CimStorageAllocationSettingData,
    CimVirtualSystemSettingData, ResourceType,
};
use crate::envelope::*;
use crate::error::{Error, Result};
use crate::xml::Element;

use super::FromElement;

/// Typed accessors over one element, with errors naming the field.
struct Fields<'a> {
    el: &'a Element,
}

impl<'a> Fields<'a> {
    fn new(el: &'a Element) -> Self {
        Self { el }
    }

    fn invalid(&self, field: &str, raw: &str, reason: impl Display) -> Error {
        Error::decode(format!(
            "<{}> field '{}' has invalid value {:?}: {}",
            self.el.name, field, raw, reason
        ))
    }

    fn number<T>(&self, field: &str, raw: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        raw.trim()
            .parse()
            .map_err(|e| self.invalid(field, raw, e))
    }

    fn boolean(&self, field: &str, raw: &str) -> Result<bool> {
        match raw.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(self.invalid(field, raw, "expected true, false, 1 or 0")),
        }
    }

    fn attr(&self, name: &str) -> String {
        self.el.attr(name).unwrap_or_default().to_string()
    }

    fn opt_attr(&self, name: &str) -> Option<String> {
        self.el.attr(name).map(str::to_string)
    }

    fn attr_number<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr + Default,
        T::Err: Display,
    {
        Ok(self.opt_attr_number(name)?.unwrap_or_default())
    }

    fn opt_attr_number<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.el
            .attr(name)
            .map(|raw| self.number(name, raw))
            .transpose()
    }

    fn opt_attr_bool(&self, name: &str) -> Result<Option<bool>> {
        self.el
            .attr(name)
            .map(|raw| self.boolean(name, raw))
            .transpose()
    }

    fn text(&self, name: &str) -> String {
        self.el.child_text(name).unwrap_or_default().to_string()
    }

    fn opt_text(&self, name: &str) -> Option<String> {
        self.el.child_text(name).map(str::to_string)
    }

    fn texts(&self, name: &str) -> Vec<String> {
        self.el
            .children_named(name)
            .map(|c| c.text.clone())
            .collect()
    }

    /// Like [`Fields::texts`], but fails when an entry carries child
    /// elements, since only character data is kept.
    fn leaf_texts(&self, name: &str) -> Result<Vec<String>> {
        self.el
            .children_named(name)
            .map(|c| match c.children.first() {
                Some(inner) => Err(Error::decode(format!(
                    "<{}> field '{}' contains element <{}>, only text is supported",
                    self.el.name, name, inner.name
                ))),
                None => Ok(c.text.clone()),
            })
            .collect()
    }

    fn opt_number<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.el
            .child_text(name)
            .map(|raw| self.number(name, raw))
            .transpose()
    }

    fn opt_bool(&self, name: &str) -> Result<Option<bool>> {
        self.el
            .child_text(name)
            .map(|raw| self.boolean(name, raw))
            .transpose()
    }

    fn opt_resource_type(&self) -> Result<Option<ResourceType>> {
        Ok(self
            .opt_number::<u16>("ResourceType")?
            .map(ResourceType::from)
            .inspect(|rt| {
                if let ResourceType::Unknown(code) = rt {
                    tracing::debug!(code, element = %self.el.name, "unrecognized CIM resource type");
                }
            }))
    }

    fn one<T: FromElement>(&self, name: &str) -> Result<Option<T>> {
        self.el.child(name).map(T::from_element).transpose()
    }

    fn many<T: FromElement>(&self, name: &str) -> Result<Vec<T>> {
        self.el.children_named(name).map(T::from_element).collect()
    }
}

impl FromElement for Envelope {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        let references = match el.child("References") {
            Some(refs) => Fields::new(refs).many("File")?,
            None => Vec::new(),
        };
        Ok(Self {
            references,
            disk: f.one("DiskSection")?,
            network: f.one("NetworkSection")?,
            deployment_option: f.one("DeploymentOptionSection")?,
            virtual_system: f.one("VirtualSystem")?,
            virtual_system_collection: f.one("VirtualSystemCollection")?,
        })
    }
}

impl FromElement for File {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            id: f.attr("id"),
            href: f.attr("href"),
            size: f.attr_number("size")?,
            compression: f.opt_attr("compression"),
            chunk_size: f.opt_attr_number("chunkSize")?,
        })
    }
}

impl FromElement for Content {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            id: f.attr("id"),
            info: f.text("Info"),
            name: f.opt_text("Name"),
        })
    }
}

impl FromElement for Section {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            required: f.opt_attr_bool("required")?,
            info: f.text("Info"),
            category: f.text("Category"),
        })
    }
}

impl FromElement for VirtualSystem {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            content: Content::from_element(el)?,
            annotation: f.one("AnnotationSection")?,
            product: f.many("ProductSection")?,
            eula: f.many("EulaSection")?,
            operating_system: f.one("OperatingSystemSection")?,
            virtual_hardware: f.many("VirtualHardwareSection")?,
        })
    }
}

impl FromElement for VirtualSystemCollection {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            content: Content::from_element(el)?,
            resource_allocation: f.one("ResourceAllocationSection")?,
            annotation: f.one("AnnotationSection")?,
            product: f.many("ProductSection")?,
            eula: f.many("EulaSection")?,
            virtual_system: f.many("VirtualSystem")?,
        })
    }
}

impl FromElement for AnnotationSection {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            section: Section::from_element(el)?,
            annotation: Fields::new(el).text("Annotation"),
        })
    }
}

impl FromElement for ProductSection {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            section: Section::from_element(el)?,
            class: f.opt_attr("class"),
            instance: f.opt_attr("instance"),
            product: f.text("Product"),
            vendor: f.text("Vendor"),
            version: f.text("Version"),
            full_version: f.text("FullVersion"),
            product_url: f.text("ProductUrl"),
            vendor_url: f.text("VendorUrl"),
            app_url: f.text("AppUrl"),
            property: f.many("Property")?,
        })
    }
}

impl FromElement for Property {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            key: f.attr("key"),
            kind: f.attr("type"),
            qualifiers: f.opt_attr("qualifiers"),
            user_configurable: f.opt_attr_bool("userConfigurable")?,
            default: f.opt_attr("value"),
            password: f.opt_attr_bool("password")?,
            configuration: f.opt_attr("configuration"),
            label: f.opt_text("Label"),
            description: f.opt_text("Description"),
            values: f.many("Value")?,
        })
    }
}

impl FromElement for PropertyConfigurationValue {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            value: f.attr("value"),
            configuration: f.opt_attr("configuration"),
        })
    }
}

impl FromElement for NetworkSection {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            section: Section::from_element(el)?,
            networks: Fields::new(el).many("Network")?,
        })
    }
}

impl FromElement for Network {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            name: f.attr("name"),
            description: f.text("Description"),
        })
    }
}

impl FromElement for DiskSection {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            section: Section::from_element(el)?,
            disks: Fields::new(el).many("Disk")?,
        })
    }
}

impl FromElement for VirtualDiskDesc {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            disk_id: f.attr("diskId"),
            file_ref: f.opt_attr("fileRef"),
            capacity: f.attr("capacity"),
            capacity_allocation_units: f.opt_attr("capacityAllocationUnits"),
            format: f.opt_attr("format"),
            populated_size: f.opt_attr_number("populatedSize")?,
            parent_ref: f.opt_attr("parentRef"),
        })
    }
}

impl FromElement for OperatingSystemSection {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            section: Section::from_element(el)?,
            id: f.attr_number("id")?,
            version: f.opt_attr("version"),
            os_type: f.opt_attr("osType"),
            description: f.opt_text("Description"),
        })
    }
}

impl FromElement for EulaSection {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            section: Section::from_element(el)?,
            license: Fields::new(el).text("License"),
        })
    }
}

impl FromElement for Config {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            required: f.opt_attr_bool("required")?,
            key: f.attr("key"),
            value: f.attr("value"),
        })
    }
}

impl FromElement for VirtualHardwareSection {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            section: Section::from_element(el)?,
            id: f.opt_attr("id"),
            transport: f.opt_attr("transport"),
            system: f.one("System")?,
            item: f.many("Item")?,
            storage_item: f.many("StorageItem")?,
            config: f.many("Config")?,
            extra_config: f.many("ExtraConfig")?,
        })
    }
}

impl FromElement for VirtualSystemSettingData {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            cim: CimVirtualSystemSettingData::from_element(el)?,
        })
    }
}

impl FromElement for ResourceAllocationSettingData {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            cim: CimResourceAllocationSettingData::from_element(el)?,
            required: f.opt_attr_bool("required")?,
            configuration: f.opt_attr("configuration"),
            bound: f.opt_attr("bound"),
            config: f.many("Config")?,
            cores_per_socket: f.one("CoresPerSocket")?,
        })
    }
}

impl FromElement for StorageAllocationSettingData {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            cim: CimStorageAllocationSettingData::from_element(el)?,
            required: f.opt_attr_bool("required")?,
            configuration: f.opt_attr("configuration"),
            bound: f.opt_attr("bound"),
        })
    }
}

impl FromElement for ResourceAllocationSection {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            section: Section::from_element(el)?,
            item: Fields::new(el).many("Item")?,
        })
    }
}

impl FromElement for DeploymentOptionSection {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            section: Section::from_element(el)?,
            configuration: Fields::new(el).many("Configuration")?,
        })
    }
}

impl FromElement for DeploymentOptionConfiguration {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            id: f.attr("id"),
            default: f.opt_attr_bool("default")?,
            label: f.text("Label"),
            description: f.text("Description"),
        })
    }
}

impl FromElement for CoresPerSocket {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            required: f.opt_attr_bool("required")?,
            value: f.number("CoresPerSocket", &el.text)?,
        })
    }
}

impl FromElement for CimVirtualSystemSettingData {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            element_name: f.text("ElementName"),
            instance_id: f.text("InstanceID"),
            automatic_recovery_action: f.opt_number("AutomaticRecoveryAction")?,
            automatic_shutdown_action: f.opt_number("AutomaticShutdownAction")?,
            automatic_startup_action: f.opt_number("AutomaticStartupAction")?,
            automatic_startup_action_delay: el
                .descend(&["AutomaticStartupActionDelay", "Interval"])
                .map(|i| i.text.clone()),
            automatic_startup_action_sequence_number: f
                .opt_number("AutomaticStartupActionSequenceNumber")?,
            caption: f.opt_text("Caption"),
            configuration_data_root: f.opt_text("ConfigurationDataRoot"),
            configuration_file: f.opt_text("ConfigurationFile"),
            configuration_id: f.opt_text("ConfigurationID"),
            creation_time: f.opt_text("CreationTime"),
            description: f.opt_text("Description"),
            log_data_root: f.opt_text("LogDataRoot"),
            notes: f.texts("Notes"),
            recovery_file: f.opt_text("RecoveryFile"),
            snapshot_data_root: f.opt_text("SnapshotDataRoot"),
            suspend_data_root: f.opt_text("SuspendDataRoot"),
            swap_file_data_root: f.opt_text("SwapFileDataRoot"),
            virtual_system_identifier: f.opt_text("VirtualSystemIdentifier"),
            virtual_system_type: f.opt_text("VirtualSystemType"),
        })
    }
}

impl FromElement for CimResourceAllocationSettingData {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            element_name: f.text("ElementName"),
            instance_id: f.text("InstanceID"),
            resource_type: f.opt_resource_type()?,
            other_resource_type: f.opt_text("OtherResourceType"),
            resource_sub_type: f.opt_text("ResourceSubType"),
            address_on_parent: f.opt_text("AddressOnParent"),
            address: f.opt_text("Address"),
            allocation_units: f.opt_text("AllocationUnits"),
            automatic_allocation: f.opt_bool("AutomaticAllocation")?,
            automatic_deallocation: f.opt_bool("AutomaticDeallocation")?,
            caption: f.opt_text("Caption"),
            connection: f.texts("Connection"),
            consumer_visibility: f.opt_number("ConsumerVisibility")?,
            description: f.opt_text("Description"),
            host_resource: f.texts("HostResource"),
            limit: f.opt_number("Limit")?,
            mapping_behavior: f.opt_number("MappingBehavior")?,
            parent: f.opt_text("Parent"),
            pool_id: f.opt_text("PoolID"),
            reservation: f.opt_number("Reservation")?,
            virtual_quantity: f.opt_number("VirtualQuantity")?,
            virtual_quantity_units: f.opt_text("VirtualQuantityUnits"),
            weight: f.opt_number("Weight")?,
        })
    }
}

impl FromElement for CimStorageAllocationSettingData {
    fn from_element(el: &Element) -> Result<Self> {
        let f = Fields::new(el);
        Ok(Self {
            element_name: f.text("ElementName"),
            instance_id: f.text("InstanceID"),
            resource_type: f.opt_resource_type()?,
            other_resource_type: f.opt_text("OtherResourceType"),
            resource_sub_type: f.opt_text("ResourceSubType"),
            access: f.opt_number("Access")?,
            address: f.opt_text("Address"),
            address_on_parent: f.opt_text("AddressOnParent"),
            allocation_units: f.opt_text("AllocationUnits"),
            automatic_allocation: f.opt_bool("AutomaticAllocation")?,
            automatic_deallocation: f.opt_bool("AutomaticDeallocation")?,
            caption: f.opt_text("Caption"),
            changeable_type: f.opt_number("ChangeableType")?,
            component_setting: f.leaf_texts("ComponentSetting")?,
            configuration_name: f.opt_text("ConfigurationName"),
            connection: f.texts("Connection"),
            consumer_visibility: f.opt_number("ConsumerVisibility")?,
            description: f.opt_text("Description"),
            generation: f.opt_number("Generation")?,
            host_extent_name: f.opt_text("HostExtentName"),
            host_extent_name_format: f.opt_number("HostExtentNameFormat")?,
            host_extent_name_namespace: f.opt_number("HostExtentNameNamespace")?,
            host_extent_starting_address: f.opt_number("HostExtentStartingAddress")?,
            host_resource: f.texts("HostResource"),
            host_resource_block_size: f.opt_number("HostResourceBlockSize")?,
            limit: f.opt_number("Limit")?,
            mapping_behavior: f.opt_number("MappingBehavior")?,
            other_host_extent_name_format: f.opt_text("OtherHostExtentNameFormat"),
            other_host_extent_name_namespace: f.opt_text("OtherHostExtentNameNamespace"),
            parent: f.opt_text("Parent"),
            pool_id: f.opt_text("PoolID"),
            reservation: f.opt_number("Reservation")?,
            so_id: f.opt_text("SoID"),
            so_org_id: f.opt_text("SoOrgID"),
            virtual_quantity: f.opt_number("VirtualQuantity")?,
            virtual_quantity_units: f.opt_text("VirtualQuantityUnits"),
            virtual_resource_block_size: f.opt_number("VirtualResourceBlockSize")?,
            weight: f.opt_number("Weight")?,
        })
    }
}
