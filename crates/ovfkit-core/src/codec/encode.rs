//! Model to element tree mapping.
//!
//! OVF elements are written in the default envelope namespace, their
//! attributes with the `ovf` prefix. CIM fields carry the prefix of their
//! class and are emitted in the alphabetical order the CIM schemas require.
//! VMware extensions use the `vmw` prefix.

use std::fmt::Display;

use crate::cim::{
    CimResourceAllocationSettingData, CimStorageAllocationSettingData,
    CimVirtualSystemSettingData, ResourceType,
};
use crate::envelope::*;
use crate::xml::{ns, Element};

use super::ToElement;

fn put_attr<T: Display>(el: &mut Element, name: &str, value: Option<&T>) {
    if let Some(value) = value {
        el.set_attr(name, value.to_string());
    }
}

fn put_text<T: Display>(el: &mut Element, name: &str, value: Option<&T>) {
    if let Some(value) = value {
        el.push_text(name, value.to_string());
    }
}

/// Write a non-optional string only when it carries a value.
fn put_nonempty(el: &mut Element, name: &str, value: &str) {
    if !value.is_empty() {
        el.push_text(name, value);
    }
}

fn put_texts(el: &mut Element, name: &str, values: &[String]) {
    for value in values {
        el.push_text(name, value.as_str());
    }
}

fn put_all<T: ToElement>(el: &mut Element, name: &str, values: &[T]) {
    for value in values {
        el.push(value.to_element(name));
    }
}

fn put_one<T: ToElement>(el: &mut Element, name: &str, value: Option<&T>) {
    if let Some(value) = value {
        el.push(value.to_element(name));
    }
}

fn put_resource_type(el: &mut Element, name: &str, value: Option<ResourceType>) {
    put_text(el, name, value.map(ResourceType::code).as_ref());
}

/// Write the attributes and leading children shared by all sections.
fn section_element(name: &str, section: &Section) -> Element {
    let mut el = Element::new(name);
    put_attr(&mut el, "ovf:required", section.required.as_ref());
    el.push_text("Info", section.info.as_str());
    put_nonempty(&mut el, "Category", &section.category);
    el
}

fn content_element(name: &str, content: &Content) -> Element {
    let mut el = Element::new(name);
    el.set_attr("ovf:id", content.id.as_str());
    el.push_text("Info", content.info.as_str());
    put_text(&mut el, "Name", content.name.as_ref());
    el
}

impl ToElement for Envelope {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        for (attr, uri) in ns::DECLARATIONS {
            el.set_attr(attr, uri);
        }

        let mut references = Element::new("References");
        put_all(&mut references, "File", &self.references);
        el.push(references);

        put_one(&mut el, "DiskSection", self.disk.as_ref());
        put_one(&mut el, "NetworkSection", self.network.as_ref());
        put_one(&mut el, "DeploymentOptionSection", self.deployment_option.as_ref());
        put_one(&mut el, "VirtualSystem", self.virtual_system.as_ref());
        put_one(
            &mut el,
            "VirtualSystemCollection",
            self.virtual_system_collection.as_ref(),
        );
        el
    }
}

impl ToElement for File {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        el.set_attr("ovf:id", self.id.as_str());
        el.set_attr("ovf:href", self.href.as_str());
        el.set_attr("ovf:size", self.size.to_string());
        put_attr(&mut el, "ovf:compression", self.compression.as_ref());
        put_attr(&mut el, "ovf:chunkSize", self.chunk_size.as_ref());
        el
    }
}

impl ToElement for VirtualSystem {
    fn to_element(&self, name: &str) -> Element {
        let mut el = content_element(name, &self.content);
        put_one(&mut el, "AnnotationSection", self.annotation.as_ref());
        put_all(&mut el, "ProductSection", &self.product);
        put_all(&mut el, "EulaSection", &self.eula);
        put_one(&mut el, "OperatingSystemSection", self.operating_system.as_ref());
        put_all(&mut el, "VirtualHardwareSection", &self.virtual_hardware);
        el
    }
}

impl ToElement for VirtualSystemCollection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = content_element(name, &self.content);
        put_one(
            &mut el,
            "ResourceAllocationSection",
            self.resource_allocation.as_ref(),
        );
        put_one(&mut el, "AnnotationSection", self.annotation.as_ref());
        put_all(&mut el, "ProductSection", &self.product);
        put_all(&mut el, "EulaSection", &self.eula);
        put_all(&mut el, "VirtualSystem", &self.virtual_system);
        el
    }
}

impl ToElement for AnnotationSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        el.push_text("Annotation", self.annotation.as_str());
        el
    }
}

impl ToElement for ProductSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        put_attr(&mut el, "ovf:class", self.class.as_ref());
        put_attr(&mut el, "ovf:instance", self.instance.as_ref());
        put_nonempty(&mut el, "Product", &self.product);
        put_nonempty(&mut el, "Vendor", &self.vendor);
        put_nonempty(&mut el, "Version", &self.version);
        put_nonempty(&mut el, "FullVersion", &self.full_version);
        put_nonempty(&mut el, "ProductUrl", &self.product_url);
        put_nonempty(&mut el, "VendorUrl", &self.vendor_url);
        put_nonempty(&mut el, "AppUrl", &self.app_url);
        put_all(&mut el, "Property", &self.property);
        el
    }
}

impl ToElement for Property {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        el.set_attr("ovf:key", self.key.as_str());
        el.set_attr("ovf:type", self.kind.as_str());
        put_attr(&mut el, "ovf:qualifiers", self.qualifiers.as_ref());
        put_attr(&mut el, "ovf:userConfigurable", self.user_configurable.as_ref());
        put_attr(&mut el, "ovf:value", self.default.as_ref());
        put_attr(&mut el, "ovf:password", self.password.as_ref());
        put_attr(&mut el, "ovf:configuration", self.configuration.as_ref());
        put_text(&mut el, "Label", self.label.as_ref());
        put_text(&mut el, "Description", self.description.as_ref());
        put_all(&mut el, "Value", &self.values);
        el
    }
}

impl ToElement for PropertyConfigurationValue {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        el.set_attr("ovf:value", self.value.as_str());
        put_attr(&mut el, "ovf:configuration", self.configuration.as_ref());
        el
    }
}

impl ToElement for NetworkSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        put_all(&mut el, "Network", &self.networks);
        el
    }
}

impl ToElement for Network {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        el.set_attr("ovf:name", self.name.as_str());
        put_nonempty(&mut el, "Description", &self.description);
        el
    }
}

impl ToElement for DiskSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        put_all(&mut el, "Disk", &self.disks);
        el
    }
}

impl ToElement for VirtualDiskDesc {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        el.set_attr("ovf:diskId", self.disk_id.as_str());
        put_attr(&mut el, "ovf:fileRef", self.file_ref.as_ref());
        el.set_attr("ovf:capacity", self.capacity.as_str());
        put_attr(
            &mut el,
            "ovf:capacityAllocationUnits",
            self.capacity_allocation_units.as_ref(),
        );
        put_attr(&mut el, "ovf:format", self.format.as_ref());
        put_attr(&mut el, "ovf:populatedSize", self.populated_size.as_ref());
        put_attr(&mut el, "ovf:parentRef", self.parent_ref.as_ref());
        el
    }
}

impl ToElement for OperatingSystemSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        el.set_attr("ovf:id", self.id.to_string());
        put_attr(&mut el, "ovf:version", self.version.as_ref());
        put_attr(&mut el, "vmw:osType", self.os_type.as_ref());
        put_text(&mut el, "Description", self.description.as_ref());
        el
    }
}

impl ToElement for EulaSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        el.push_text("License", self.license.as_str());
        el
    }
}

impl ToElement for Config {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        put_attr(&mut el, "ovf:required", self.required.as_ref());
        el.set_attr("vmw:key", self.key.as_str());
        el.set_attr("vmw:value", self.value.as_str());
        el
    }
}

impl ToElement for VirtualHardwareSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        put_attr(&mut el, "ovf:id", self.id.as_ref());
        put_attr(&mut el, "ovf:transport", self.transport.as_ref());
        put_one(&mut el, "System", self.system.as_ref());
        put_all(&mut el, "Item", &self.item);
        put_all(&mut el, "StorageItem", &self.storage_item);
        put_all(&mut el, "vmw:Config", &self.config);
        put_all(&mut el, "vmw:ExtraConfig", &self.extra_config);
        el
    }
}

impl ToElement for VirtualSystemSettingData {
    fn to_element(&self, name: &str) -> Element {
        self.cim.to_element(name)
    }
}

impl ToElement for ResourceAllocationSettingData {
    fn to_element(&self, name: &str) -> Element {
        let mut el = self.cim.to_element(name);
        put_attr(&mut el, "ovf:required", self.required.as_ref());
        put_attr(&mut el, "ovf:configuration", self.configuration.as_ref());
        put_attr(&mut el, "ovf:bound", self.bound.as_ref());
        put_all(&mut el, "vmw:Config", &self.config);
        put_one(&mut el, "vmw:CoresPerSocket", self.cores_per_socket.as_ref());
        el
    }
}

impl ToElement for StorageAllocationSettingData {
    fn to_element(&self, name: &str) -> Element {
        let mut el = self.cim.to_element(name);
        put_attr(&mut el, "ovf:required", self.required.as_ref());
        put_attr(&mut el, "ovf:configuration", self.configuration.as_ref());
        put_attr(&mut el, "ovf:bound", self.bound.as_ref());
        el
    }
}

impl ToElement for ResourceAllocationSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        put_all(&mut el, "Item", &self.item);
        el
    }
}

impl ToElement for DeploymentOptionSection {
    fn to_element(&self, name: &str) -> Element {
        let mut el = section_element(name, &self.section);
        put_all(&mut el, "Configuration", &self.configuration);
        el
    }
}

impl ToElement for DeploymentOptionConfiguration {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        el.set_attr("ovf:id", self.id.as_str());
        put_attr(&mut el, "ovf:default", self.default.as_ref());
        el.push_text("Label", self.label.as_str());
        el.push_text("Description", self.description.as_str());
        el
    }
}

impl ToElement for CoresPerSocket {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        put_attr(&mut el, "ovf:required", self.required.as_ref());
        el.text = self.value.to_string();
        el
    }
}

impl ToElement for CimVirtualSystemSettingData {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        put_text(&mut el, "vssd:AutomaticRecoveryAction", self.automatic_recovery_action.as_ref());
        put_text(&mut el, "vssd:AutomaticShutdownAction", self.automatic_shutdown_action.as_ref());
        put_text(&mut el, "vssd:AutomaticStartupAction", self.automatic_startup_action.as_ref());
        if let Some(delay) = &self.automatic_startup_action_delay {
            let mut wrapper = Element::new("vssd:AutomaticStartupActionDelay");
            wrapper.push_text("cim:Interval", delay.as_str());
            el.push(wrapper);
        }
        put_text(
            &mut el,
            "vssd:AutomaticStartupActionSequenceNumber",
            self.automatic_startup_action_sequence_number.as_ref(),
        );
        put_text(&mut el, "vssd:Caption", self.caption.as_ref());
        put_text(&mut el, "vssd:ConfigurationDataRoot", self.configuration_data_root.as_ref());
        put_text(&mut el, "vssd:ConfigurationFile", self.configuration_file.as_ref());
        put_text(&mut el, "vssd:ConfigurationID", self.configuration_id.as_ref());
        put_text(&mut el, "vssd:CreationTime", self.creation_time.as_ref());
        put_text(&mut el, "vssd:Description", self.description.as_ref());
        el.push_text("vssd:ElementName", self.element_name.as_str());
        el.push_text("vssd:InstanceID", self.instance_id.as_str());
        put_text(&mut el, "vssd:LogDataRoot", self.log_data_root.as_ref());
        put_texts(&mut el, "vssd:Notes", &self.notes);
        put_text(&mut el, "vssd:RecoveryFile", self.recovery_file.as_ref());
        put_text(&mut el, "vssd:SnapshotDataRoot", self.snapshot_data_root.as_ref());
        put_text(&mut el, "vssd:SuspendDataRoot", self.suspend_data_root.as_ref());
        put_text(&mut el, "vssd:SwapFileDataRoot", self.swap_file_data_root.as_ref());
        put_text(
            &mut el,
            "vssd:VirtualSystemIdentifier",
            self.virtual_system_identifier.as_ref(),
        );
        put_text(&mut el, "vssd:VirtualSystemType", self.virtual_system_type.as_ref());
        el
    }
}

impl ToElement for CimResourceAllocationSettingData {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        put_text(&mut el, "rasd:Address", self.address.as_ref());
        put_text(&mut el, "rasd:AddressOnParent", self.address_on_parent.as_ref());
        put_text(&mut el, "rasd:AllocationUnits", self.allocation_units.as_ref());
        put_text(&mut el, "rasd:AutomaticAllocation", self.automatic_allocation.as_ref());
        put_text(&mut el, "rasd:AutomaticDeallocation", self.automatic_deallocation.as_ref());
        put_text(&mut el, "rasd:Caption", self.caption.as_ref());
        put_texts(&mut el, "rasd:Connection", &self.connection);
        put_text(&mut el, "rasd:ConsumerVisibility", self.consumer_visibility.as_ref());
        put_text(&mut el, "rasd:Description", self.description.as_ref());
        el.push_text("rasd:ElementName", self.element_name.as_str());
        put_texts(&mut el, "rasd:HostResource", &self.host_resource);
        el.push_text("rasd:InstanceID", self.instance_id.as_str());
        put_text(&mut el, "rasd:Limit", self.limit.as_ref());
        put_text(&mut el, "rasd:MappingBehavior", self.mapping_behavior.as_ref());
        put_text(&mut el, "rasd:OtherResourceType", self.other_resource_type.as_ref());
        put_text(&mut el, "rasd:Parent", self.parent.as_ref());
        put_text(&mut el, "rasd:PoolID", self.pool_id.as_ref());
        put_text(&mut el, "rasd:Reservation", self.reservation.as_ref());
        put_text(&mut el, "rasd:ResourceSubType", self.resource_sub_type.as_ref());
        put_resource_type(&mut el, "rasd:ResourceType", self.resource_type);
        put_text(&mut el, "rasd:VirtualQuantity", self.virtual_quantity.as_ref());
        put_text(&mut el, "rasd:VirtualQuantityUnits", self.virtual_quantity_units.as_ref());
        put_text(&mut el, "rasd:Weight", self.weight.as_ref());
        el
    }
}

impl ToElement for CimStorageAllocationSettingData {
    fn to_element(&self, name: &str) -> Element {
        let mut el = Element::new(name);
        put_text(&mut el, "sasd:Access", self.access.as_ref());
        put_text(&mut el, "sasd:Address", self.address.as_ref());
        put_text(&mut el, "sasd:AddressOnParent", self.address_on_parent.as_ref());
        put_text(&mut el, "sasd:AllocationUnits", self.allocation_units.as_ref());
        put_text(&mut el, "sasd:AutomaticAllocation", self.automatic_allocation.as_ref());
        put_text(&mut el, "sasd:AutomaticDeallocation", self.automatic_deallocation.as_ref());
        put_text(&mut el, "sasd:Caption", self.caption.as_ref());
        put_text(&mut el, "sasd:ChangeableType", self.changeable_type.as_ref());
        put_texts(&mut el, "sasd:ComponentSetting", &self.component_setting);
        put_text(&mut el, "sasd:ConfigurationName", self.configuration_name.as_ref());
        put_texts(&mut el, "sasd:Connection", &self.connection);
        put_text(&mut el, "sasd:ConsumerVisibility", self.consumer_visibility.as_ref());
        put_text(&mut el, "sasd:Description", self.description.as_ref());
        el.push_text("sasd:ElementName", self.element_name.as_str());
        put_text(&mut el, "sasd:Generation", self.generation.as_ref());
        put_text(&mut el, "sasd:HostExtentName", self.host_extent_name.as_ref());
        put_text(&mut el, "sasd:HostExtentNameFormat", self.host_extent_name_format.as_ref());
        put_text(
            &mut el,
            "sasd:HostExtentNameNamespace",
            self.host_extent_name_namespace.as_ref(),
        );
        put_text(
            &mut el,
            "sasd:HostExtentStartingAddress",
            self.host_extent_starting_address.as_ref(),
        );
        put_texts(&mut el, "sasd:HostResource", &self.host_resource);
        put_text(&mut el, "sasd:HostResourceBlockSize", self.host_resource_block_size.as_ref());
        el.push_text("sasd:InstanceID", self.instance_id.as_str());
        put_text(&mut el, "sasd:Limit", self.limit.as_ref());
        put_text(&mut el, "sasd:MappingBehavior", self.mapping_behavior.as_ref());
        put_text(
            &mut el,
            "sasd:OtherHostExtentNameFormat",
            self.other_host_extent_name_format.as_ref(),
        );
        put_text(
            &mut el,
            "sasd:OtherHostExtentNameNamespace",
            self.other_host_extent_name_namespace.as_ref(),
        );
        put_text(&mut el, "sasd:OtherResourceType", self.other_resource_type.as_ref());
        put_text(&mut el, "sasd:Parent", self.parent.as_ref());
        put_text(&mut el, "sasd:PoolID", self.pool_id.as_ref());
        put_text(&mut el, "sasd:Reservation", self.reservation.as_ref());
        put_text(&mut el, "sasd:ResourceSubType", self.resource_sub_type.as_ref());
        put_resource_type(&mut el, "sasd:ResourceType", self.resource_type);
        put_text(&mut el, "sasd:SoID", self.so_id.as_ref());
        put_text(&mut el, "sasd:SoOrgID", self.so_org_id.as_ref());
        put_text(&mut el, "sasd:VirtualQuantity", self.virtual_quantity.as_ref());
        put_text(&mut el, "sasd:VirtualQuantityUnits", self.virtual_quantity_units.as_ref());
        put_text(
            &mut el,
            "sasd:VirtualResourceBlockSize",
            self.virtual_resource_block_size.as_ref(),
        );
        put_text(&mut el, "sasd:Weight", self.weight.as_ref());
        el
    }
}
