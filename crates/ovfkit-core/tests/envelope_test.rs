//! Integration tests for decoding OVF descriptors into the envelope model.

use ovfkit_core::{decode_file, CimResourceType, Envelope, ResourceType};
use std::path::{Path, PathBuf};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn appliance() -> Envelope {
    decode_file(&fixture_path("appliance.ovf")).expect("Failed to decode appliance.ovf")
}

fn collection() -> Envelope {
    decode_file(&fixture_path("collection.ovf")).expect("Failed to decode collection.ovf")
}

#[test]
fn test_references() {
    let envelope = appliance();
    assert_eq!(envelope.references.len(), 2);

    let file1 = &envelope.references[0];
    assert_eq!(file1.id, "file1");
    assert_eq!(file1.href, "photon-disk1.vmdk");
    assert_eq!(file1.size, 386_871_808);
    assert_eq!(file1.compression, None);
    assert_eq!(file1.chunk_size, None);

    let file2 = envelope.file("file2").expect("file2 should be listed");
    assert_eq!(file2.compression.as_deref(), Some("gzip"));
    assert_eq!(file2.chunk_size, Some(524_288));
}

#[test]
fn test_disk_section() {
    let envelope = appliance();
    let disks = envelope.disk.as_ref().expect("DiskSection should be present");
    assert_eq!(disks.section.info, "Virtual disk information");
    assert_eq!(disks.section.required, None);
    assert_eq!(disks.disks.len(), 2);

    let disk1 = disks.disk("vmdisk1").expect("vmdisk1 should be declared");
    assert_eq!(disk1.capacity, "16");
    assert_eq!(disk1.capacity_allocation_units.as_deref(), Some("byte * 2^30"));
    assert_eq!(disk1.populated_size, Some(1_012_924_416));
    assert_eq!(disk1.parent_ref, None);

    let disk2 = disks.disk("vmdisk2").expect("vmdisk2 should be declared");
    assert_eq!(disk2.capacity, "${data.size}");
    assert_eq!(disk2.parent_ref.as_deref(), Some("vmdisk1"));
    assert_eq!(disk2.populated_size, None);
}

#[test]
fn test_disk_file_refs_are_soft() {
    let envelope = appliance();
    let disks = envelope.disk.as_ref().unwrap();
    for disk in &disks.disks {
        let file_ref = disk.file_ref.as_deref().expect("disk should reference a file");
        assert!(
            envelope.file(file_ref).is_some(),
            "{} should resolve in this fixture",
            file_ref
        );
    }
}

#[test]
fn test_network_section() {
    let envelope = appliance();
    let networks = envelope.network.as_ref().expect("NetworkSection should be present");
    assert_eq!(networks.networks.len(), 2);
    assert_eq!(
        networks.network("VM Network").map(|n| n.description.as_str()),
        Some("The VM Network network")
    );
    assert_eq!(
        networks.network("Storage").map(|n| n.description.as_str()),
        Some("")
    );
    assert!(networks.network("Missing").is_none());
}

#[test]
fn test_deployment_options() {
    let envelope = appliance();
    let options = envelope
        .deployment_option
        .as_ref()
        .expect("DeploymentOptionSection should be present");
    assert_eq!(options.configuration.len(), 2);
    assert_eq!(options.configuration[0].default, None);
    assert_eq!(options.configuration[0].label, "Small");

    let default = options
        .default_configuration()
        .expect("one configuration is marked default");
    assert_eq!(default.id, "large");
    assert_eq!(default.description, "4 vCPU, 8 GB memory");
}

#[test]
fn test_virtual_system_content() {
    let envelope = appliance();
    assert!(envelope.virtual_system_collection.is_none());

    let vs = envelope.virtual_system.as_ref().expect("VirtualSystem should be present");
    assert_eq!(vs.content.id, "photon");
    assert_eq!(vs.content.info, "A virtual machine");
    assert_eq!(vs.content.name.as_deref(), Some("photon"));

    let annotation = vs.annotation.as_ref().expect("AnnotationSection should be present");
    assert_eq!(annotation.section.required, Some(false));
    assert_eq!(annotation.annotation, "Minimal container host & tooling");

    assert_eq!(vs.eula.len(), 1);
    assert!(vs.eula[0].license.starts_with("Licensed under"));
}

#[test]
fn test_operating_system_section() {
    let envelope = appliance();
    let os = envelope
        .virtual_system
        .as_ref()
        .and_then(|vs| vs.operating_system.as_ref())
        .expect("OperatingSystemSection should be present");
    assert_eq!(os.id, 36);
    assert_eq!(os.version.as_deref(), Some("5"));
    assert_eq!(os.os_type.as_deref(), Some("vmwarePhoton64Guest"));
    assert_eq!(
        os.description.as_deref(),
        Some("Other 3.x or later Linux (64-bit)")
    );
}

#[test]
fn test_product_section() {
    let envelope = appliance();
    let product = &envelope.virtual_system.as_ref().unwrap().product[0];
    assert_eq!(product.product, "Photon OS");
    assert_eq!(product.vendor, "VMware Inc.");
    assert_eq!(product.version, "5.0");
    assert_eq!(product.full_version, "5.0 GA");
    assert_eq!(product.app_url, "");
    assert_eq!(product.section.category, "Networking");
    assert_eq!(product.property.len(), 3);

    let hostname = &product.property[0];
    assert_eq!(hostname.kind, "string");
    assert_eq!(hostname.default.as_deref(), Some("photon"));
    assert_eq!(hostname.label.as_deref(), Some("Hostname"));
    assert!(hostname.is_user_configurable());
    assert!(!hostname.is_password());

    let password = &product.property[1];
    assert!(password.is_password());
    assert_eq!(password.default, None);
    assert_eq!(password.qualifiers.as_deref(), Some("MinLen(8)"));
    assert_eq!(password.description, None);

    let size = &product.property[2];
    assert_eq!(size.user_configurable, None);
    assert!(!size.is_user_configurable());
    assert_eq!(size.values.len(), 2);
    assert_eq!(size.values[0].configuration.as_deref(), Some("large"));
    assert_eq!(size.values[0].value, "64");
    assert_eq!(size.values[1].configuration, None);
}

#[test]
fn test_product_keys() {
    let envelope = appliance();
    let product = &envelope.virtual_system.as_ref().unwrap().product[0];
    let keys: Vec<String> = product.keys().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["vm.hostname.1", "vm.root_password.1", "vm.data.size.1"]);
}

#[test]
fn test_product_keys_instance_only() {
    let envelope = collection();
    let web = &envelope.virtual_system_collection.as_ref().unwrap().virtual_system[0];
    let product = &web.product[0];
    assert_eq!(product.class, None);
    assert_eq!(product.key(&product.property[0]), "port.web");
}

#[test]
fn test_product_key_ignores_membership() {
    let envelope = collection();
    let collection = envelope.virtual_system_collection.as_ref().unwrap();
    let stack_product = &collection.product[0];
    let web_property = &collection.virtual_system[0].product[0].property[0];
    // Keyed with the stack section's (absent) class and instance.
    assert_eq!(stack_product.key(web_property), "port");
}

#[test]
fn test_virtual_system_settings() {
    let envelope = appliance();
    let hw = &envelope.virtual_system.as_ref().unwrap().virtual_hardware[0];
    assert_eq!(hw.transport.as_deref(), Some("com.vmware.guestInfo"));
    assert_eq!(hw.id, None);

    let system = &hw.system.as_ref().expect("System should be present").cim;
    assert_eq!(system.element_name, "Virtual Hardware Family");
    assert_eq!(system.instance_id, "0");
    assert_eq!(system.automatic_startup_action_delay.as_deref(), Some("PT30S"));
    assert_eq!(system.automatic_startup_action, None);
    assert_eq!(system.notes, vec!["first note", "second note"]);
    assert_eq!(system.virtual_system_type.as_deref(), Some("vmx-13"));
    assert_eq!(system.caption, None);
}

#[test]
fn test_hardware_items() {
    let envelope = appliance();
    let hw = &envelope.virtual_system.as_ref().unwrap().virtual_hardware[0];
    assert_eq!(hw.item.len(), 9);
    assert!(hw.storage_item.is_empty());

    let cpus: Vec<_> = hw.items_of_type(CimResourceType::Processor).collect();
    assert_eq!(cpus.len(), 2);
    assert_eq!(cpus[0].cim.virtual_quantity, Some(2));
    assert_eq!(cpus[0].configuration, None);
    assert_eq!(cpus[0].cores_per_socket.as_ref().map(|c| c.value), Some(2));
    assert_eq!(cpus[1].configuration.as_deref(), Some("large"));
    assert_eq!(cpus[1].cores_per_socket, None);

    let memory = hw
        .items_of_type(CimResourceType::Memory)
        .next()
        .expect("memory item should be present");
    assert_eq!(memory.cim.virtual_quantity, Some(2048));
    assert_eq!(memory.cim.allocation_units.as_deref(), Some("byte * 2^20"));
    assert_eq!(memory.cim.limit, Some(4096));
    assert_eq!(memory.cim.reservation, Some(0));
    assert_eq!(memory.cim.automatic_allocation, None);

    let disks: Vec<_> = hw.items_of_type(CimResourceType::DiskDrive).collect();
    assert_eq!(disks.len(), 2);
    assert_eq!(disks[1].cim.host_resource, vec!["ovf:/disk/vmdisk2"]);
    assert_eq!(disks[1].cim.parent.as_deref(), Some("3"));
}

#[test]
fn test_optional_fields_absent_vs_explicit() {
    let envelope = appliance();
    let hw = &envelope.virtual_system.as_ref().unwrap().virtual_hardware[0];

    let video = hw
        .items_of_type(CimResourceType::Graphics)
        .next()
        .expect("video item should be present");
    assert_eq!(video.cim.automatic_allocation, Some(false));
    assert_eq!(video.cim.limit, None);
    assert_eq!(video.required, Some(false));

    let nic = hw
        .items_of_type(CimResourceType::EthernetAdapter)
        .next()
        .expect("NIC item should be present");
    assert_eq!(nic.cim.automatic_allocation, Some(true));
    assert_eq!(nic.cim.connection, vec!["VM Network"]);
    assert_eq!(
        nic.cim.description.as_deref(),
        Some("VmxNet3 ethernet adapter on \"VM Network\"")
    );
    assert_eq!(nic.config.len(), 1);
    assert_eq!(nic.config[0].key, "wakeOnLanEnabled");
    assert_eq!(nic.required, None);
}

#[test]
fn test_unknown_resource_type_is_kept() {
    let envelope = appliance();
    let hw = &envelope.virtual_system.as_ref().unwrap().virtual_hardware[0];
    let tpm = hw.item.last().expect("hardware has items");
    assert_eq!(tpm.cim.resource_type, Some(ResourceType::Unknown(35)));
    assert_eq!(tpm.cim.resource_sub_type.as_deref(), Some("vmware.vtpm"));
}

#[test]
fn test_config_and_extra_config() {
    let envelope = appliance();
    let hw = &envelope.virtual_system.as_ref().unwrap().virtual_hardware[0];
    assert_eq!(hw.config.len(), 2);
    assert_eq!(hw.config[0].key, "firmware");
    assert_eq!(hw.config[0].value, "efi");
    assert_eq!(hw.config[0].required, Some(false));

    assert_eq!(hw.extra_config.len(), 2);
    assert_eq!(hw.extra_config[1].key, "guestinfo.note");
    assert_eq!(hw.extra_config[1].value, "a <b> & c");
    assert_eq!(hw.extra_config[1].required, None);
}

#[test]
fn test_collection() {
    let envelope = collection();
    assert!(envelope.virtual_system.is_none());
    assert!(envelope.network.is_none());

    let disks = envelope.disk.as_ref().unwrap();
    assert!(disks.section.is_required());

    let collection = envelope
        .virtual_system_collection
        .as_ref()
        .expect("VirtualSystemCollection should be present");
    assert_eq!(collection.content.id, "lamp");
    assert_eq!(collection.content.name.as_deref(), Some("LAMP"));
    assert_eq!(collection.virtual_system.len(), 2);

    let pool = collection
        .resource_allocation
        .as_ref()
        .expect("ResourceAllocationSection should be present");
    assert_eq!(pool.item.len(), 1);
    assert_eq!(pool.item[0].bound.as_deref(), Some("min"));
    assert_eq!(pool.item[0].cim.reservation, Some(1024));
    assert_eq!(pool.item[0].cim.weight, Some(100));

    let ids: Vec<&str> = envelope
        .virtual_systems()
        .map(|vs| vs.content.id.as_str())
        .collect();
    assert_eq!(ids, vec!["web", "db"]);
}

#[test]
fn test_collection_storage_items() {
    let envelope = collection();
    let web = &envelope.virtual_system_collection.as_ref().unwrap().virtual_system[0];
    let hw = &web.virtual_hardware[0];
    assert!(hw.item.is_empty());
    assert_eq!(hw.storage_item.len(), 1);

    let storage = &hw.storage_item[0].cim;
    assert_eq!(storage.element_name, "Web disk");
    assert_eq!(
        storage.resource_type,
        Some(ResourceType::Cim(CimResourceType::LogicalDisk))
    );
    assert_eq!(storage.virtual_resource_block_size, Some(512));
    assert_eq!(storage.host_resource, vec!["ovf:/disk/web"]);
    assert_eq!(storage.limit, None);
}
