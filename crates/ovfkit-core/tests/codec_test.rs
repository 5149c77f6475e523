//! Integration tests for encoding envelopes and decode/encode round trips.

use ovfkit_core::{
    decode, decode_file, encode, encode_file, CimResourceAllocationSettingData, CimResourceType,
    Content, EncodeOptions, Envelope, Error, ResourceAllocationSettingData, VirtualHardwareSection,
    VirtualSystem,
};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn round_trip(envelope: &Envelope, options: &EncodeOptions) -> Envelope {
    let xml = envelope
        .to_xml_string(options)
        .expect("Failed to encode envelope");
    xml.parse().expect("Failed to decode encoded envelope")
}

/// A single-VM envelope with one memory item.
fn memory_envelope() -> Envelope {
    Envelope {
        virtual_system: Some(VirtualSystem {
            content: Content {
                id: "vm".to_string(),
                info: "A virtual machine".to_string(),
                name: None,
            },
            virtual_hardware: vec![VirtualHardwareSection {
                item: vec![ResourceAllocationSettingData {
                    cim: CimResourceAllocationSettingData {
                        element_name: "2048MB of memory".to_string(),
                        instance_id: "2".to_string(),
                        resource_type: Some(CimResourceType::Memory.into()),
                        virtual_quantity: Some(2048),
                        allocation_units: Some("byte * 2^20".to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn test_round_trip_appliance() {
    init_tracing();
    let original =
        decode_file(&fixture_path("appliance.ovf")).expect("Failed to decode appliance.ovf");
    assert_eq!(round_trip(&original, &EncodeOptions::default()), original);
    assert_eq!(round_trip(&original, &EncodeOptions::compact()), original);
}

#[test]
fn test_round_trip_collection() {
    init_tracing();
    let original =
        decode_file(&fixture_path("collection.ovf")).expect("Failed to decode collection.ovf");
    assert_eq!(round_trip(&original, &EncodeOptions::default()), original);
}

#[test]
fn test_encode_is_stable() {
    let original = decode_file(&fixture_path("appliance.ovf")).unwrap();
    let first = original.to_xml_string(&EncodeOptions::default()).unwrap();
    let second = round_trip(&original, &EncodeOptions::default())
        .to_xml_string(&EncodeOptions::default())
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_memory_item_preserved_verbatim() {
    let envelope = memory_envelope();
    let xml = envelope.to_xml_string(&EncodeOptions::default()).unwrap();

    assert!(
        xml.contains("<rasd:VirtualQuantity>2048</rasd:VirtualQuantity>"),
        "OVF should contain memory quantity 2048"
    );
    assert!(
        xml.contains("<rasd:AllocationUnits>byte * 2^20</rasd:AllocationUnits>"),
        "OVF should contain allocation units verbatim"
    );
    assert!(
        xml.contains("<rasd:ResourceType>4</rasd:ResourceType>"),
        "OVF should contain Memory ResourceType 4"
    );
    assert!(
        !xml.contains("rasd:Limit"),
        "absent Limit should not be written"
    );

    let decoded: Envelope = xml.parse().unwrap();
    assert_eq!(decoded, envelope);
    let item = &decoded.virtual_system.as_ref().unwrap().virtual_hardware[0].item[0];
    assert_eq!(item.cim.virtual_quantity, Some(2048));
    assert_eq!(item.cim.allocation_units.as_deref(), Some("byte * 2^20"));
    assert_eq!(item.cim.limit, None);
    assert_eq!(item.cim.automatic_allocation, None);
}

#[test]
fn test_encoded_document_shape() {
    let original = decode_file(&fixture_path("appliance.ovf")).unwrap();
    let xml = original.to_xml_string(&EncodeOptions::default()).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("xmlns=\"http://schemas.dmtf.org/ovf/envelope/1\""));
    assert!(xml.contains("xmlns:ovf="));
    assert!(xml.contains("xmlns:rasd="));
    assert!(xml.contains("xmlns:vssd="));
    assert!(xml.contains("xmlns:vmw="));
    assert!(xml.contains("</Envelope>"));

    assert!(xml.contains("ovf:href=\"photon-disk1.vmdk\""));
    assert!(xml.contains("ovf:diskId=\"vmdisk1\""));
    assert!(xml.contains("ovf:name=\"VM Network\""));
    assert!(xml.contains("<rasd:Connection>VM Network</rasd:Connection>"));
    assert!(xml.contains("<rasd:ResourceType>35</rasd:ResourceType>"));
    assert!(xml.contains("<vssd:VirtualSystemType>vmx-13</vssd:VirtualSystemType>"));
    assert!(xml.contains("<cim:Interval>PT30S</cim:Interval>"));
    assert!(xml.contains("vmw:key=\"firmware\""));
    assert!(xml.contains("<vmw:CoresPerSocket ovf:required=\"false\">2</vmw:CoresPerSocket>"));
}

#[test]
fn test_special_characters_escaped() {
    let mut envelope = memory_envelope();
    if let Some(vs) = envelope.virtual_system.as_mut() {
        vs.content.name = Some("Test<VM>&\"Name'".to_string());
    }

    let xml = envelope.to_xml_string(&EncodeOptions::compact()).unwrap();
    assert!(xml.contains("&lt;"), "OVF should escape < character");
    assert!(xml.contains("&gt;"), "OVF should escape > character");
    assert!(xml.contains("&amp;"), "OVF should escape & character");

    let decoded: Envelope = xml.parse().unwrap();
    assert_eq!(
        decoded.virtual_system.unwrap().content.name.as_deref(),
        Some("Test<VM>&\"Name'")
    );
}

#[test]
fn test_encode_to_writer() {
    let envelope = memory_envelope();
    let mut out = Vec::new();
    encode(&envelope, &mut out, &EncodeOptions::new(Some(4), false)).unwrap();

    let xml = String::from_utf8(out).unwrap();
    assert!(xml.starts_with("<Envelope "));
    assert!(xml.contains("\n    <References/>"));
    assert_eq!(decode(xml.as_bytes()).unwrap(), envelope);
}

#[test]
fn test_file_round_trip() {
    let envelope = decode_file(&fixture_path("collection.ovf")).unwrap();
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");

    encode_file(&envelope, temp_file.path(), &EncodeOptions::default())
        .expect("Failed to write descriptor");
    let reread = decode_file(temp_file.path()).expect("Failed to read descriptor back");
    assert_eq!(reread, envelope);
}

#[test]
fn test_decode_missing_file() {
    let err = decode_file(Path::new("/nonexistent/appliance.ovf")).unwrap_err();
    assert!(matches!(err, Error::Io { path: Some(_), .. }));
    assert!(err.to_string().contains("/nonexistent/appliance.ovf"));
}

#[test]
fn test_decode_rejects_bad_value() {
    let doc = r#"<Envelope>
  <VirtualSystem ovf:id="vm">
    <Info/>
    <VirtualHardwareSection>
      <Info/>
      <Item><rasd:Limit>lots</rasd:Limit></Item>
    </VirtualHardwareSection>
  </VirtualSystem>
</Envelope>"#;
    let err = doc.parse::<Envelope>().unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("Limit"));
}

#[test]
fn test_decode_skips_unknown_elements() {
    let doc = r#"<Envelope xmlns:vbox="http://www.virtualbox.org/ovf/machine">
  <References/>
  <vbox:Machine uuid="{1234}"><Hardware/></vbox:Machine>
  <VirtualSystem ovf:id="vm" extra="ignored">
    <Info>vm</Info>
    <UnknownSection ovf:required="false"><Info/></UnknownSection>
  </VirtualSystem>
</Envelope>"#;
    let envelope: Envelope = doc.parse().unwrap();
    assert_eq!(envelope.virtual_system.unwrap().content.id, "vm");
}

#[test]
fn test_decode_rejects_structured_component_setting() {
    let doc = r#"<Envelope>
  <VirtualSystem ovf:id="vm">
    <Info/>
    <VirtualHardwareSection>
      <Info/>
      <StorageItem>
        <sasd:ComponentSetting xsi:type="CIM_Foo"><cim:Bar>42</cim:Bar></sasd:ComponentSetting>
        <sasd:InstanceID>10</sasd:InstanceID>
      </StorageItem>
    </VirtualHardwareSection>
  </VirtualSystem>
</Envelope>"#;
    let err = doc.parse::<Envelope>().unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("ComponentSetting"));
}

#[test]
fn test_decode_rejects_deep_nesting() {
    let depth = 200_000;
    let doc = format!(
        "<Envelope><References/>{}{}</Envelope>",
        "<x>".repeat(depth),
        "</x>".repeat(depth)
    );
    let err = decode(doc.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}
