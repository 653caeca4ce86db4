#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn targets_config() -> TargetConfig {
    TargetConfig::default()
}

#[test_case("GS_Parameters", true, false ; "host only")]
#[test_case("FC_Control", false, true ; "embedded only")]
#[test_case("GS_FC_Log", true, true ; "both")]
#[test_case("Internal", false, false ; "neither")]
fn Targets___from_interface_name___matches_infixes(name: &str, host: bool, embedded: bool) {
    let targets = Targets::from_interface_name(name, &targets_config());

    assert_eq!(targets, Targets { host, embedded });
}

#[test]
fn Targets___includes___checks_each_representation() {
    let targets = Targets {
        host: true,
        embedded: false,
    };

    assert!(targets.includes(Representation::Host));
    assert!(!targets.includes(Representation::Embedded));
}

#[test_case("uint8_t", ScalarType::U8, 1)]
#[test_case("int16_t", ScalarType::I16, 2)]
#[test_case("uint32_t", ScalarType::U32, 4)]
#[test_case("float", ScalarType::F32, 4)]
#[test_case("double", ScalarType::F64, 8)]
#[test_case("int64_t", ScalarType::I64, 8)]
#[test_case("bool", ScalarType::Bool, 1)]
fn ScalarType___from_c_name___resolves_with_width(name: &str, expected: ScalarType, width: usize) {
    let ty = ScalarType::from_c_name(name).unwrap();

    assert_eq!(ty, expected);
    assert_eq!(ty.width(), width);
    assert_eq!(ty.to_string(), name);
}

#[test]
fn ScalarType___from_c_name___rejects_unknown() {
    assert_eq!(ScalarType::from_c_name("std::string"), None);
    assert_eq!(ScalarType::from_c_name("uint8"), None);
}

#[test]
fn FieldKind___stream_delimited___only_for_unbounded_kinds() {
    assert!(!FieldKind::Scalar(ScalarType::U8).is_stream_delimited());
    assert!(FieldKind::Text.is_stream_delimited());
    assert!(!FieldKind::OwnedValue(OwnedCore::Scalar(ScalarType::U32)).is_stream_delimited());
    assert!(FieldKind::OwnedValue(OwnedCore::Opaque("Foo".into())).is_stream_delimited());
}

#[test]
fn AddressEntry___address___packs_region_and_index() {
    let entry = AddressEntry {
        name: "Log".into(),
        region: 2,
        index: 5,
        location: SourceLocation::new("addr.txt", 1),
    };

    assert_eq!(entry.address(), 0x0205);
}

#[test]
fn Domain___value___is_region_shifted() {
    let domain = Domain {
        name: "FC".into(),
        region: 1,
        location: SourceLocation::new("addr.txt", 1),
    };

    assert_eq!(domain.value(), 0x0100);
}

#[test]
fn AddressMap___lookup___finds_by_name() {
    let map = AddressMap {
        domains: vec![],
        entries: vec![AddressEntry {
            name: "Param".into(),
            region: 0,
            index: 1,
            location: SourceLocation::new("addr.txt", 3),
        }],
    };

    assert_eq!(map.entry("Param").map(|e| e.address()), Some(1));
    assert!(map.entry("Missing").is_none());
    assert!(!map.is_empty());
}

#[test]
fn Representation___display___is_lowercase() {
    assert_eq!(Representation::Host.to_string(), "host");
    assert_eq!(Representation::Embedded.to_string(), "embedded");
}
