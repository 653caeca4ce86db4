#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn loc(line: usize) -> SourceLocation {
    SourceLocation::new("messages.txt", line)
}

#[test]
fn SourceLocation___display___is_file_colon_line() {
    assert_eq!(loc(12).to_string(), "messages.txt:12");
}

#[test]
fn SchemaError___syntax___names_offending_line() {
    let err = SchemaError::syntax(loc(7), "missing message name");

    assert_eq!(
        err.to_string(),
        "messages.txt:7: syntax error: missing message name"
    );
}

#[test]
fn SchemaError___duplicate_name___displays_both_locations() {
    let err = SchemaError::DuplicateName {
        location: loc(9),
        kind: NameKind::Message,
        name: "Msg_Log".into(),
        first: loc(3),
    };

    let msg = err.to_string();

    assert!(msg.starts_with("messages.txt:9:"));
    assert!(msg.contains("duplicate message name 'Msg_Log'"));
    assert!(msg.contains("messages.txt:3"));
}

#[test]
fn SchemaError___address_overflow___displays_value() {
    let err = SchemaError::AddressOverflow {
        location: loc(300),
        part: "index",
        value: 256,
    };

    assert_eq!(
        err.to_string(),
        "messages.txt:300: address overflow: index 256 does not fit in 8 bits"
    );
}

#[test]
fn SchemaError___from_config_error___is_transparent() {
    let err: SchemaError = ConfigError::Invalid("empty host infix".into()).into();

    assert_eq!(err.to_string(), "invalid configuration: empty host infix");
    assert!(err.location().is_none());
}

#[test_case(SchemaError::syntax(loc(1), "x"), 2 ; "syntax")]
#[test_case(SchemaError::DuplicateName { location: loc(1), kind: NameKind::Field, name: "a".into(), first: loc(1) }, 3 ; "duplicate")]
#[test_case(SchemaError::AddressOverflow { location: loc(1), part: "region", value: 256 }, 4 ; "overflow")]
#[test_case(SchemaError::Dispatch { representation: Representation::Embedded, name: "a".into(), type_id: 1, entries: 0 }, 5 ; "dispatch")]
#[test_case(SchemaError::Io { path: "x".into(), source: std::io::Error::other("boom") }, 6 ; "io")]
#[test_case(SchemaError::Config(ConfigError::Invalid("x".into())), 7 ; "config")]
fn SchemaError___variant___maps_to_exit_code(err: SchemaError, expected: u8) {
    assert_eq!(err.error_code(), expected);
}

#[test]
fn SchemaError___location___present_for_line_errors() {
    let err = SchemaError::syntax(loc(4), "bad");

    assert_eq!(err.location(), Some(&loc(4)));
}

#[test]
fn NameKind___display___is_lowercase() {
    assert_eq!(NameKind::Address.to_string(), "address");
    assert_eq!(NameKind::Domain.to_string(), "domain");
}
