#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

const MESSAGES: &str = "\
*GS_FC_Control
Msg_Param --member uint8_t control
Msg_Tick --internal
*
*GS_Ui
Msg_Display --member uint16_t line
*
";

fn allocate(text: &str) -> AddressMap {
    AddressAllocator::new(&Default::default())
        .allocate("addresses.txt", text)
        .unwrap()
}

#[test]
fn address_table___two_domains___entries_under_their_domain() {
    let map = allocate("*R1\na\nb\n*R2\nc\n*\n");

    let lines = address_table(&map);

    assert_eq!(
        lines,
        vec![
            "0x0000  R1",
            "0x0000    a",
            "0x0001    b",
            "0x0100  R2",
            "0x0100    c",
        ]
    );
}

#[test]
fn summary___counts_per_representation() {
    let registry = CompilerContext::default()
        .compile(&SchemaSource::new("messages.txt", MESSAGES), None)
        .unwrap();

    let lines = summary(&registry);

    assert_eq!(lines[0], "Interfaces: 2 (2 host, 1 embedded)");
    assert_eq!(lines[1], "Messages: 3 (3 host, 2 embedded, 1 internal)");
    assert_eq!(lines[2], "Addresses: 0 in 0 domains");
}

#[test]
fn check___invalid_schema___fails_with_schema_code() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("messages.txt");
    fs::write(&path, "*GS_Ui\nMsg_A --member uint8_t\n*\n").unwrap();

    let err = check(&path, None, None).unwrap_err();

    assert_eq!(crate::exit_code(&err), 2);
}

#[test]
fn verify___missing_manifest___fails_with_output_code() {
    let temp = TempDir::new().unwrap();

    let err = verify(temp.path()).unwrap_err();

    assert_eq!(crate::exit_code(&err), 11);
}

#[test]
fn verify___edited_file___fails() {
    let temp = TempDir::new().unwrap();
    let set = {
        let mut set = msggen_codegen::ArtifactSet::new();
        set.push(msggen_codegen::Artifact::new(Representation::Host, "a.h", "a"));
        set
    };
    msggen_codegen::OutputWriter::new(temp.path())
        .write(Representation::Host, set.iter())
        .unwrap();
    fs::write(temp.path().join("a.h"), "b").unwrap();

    let err = verify(temp.path()).unwrap_err();

    assert!(err.to_string().contains("1 of 1 files differ"));
}
