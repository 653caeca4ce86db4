//! End-to-end: schema text in, both output trees on disk.

#![allow(non_snake_case)]

use msggen_codegen::{Generator, OutputWriter, verify, write_trees};
use msggen_core::OutputConfig;
use msggen_schema::{CompilerContext, SchemaSource};
use std::fs;
use tempfile::TempDir;

const MESSAGES: &str = "\
# control link
*GS_FC_Control
Msg_Param --member uint8_t control --member uint16_t seq --member std::string payload
Msg_Tick --internal
*

*GS_Ui
Msg_Display --member uint16_t line
*
";

const ADDRESSES: &str = "\
*Ground
Gui
*Flight
Control
Logger
*
";

fn generate(messages: &str) -> Result<msggen_codegen::ArtifactSet, msggen_core::SchemaError> {
    let registry = CompilerContext::default().compile(
        &SchemaSource::new("messages.txt", messages),
        Some(&SchemaSource::new("addresses.txt", ADDRESSES)),
    )?;
    Generator::new(&OutputConfig::default()).generate(&registry)
}

#[test]
fn generate___full_schema___writes_both_trees() {
    let temp = TempDir::new().unwrap();
    let host = OutputWriter::new(temp.path().join("host"));
    let embedded = OutputWriter::new(temp.path().join("embedded"));
    let set = generate(MESSAGES).unwrap();

    write_trees(&set, &host, &embedded).unwrap();

    let header = fs::read_to_string(temp.path().join("host/GS_FC_Control/Msg_Param.h")).unwrap();
    assert!(header.contains("class Msg_Param: public QGS_ModuleMsgBase"));
    let source = fs::read_to_string(temp.path().join("embedded/src/Msg_Param.c")).unwrap();
    assert!(source.contains("Msg_ParamCreate("));
    let addresses = fs::read_to_string(temp.path().join("embedded/inc/msgAddr.h")).unwrap();
    assert!(addresses.contains("Logger_e = 0x101"));
    assert!(verify(host.root()).unwrap().is_clean());
    assert!(verify(embedded.root()).unwrap().is_clean());
}

#[test]
fn generate___dropped_message___removed_on_regeneration() {
    let temp = TempDir::new().unwrap();
    let host = OutputWriter::new(temp.path().join("host"));
    let embedded = OutputWriter::new(temp.path().join("embedded"));
    write_trees(&generate(MESSAGES).unwrap(), &host, &embedded).unwrap();
    let trimmed = MESSAGES.replace("Msg_Display --member uint16_t line\n", "");

    let (host_summary, _) = write_trees(&generate(&trimmed).unwrap(), &host, &embedded).unwrap();

    assert!(host_summary.removed.contains(&"GS_Ui/Msg_Display.h".to_string()));
    assert!(!temp.path().join("host/GS_Ui/Msg_Display.h").exists());
}

#[test]
fn generate___missing_class_name___writes_nothing() {
    let temp = TempDir::new().unwrap();
    let broken = MESSAGES.replace("Msg_Tick --internal", "--internal");

    let result = generate(&broken);

    assert!(result.is_err());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}
