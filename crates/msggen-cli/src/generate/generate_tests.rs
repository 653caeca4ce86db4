#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

const MESSAGES: &str = "\
*GS_FC_Control
Msg_Param --member uint8_t control --member std::string payload
*
";

const ADDRESSES: &str = "\
*Ground
Gui
*
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(messages: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("messages.txt"), messages).unwrap();
        fs::write(dir.path().join("addresses.txt"), ADDRESSES).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn args(&self) -> GenerateArgs {
        GenerateArgs {
            messages: self.path("messages.txt"),
            addresses: self.path("addresses.txt"),
            host_out: self.path("out/host"),
            embedded_out: self.path("out/fc"),
            config: None,
            force: false,
        }
    }
}

// ============================================================================
// run
// ============================================================================

#[test]
fn run___valid_schemas___writes_both_trees() {
    let fixture = Fixture::new(MESSAGES);

    run(&fixture.args()).unwrap();

    assert!(fixture.path("out/host/GS_FC_Control/Msg_Param.h").exists());
    assert!(fixture.path("out/fc/src/Msg_Param.c").exists());
}

#[test]
fn run___missing_class_name___writes_zero_files() {
    let fixture = Fixture::new("*GS_FC_Control\n--member uint8_t control\n*\n");

    let err = run(&fixture.args()).unwrap_err();

    assert_eq!(crate::exit_code(&err), 2);
    assert!(!fixture.path("out").exists());
}

#[test]
fn run___foreign_output_dir___is_refused_without_force() {
    let fixture = Fixture::new(MESSAGES);
    fs::create_dir_all(fixture.path("out/fc")).unwrap();
    fs::write(fixture.path("out/fc/main.c"), "int main(void);").unwrap();

    let err = run(&fixture.args()).unwrap_err();

    assert_eq!(crate::exit_code(&err), 10);
    assert!(!fixture.path("out/host").exists());
}

#[test]
fn run___force___overwrites_foreign_dir() {
    let fixture = Fixture::new(MESSAGES);
    fs::create_dir_all(fixture.path("out/fc")).unwrap();
    fs::write(fixture.path("out/fc/main.c"), "int main(void);").unwrap();
    let mut args = fixture.args();
    args.force = true;

    run(&args).unwrap();

    assert!(fixture.path("out/fc/inc/Msg_Param.h").exists());
}

#[test]
fn run___shared_enums_relative_to_config___wrapped() {
    let fixture = Fixture::new(MESSAGES);
    fs::write(fixture.path("enums.h"), "enum Mode { Idle };\n").unwrap();
    fs::write(fixture.path("msggen.toml"), "[output]\nshared_enums = \"enums.h\"\n").unwrap();
    let mut args = fixture.args();
    args.config = Some(fixture.path("msggen.toml"));

    run(&args).unwrap();

    let header = fs::read_to_string(fixture.path("out/fc/inc/msg_enums.h")).unwrap();
    assert!(header.contains("enum Mode { Idle };"));
}

// ============================================================================
// load_config
// ============================================================================

#[test]
fn load_config___none___is_default() {
    let config = load_config(None).unwrap();

    assert_eq!(config.output.namespace, "QuadGS");
}

#[test]
fn load_config___invalid_file___is_config_error() {
    let fixture = Fixture::new(MESSAGES);
    fs::write(fixture.path("msggen.toml"), "[targets]\nhost_infix = \"\"\n").unwrap();

    let err = load_config(Some(&fixture.path("msggen.toml"))).unwrap_err();

    assert!(err.to_string().contains("Failed to load configuration"));
    assert_eq!(crate::exit_code(&err), 7);
}

#[test]
fn run___same_dir_for_both_trees___is_refused() {
    let fixture = Fixture::new(MESSAGES);
    let mut args = fixture.args();
    args.embedded_out = args.host_out.clone();

    let err = run(&args).unwrap_err();

    assert_eq!(crate::exit_code(&err), 13);
    assert!(!fixture.path("out").exists());
}

#[test]
fn run___common_types_pair___host_gets_stream_operators() {
    let fixture = Fixture::new(MESSAGES);
    fs::write(fixture.path("types.h"), "typedef struct { int16_t x; } Axis_t;\n").unwrap();
    fs::write(
        fixture.path("types_stream.h"),
        "BinaryOStream& operator<<(BinaryOStream& os, const Axis_t& a);\n",
    )
    .unwrap();
    fs::write(
        fixture.path("msggen.toml"),
        "[output]\ncommon_types = \"types.h\"\ncommon_types_stream = \"types_stream.h\"\n",
    )
    .unwrap();
    let mut args = fixture.args();
    args.config = Some(fixture.path("msggen.toml"));

    run(&args).unwrap();

    let host = fs::read_to_string(fixture.path("out/host/common_types.h")).unwrap();
    let embedded = fs::read_to_string(fixture.path("out/fc/inc/common_types.h")).unwrap();
    assert!(host.contains("operator<<(BinaryOStream& os, const Axis_t& a);"));
    assert!(embedded.contains("} Axis_t;"));
    assert!(!embedded.contains("operator<<"));
}

#[test]
fn SupplementFiles___missing_file___names_it() {
    let fixture = Fixture::new(MESSAGES);
    let config = CompilerConfig::parse("[output]\ncommon_types = \"absent.h\"\n").unwrap();

    let err = SupplementFiles::load(&config, Some(&fixture.path("msggen.toml"))).unwrap_err();

    assert!(err.to_string().contains("Failed to read common types"));
    assert!(err.to_string().contains("absent.h"));
}
