#![allow(non_snake_case)]

use super::*;
use tempfile::TempDir;

fn host(path: &str, contents: &str) -> Artifact {
    Artifact::new(Representation::Host, path, contents)
}

// ============================================================================
// compute_sha256
// ============================================================================

#[test]
fn compute_sha256___known_vector___matches() {
    let hash = compute_sha256(b"abc");

    assert_eq!(
        hash,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

// ============================================================================
// OutputWriter::write
// ============================================================================

#[test]
fn OutputWriter___write_fresh_directory___creates_files_and_manifest() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("host");
    let artifacts = [host("GS_Ui/Msg_Display.h", "a"), host("GS_Ui/src/Msg_Display.cpp", "b")];

    let summary = OutputWriter::new(&root)
        .write(Representation::Host, &artifacts)
        .unwrap();

    assert_eq!(summary.written, 2);
    assert_eq!(fs::read_to_string(root.join("GS_Ui/src/Msg_Display.cpp")).unwrap(), "b");
    let manifest = OutputManifest::load(&root).unwrap().unwrap();
    assert_eq!(manifest.representation, "host");
    assert_eq!(
        manifest.files.keys().collect::<Vec<_>>(),
        vec!["GS_Ui/Msg_Display.h", "GS_Ui/src/Msg_Display.cpp"]
    );
}

#[test]
fn OutputWriter___write_filters_other_representation___skips_it() {
    let temp = TempDir::new().unwrap();
    let artifacts = [
        host("a.h", "a"),
        Artifact::new(Representation::Embedded, "inc/a.h", "b"),
    ];

    let summary = OutputWriter::new(temp.path())
        .write(Representation::Host, &artifacts)
        .unwrap();

    assert_eq!(summary.written, 1);
    assert!(!temp.path().join("inc").exists());
}

#[test]
fn OutputWriter___rewrite_same_contents___reports_unchanged() {
    let temp = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp.path());
    let artifacts = [host("a.h", "a"), host("b.h", "b")];
    writer.write(Representation::Host, &artifacts).unwrap();

    let summary = writer
        .write(Representation::Host, &[host("a.h", "a"), host("b.h", "changed")])
        .unwrap();

    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.written, 1);
    assert_eq!(fs::read_to_string(temp.path().join("b.h")).unwrap(), "changed");
}

#[test]
fn OutputWriter___rewrite___removes_stale_files_and_empty_dirs() {
    let temp = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp.path());
    writer
        .write(Representation::Host, &[host("Old/Msg_Old.h", "x"), host("keep.h", "k")])
        .unwrap();

    let summary = writer.write(Representation::Host, &[host("keep.h", "k")]).unwrap();

    assert_eq!(summary.removed, vec!["Old/Msg_Old.h".to_string()]);
    assert!(!temp.path().join("Old").exists());
    assert!(temp.path().join("keep.h").exists());
}

#[test]
fn OutputWriter___foreign_directory___is_refused() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), "mine").unwrap();

    let result = OutputWriter::new(temp.path()).write(Representation::Host, &[host("a.h", "a")]);

    assert!(matches!(result, Err(OutputError::ForeignDirectory(_))));
    assert!(!temp.path().join("a.h").exists());
}

#[test]
fn OutputWriter___foreign_directory_with_force___writes_and_keeps_other_files() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("notes.txt"), "mine").unwrap();

    OutputWriter::new(temp.path())
        .force(true)
        .write(Representation::Host, &[host("a.h", "a")])
        .unwrap();

    assert!(temp.path().join("a.h").exists());
    assert!(temp.path().join("notes.txt").exists());
}

#[test]
fn OutputWriter___escaping_path___is_rejected_before_writing() {
    let temp = TempDir::new().unwrap();
    let artifacts = [host("a.h", "a"), host("../escape.h", "x")];

    let result = OutputWriter::new(temp.path().join("out")).write(Representation::Host, &artifacts);

    assert!(matches!(result, Err(OutputError::UnsafePath(_))));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn OutputWriter___manifest_name_as_artifact___is_rejected() {
    let temp = TempDir::new().unwrap();

    let result =
        OutputWriter::new(temp.path()).write(Representation::Host, &[host(MANIFEST_FILE, "{}")]);

    assert!(matches!(result, Err(OutputError::UnsafePath(_))));
}

#[test]
fn OutputWriter___corrupt_manifest___is_manifest_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(MANIFEST_FILE), "not json").unwrap();

    let result = OutputWriter::new(temp.path()).prepare(Representation::Host);

    assert!(matches!(result, Err(OutputError::Manifest { .. })));
}

// ============================================================================
// verify
// ============================================================================

#[test]
fn verify___untouched_tree___is_clean() {
    let temp = TempDir::new().unwrap();
    OutputWriter::new(temp.path())
        .write(Representation::Host, &[host("a.h", "a"), host("src/a.cpp", "b")])
        .unwrap();

    let report = verify(temp.path()).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.checked, 2);
}

#[test]
fn verify___edited_and_deleted_files___are_reported() {
    let temp = TempDir::new().unwrap();
    OutputWriter::new(temp.path())
        .write(Representation::Host, &[host("a.h", "a"), host("b.h", "b")])
        .unwrap();
    fs::write(temp.path().join("a.h"), "edited").unwrap();
    fs::remove_file(temp.path().join("b.h")).unwrap();

    let report = verify(temp.path()).unwrap();

    assert_eq!(report.modified, vec!["a.h".to_string()]);
    assert_eq!(report.missing, vec!["b.h".to_string()]);
    assert!(!report.is_clean());
}

#[test]
fn verify___no_manifest___is_missing_manifest() {
    let temp = TempDir::new().unwrap();

    let result = verify(temp.path());

    assert!(matches!(result, Err(OutputError::MissingManifest(_))));
}

// ============================================================================
// write_trees
// ============================================================================

#[test]
fn write_trees___splits_by_representation() {
    let temp = TempDir::new().unwrap();
    let mut set = ArtifactSet::new();
    set.push(host("a.h", "a"));
    set.push(Artifact::new(Representation::Embedded, "inc/a.h", "b"));
    let host_writer = OutputWriter::new(temp.path().join("host"));
    let embedded_writer = OutputWriter::new(temp.path().join("embedded"));

    let (host_summary, embedded_summary) =
        write_trees(&set, &host_writer, &embedded_writer).unwrap();

    assert_eq!(host_summary.written, 1);
    assert_eq!(embedded_summary.written, 1);
    assert!(temp.path().join("embedded/inc/a.h").exists());
    assert!(!temp.path().join("host/inc").exists());
}

#[test]
fn write_trees___foreign_embedded_dir___writes_nothing() {
    let temp = TempDir::new().unwrap();
    let embedded_root = temp.path().join("embedded");
    fs::create_dir(&embedded_root).unwrap();
    fs::write(embedded_root.join("main.c"), "int main;").unwrap();
    let mut set = ArtifactSet::new();
    set.push(host("a.h", "a"));
    set.push(Artifact::new(Representation::Embedded, "inc/a.h", "b"));

    let result = write_trees(
        &set,
        &OutputWriter::new(temp.path().join("host")),
        &OutputWriter::new(&embedded_root),
    );

    assert!(matches!(result, Err(OutputError::ForeignDirectory(_))));
    assert!(!temp.path().join("host").exists());
}

#[test]
fn write_trees___same_root_for_both___is_refused() {
    let temp = TempDir::new().unwrap();
    let mut set = ArtifactSet::new();
    set.push(host("a.h", "a"));
    set.push(Artifact::new(Representation::Embedded, "inc/a.h", "b"));
    let writer = OutputWriter::new(temp.path().join("out"));

    let result = write_trees(&set, &writer, &writer);

    assert!(matches!(result, Err(OutputError::OverlappingRoots { .. })));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn write_trees___nested_roots___are_refused() {
    let temp = TempDir::new().unwrap();
    let set = ArtifactSet::new();
    let host_writer = OutputWriter::new(temp.path().join("out"));
    let embedded_writer = OutputWriter::new(temp.path().join("out/fc"));

    let result = write_trees(&set, &host_writer, &embedded_writer);

    assert!(matches!(result, Err(OutputError::OverlappingRoots { .. })));
}

#[test]
fn OutputWriter___manifest_of_other_representation___is_foreign() {
    let temp = TempDir::new().unwrap();
    let writer = OutputWriter::new(temp.path());
    writer
        .write(Representation::Host, &[host("Msg_A.h", "a")])
        .unwrap();
    let embedded = [Artifact::new(Representation::Embedded, "inc/Msg_A.h", "b")];

    let result = writer.write(Representation::Embedded, &embedded);

    assert!(matches!(result, Err(OutputError::ForeignDirectory(_))));
    assert!(temp.path().join("Msg_A.h").exists());
}

#[test]
fn OutputWriter___other_representation_with_force___keeps_its_files() {
    let temp = TempDir::new().unwrap();
    OutputWriter::new(temp.path())
        .write(Representation::Host, &[host("Msg_A.h", "a")])
        .unwrap();
    let embedded = [Artifact::new(Representation::Embedded, "inc/Msg_A.h", "b")];

    let summary = OutputWriter::new(temp.path())
        .force(true)
        .write(Representation::Embedded, &embedded)
        .unwrap();

    assert!(summary.removed.is_empty());
    assert!(temp.path().join("Msg_A.h").exists());
}
