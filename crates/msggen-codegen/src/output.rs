//! Atomic writer for generated trees.
//!
//! Every run records the files it produced, with their SHA256 checksums, in
//! `.msggen-manifest.json` at the root of the output directory. The manifest
//! is what makes a directory "ours": later runs may overwrite and prune it,
//! and `verify` can detect hand edits.

use crate::artifact::{Artifact, ArtifactSet};
use crate::error::{OutputError, OutputResult};
use msggen_core::Representation;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// File name of the manifest inside an output directory.
pub const MANIFEST_FILE: &str = ".msggen-manifest.json";

const GENERATOR: &str = "msggen";

/// Record of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputManifest {
    pub generator: String,
    pub version: String,
    pub representation: String,
    /// Relative path (forward slashes) to SHA256 hex digest.
    pub files: BTreeMap<String, String>,
}

impl OutputManifest {
    fn new(representation: Representation) -> Self {
        Self {
            generator: GENERATOR.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            representation: representation.to_string(),
            files: BTreeMap::new(),
        }
    }

    /// Load the manifest of `root`, `None` when there is none.
    pub fn load(root: &Path) -> OutputResult<Option<Self>> {
        let path = root.join(MANIFEST_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(OutputError::io(path)(e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| OutputError::Manifest { path, source })
    }

    fn to_json(&self, root: &Path) -> OutputResult<String> {
        serde_json::to_string_pretty(self).map_err(|source| OutputError::Manifest {
            path: root.join(MANIFEST_FILE),
            source,
        })
    }
}

/// Outcome of [`OutputWriter::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub unchanged: usize,
    pub removed: Vec<String>,
}

/// Outcome of [`verify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub checked: usize,
    pub modified: Vec<String>,
    pub missing: Vec<String>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.missing.is_empty()
    }
}

/// Writes one representation's artifacts below a root directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
    force: bool,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            force: false,
        }
    }

    /// Allow writing into a non-empty directory without a manifest.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root may be written to, returning the previous
    /// manifest if there is one. Touches nothing.
    ///
    /// A manifest written for the other representation does not make the
    /// directory ours; its files are never pruned.
    pub fn prepare(
        &self,
        representation: Representation,
    ) -> OutputResult<Option<OutputManifest>> {
        if !self.root.exists() {
            return Ok(None);
        }
        if let Some(previous) = OutputManifest::load(&self.root)? {
            if previous.representation == representation.to_string() {
                return Ok(Some(previous));
            }
            if !self.force {
                return Err(OutputError::ForeignDirectory(self.root.clone()));
            }
            warn!(
                dir = %self.root.display(),
                found = %previous.representation,
                "Overwriting directory generated for another representation"
            );
            return Ok(None);
        }

        let mut entries = fs::read_dir(&self.root).map_err(OutputError::io(&self.root))?;
        if entries.next().is_some() {
            if !self.force {
                return Err(OutputError::ForeignDirectory(self.root.clone()));
            }
            warn!(dir = %self.root.display(), "Overwriting non-empty directory without manifest");
        }
        Ok(None)
    }

    /// Write every artifact of `representation`, prune files the previous
    /// run produced but this one did not, then record the new manifest.
    pub fn write<'a>(
        &self,
        representation: Representation,
        artifacts: impl IntoIterator<Item = &'a Artifact>,
    ) -> OutputResult<WriteSummary> {
        let previous = self.prepare(representation)?;
        let mut manifest = OutputManifest::new(representation);
        let mut summary = WriteSummary::default();

        let artifacts: Vec<&Artifact> = artifacts
            .into_iter()
            .filter(|a| a.representation == representation)
            .collect();

        // Validate every path before the first write.
        let mut keyed = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            keyed.push((manifest_key(&artifact.path)?, artifact));
        }

        fs::create_dir_all(&self.root).map_err(OutputError::io(&self.root))?;

        for (key, artifact) in keyed {
            let checksum = compute_sha256(artifact.contents.as_bytes());
            let target = self.root.join(&artifact.path);

            let recorded = previous.as_ref().and_then(|m| m.files.get(&key));
            if recorded == Some(&checksum) && file_checksum(&target)?.as_ref() == Some(&checksum) {
                summary.unchanged += 1;
            } else {
                write_atomic(&target, artifact.contents.as_bytes())?;
                debug!(file = %target.display(), "Wrote artifact");
                summary.written += 1;
            }
            manifest.files.insert(key, checksum);
        }

        if let Some(previous) = previous {
            for stale in previous.files.keys() {
                if manifest.files.contains_key(stale) {
                    continue;
                }
                let path = self.root.join(stale);
                match fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(OutputError::io(path)(e)),
                }
                prune_empty_dirs(&self.root, &path);
                debug!(file = %path.display(), "Removed stale artifact");
                summary.removed.push(stale.clone());
            }
        }

        write_atomic(
            &self.root.join(MANIFEST_FILE),
            manifest.to_json(&self.root)?.as_bytes(),
        )?;

        info!(
            dir = %self.root.display(),
            %representation,
            written = summary.written,
            unchanged = summary.unchanged,
            removed = summary.removed.len(),
            "Output tree updated"
        );
        Ok(summary)
    }
}

/// Write both trees of a run. Both roots are checked before either is
/// touched, so a refused directory leaves the other one untouched too. The
/// roots must be disjoint: neither may equal or contain the other.
pub fn write_trees(
    artifacts: &ArtifactSet,
    host: &OutputWriter,
    embedded: &OutputWriter,
) -> OutputResult<(WriteSummary, WriteSummary)> {
    if overlapping(host.root(), embedded.root()) {
        return Err(OutputError::OverlappingRoots {
            host: host.root().to_path_buf(),
            embedded: embedded.root().to_path_buf(),
        });
    }
    host.prepare(Representation::Host)?;
    embedded.prepare(Representation::Embedded)?;
    for artifact in artifacts.iter() {
        manifest_key(&artifact.path)?;
    }

    let host_summary = host.write(Representation::Host, artifacts.iter())?;
    let embedded_summary = embedded.write(Representation::Embedded, artifacts.iter())?;
    Ok((host_summary, embedded_summary))
}

/// Compare an output directory against its manifest.
pub fn verify(root: &Path) -> OutputResult<VerifyReport> {
    let manifest = OutputManifest::load(root)?
        .ok_or_else(|| OutputError::MissingManifest(root.to_path_buf()))?;
    let mut report = VerifyReport::default();

    for (key, expected) in &manifest.files {
        report.checked += 1;
        match file_checksum(&root.join(key))? {
            None => report.missing.push(key.clone()),
            Some(actual) if &actual != expected => report.modified.push(key.clone()),
            Some(_) => {}
        }
    }
    Ok(report)
}

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Whether one root equals or lies inside the other. Existing paths are
/// compared after resolving symlinks.
fn overlapping(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| {
        fs::canonicalize(p)
            .or_else(|_| std::path::absolute(p))
            .unwrap_or_else(|_| p.to_path_buf())
    };
    let (a, b) = (resolve(a), resolve(b));
    a.starts_with(&b) || b.starts_with(&a)
}

fn file_checksum(path: &Path) -> OutputResult<Option<String>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(compute_sha256(&bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(OutputError::io(path)(e)),
    }
}

/// Manifest key of a relative artifact path; rejects anything that could
/// leave the root.
fn manifest_key(path: &Path) -> OutputResult<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => return Err(OutputError::UnsafePath(path.to_path_buf())),
        }
    }
    if parts.is_empty() || parts.last().map(String::as_str) == Some(MANIFEST_FILE) {
        return Err(OutputError::UnsafePath(path.to_path_buf()));
    }
    Ok(parts.join("/"))
}

fn write_atomic(path: &Path, contents: &[u8]) -> OutputResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| OutputError::UnsafePath(path.to_path_buf()))?;
    fs::create_dir_all(parent).map_err(OutputError::io(parent))?;

    let mut file = NamedTempFile::new_in(parent).map_err(OutputError::io(parent))?;
    file.write_all(contents).map_err(OutputError::io(path))?;
    file.as_file().sync_all().map_err(OutputError::io(path))?;
    file.persist(path)
        .map_err(|e| OutputError::io(path)(e.error))?;
    Ok(())
}

fn prune_empty_dirs(root: &Path, removed: &Path) {
    let mut dir = removed.parent();
    while let Some(current) = dir {
        if current == root || fs::remove_dir(current).is_err() {
            break;
        }
        dir = current.parent();
    }
}

#[cfg(test)]
#[path = "output/output_tests.rs"]
mod output_tests;
