//! In-memory generated files.
//!
//! Nothing touches the filesystem until every artifact of a run has been
//! rendered; see [`crate::output`] for the write side.

use msggen_core::Representation;
use std::path::{Path, PathBuf};

/// One generated file, relative to its representation's output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub representation: Representation,
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(
        representation: Representation,
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            representation,
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Every file produced by one run, in emission order.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, artifact: Artifact) {
        self.artifacts.push(artifact);
    }

    pub fn extend(&mut self, artifacts: impl IntoIterator<Item = Artifact>) {
        self.artifacts.extend(artifacts);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    /// Files belonging to one output tree.
    pub fn for_representation(
        &self,
        representation: Representation,
    ) -> impl Iterator<Item = &Artifact> {
        self.artifacts
            .iter()
            .filter(move |a| a.representation == representation)
    }

    pub fn get(&self, representation: Representation, path: impl AsRef<Path>) -> Option<&Artifact> {
        let path = path.as_ref();
        self.artifacts
            .iter()
            .find(|a| a.representation == representation && a.path == path)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
