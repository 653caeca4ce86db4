//! msggen-codegen - C++ and C emitters for compiled message schemas
//!
//! Rendering is pure: [`Generator`] turns a [`msggen_core::Registry`] into an
//! [`ArtifactSet`] held in memory. Only [`output`] touches the filesystem,
//! and only once the whole set exists.

mod artifact;
mod build_files;
mod embedded;
mod error;
mod generator;
mod host;
pub mod output;
mod registry;
mod render;

pub use artifact::{Artifact, ArtifactSet};
pub use build_files::BuildFileEmitter;
pub use embedded::EmbeddedEmitter;
pub use error::{OutputError, OutputResult};
pub use generator::Generator;
pub use host::HostEmitter;
pub use output::{
    MANIFEST_FILE, OutputManifest, OutputWriter, VerifyReport, WriteSummary, compute_sha256,
    verify, write_trees,
};
pub use registry::{CommonTypes, RegistryEmitter};
