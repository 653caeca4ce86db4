//! Drives every emitter over a compiled registry.

use crate::artifact::ArtifactSet;
use crate::build_files::BuildFileEmitter;
use crate::embedded::EmbeddedEmitter;
use crate::host::HostEmitter;
use crate::registry::{CommonTypes, RegistryEmitter};
use msggen_core::{OutputConfig, Registry, Representation, SchemaResult};
use tracing::info;

/// Renders the complete host and embedded trees in memory.
///
/// Nothing is written here; hand the returned [`ArtifactSet`] to
/// [`crate::output::write_trees`] once generation has succeeded.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'c> {
    config: &'c OutputConfig,
    shared_enums: Option<&'c str>,
    common_types: Option<CommonTypes<'c>>,
}

impl<'c> Generator<'c> {
    pub fn new(config: &'c OutputConfig) -> Self {
        Self {
            config,
            shared_enums: None,
            common_types: None,
        }
    }

    /// Contents of the shared-enums file named by the configuration.
    pub fn with_shared_enums(mut self, contents: Option<&'c str>) -> Self {
        self.shared_enums = contents;
        self
    }

    /// Contents of the common-types files named by the configuration.
    pub fn with_common_types(mut self, common_types: Option<CommonTypes<'c>>) -> Self {
        self.common_types = common_types;
        self
    }

    pub fn generate(&self, registry: &Registry) -> SchemaResult<ArtifactSet> {
        let mut set = ArtifactSet::new();
        let host = HostEmitter::new(self.config);
        let embedded = EmbeddedEmitter::new(self.config);

        for interface in registry.interfaces() {
            let members = interface
                .messages
                .iter()
                .filter_map(|name| registry.message(name));

            for message in members {
                if message.targets.includes(Representation::Host) {
                    set.extend(host.emit(message));
                }
                if message.targets.includes(Representation::Embedded) {
                    set.extend(embedded.emit(message));
                }
            }
            info!(
                interface = %interface.name,
                messages = interface.messages.len(),
                host = interface.targets.host,
                embedded = interface.targets.embedded,
                "Emitted interface"
            );
        }

        set.extend(
            RegistryEmitter::new(self.config)
                .with_shared_enums(self.shared_enums)
                .with_common_types(self.common_types)
                .emit(registry)?,
        );
        set.extend(BuildFileEmitter::new(self.config).emit(registry));
        Ok(set)
    }
}
