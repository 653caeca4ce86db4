//! Schema compilation: reader → builder → registry.

use crate::address::AddressAllocator;
use crate::declaration::DescriptorBuilder;
use crate::reader::{Directive, SchemaReader};
use msggen_core::{
    AddressMap, CompilerConfig, Interface, NameKind, Registry, Representation, SchemaError,
    SchemaResult, Targets,
};
use std::path::Path;
use tracing::{info, warn};

/// A schema document held in memory.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    pub file: String,
    pub text: String,
}

impl SchemaSource {
    pub fn new(file: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            text: text.into(),
        }
    }

    pub fn read(path: &Path) -> SchemaResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), text))
    }
}

/// Explicit state threaded through one compilation run.
#[derive(Debug, Clone, Default)]
pub struct CompilerContext {
    config: CompilerConfig,
}

impl CompilerContext {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a message schema and an optional address schema.
    ///
    /// Both dispatch tables are validated before returning, so a registry
    /// that comes back `Ok` can be emitted without further checks.
    pub fn compile(
        &self,
        messages: &SchemaSource,
        addresses: Option<&SchemaSource>,
    ) -> SchemaResult<Registry> {
        let mut registry = self.compile_messages(messages)?;

        if let Some(addresses) = addresses {
            let map = AddressAllocator::new(&self.config.syntax)
                .allocate(&addresses.file, &addresses.text)?;
            info!(
                domains = map.domains.len(),
                entries = map.entries.len(),
                "allocated addresses"
            );
            check_shared_scope(&registry, &map)?;
            registry.set_addresses(map);
        }

        for representation in [Representation::Host, Representation::Embedded] {
            registry.dispatch_table(representation)?;
        }
        Ok(registry)
    }

    /// Read and compile schema files from disk.
    pub fn compile_files(
        &self,
        messages: &Path,
        addresses: Option<&Path>,
    ) -> SchemaResult<Registry> {
        let messages = SchemaSource::read(messages)?;
        let addresses = addresses.map(SchemaSource::read).transpose()?;
        self.compile(&messages, addresses.as_ref())
    }

    fn compile_messages(&self, source: &SchemaSource) -> SchemaResult<Registry> {
        let builder = DescriptorBuilder::new(&self.config);
        let mut registry = Registry::new();
        let mut open: Option<Interface> = None;

        for line in SchemaReader::new(&source.file, &source.text, &self.config.syntax) {
            let line = line?;
            match line.directive {
                Directive::Open(name) => {
                    if let Some(previous) = open.take() {
                        warn!(
                            interface = %previous.name,
                            location = %line.location,
                            "interface implicitly closed by next marker"
                        );
                    }
                    let targets = Targets::from_interface_name(&name, &self.config.targets);
                    if !targets.host && !targets.embedded {
                        warn!(interface = %name, "interface targets no representation");
                    }
                    let interface = Interface::new(name, targets, line.location);
                    registry.push_interface(interface.clone())?;
                    open = Some(interface);
                }
                Directive::Close => {
                    let Some(closed) = open.take() else {
                        return Err(SchemaError::syntax(
                            line.location,
                            "close marker without an open interface",
                        ));
                    };
                    info!(interface = %closed.name, "closed interface");
                }
                Directive::Declaration(text) => {
                    let Some(interface) = open.as_ref() else {
                        return Err(SchemaError::syntax(
                            line.location,
                            "declaration before any interface is open",
                        ));
                    };
                    let descriptor = builder.build(interface, &line.location, &text)?;
                    registry.push_message(descriptor)?;
                }
            }
        }

        if let Some(interface) = open {
            warn!(interface = %interface.name, file = %source.file, "interface still open at end of file");
        }
        Ok(registry)
    }
}

/// Message and address tags are both emitted as `<Name>_e` at C global
/// scope, so the two namespaces must not overlap.
fn check_shared_scope(registry: &Registry, map: &AddressMap) -> SchemaResult<()> {
    let addresses = map
        .domains
        .iter()
        .map(|d| (&d.name, &d.location, NameKind::Domain))
        .chain(
            map.entries
                .iter()
                .map(|e| (&e.name, &e.location, NameKind::Address)),
        );

    for (name, location, kind) in addresses {
        if let Some(message) = registry.message(name) {
            return Err(SchemaError::DuplicateName {
                location: location.clone(),
                kind,
                name: name.clone(),
                first: message.location.clone(),
            });
        }
    }
    Ok(())
}
