//! Read-only commands: `check`, `verify` and `addresses`.

use crate::generate::load_config;
use anyhow::{Result, bail};
use msggen_core::{AddressMap, Registry, Representation};
use msggen_schema::{AddressAllocator, CompilerContext, SchemaSource};
use std::path::Path;

pub fn check(messages: &Path, addresses: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let context = CompilerContext::new(load_config(config)?);

    println!("Checking schema: {}", messages.display());
    let registry = context.compile_files(messages, addresses)?;

    for line in summary(&registry) {
        println!("✓ {line}");
    }
    println!("\nSchema is valid!");
    Ok(())
}

pub fn verify(dir: &Path) -> Result<()> {
    println!("Verifying: {}", dir.display());
    let report = msggen_codegen::verify(dir)?;

    for file in &report.modified {
        println!("✗ modified: {file}");
    }
    for file in &report.missing {
        println!("✗ missing: {file}");
    }
    if !report.is_clean() {
        bail!(
            "{} of {} files differ from the manifest",
            report.modified.len() + report.missing.len(),
            report.checked
        );
    }

    println!("✓ {} files match the manifest", report.checked);
    Ok(())
}

pub fn addresses(path: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let source = SchemaSource::read(path)?;
    let map = AddressAllocator::new(&config.syntax).allocate(&source.file, &source.text)?;

    for line in address_table(&map) {
        println!("{line}");
    }
    Ok(())
}

/// One line per fact printed by `check`.
pub fn summary(registry: &Registry) -> Vec<String> {
    let count = |representation| registry.messages_for(representation).count();
    let internal = registry.messages().iter().filter(|m| m.internal).count();
    let addresses = registry.addresses();

    vec![
        format!(
            "Interfaces: {} ({} host, {} embedded)",
            registry.interfaces().len(),
            registry.interfaces_for(Representation::Host).count(),
            registry.interfaces_for(Representation::Embedded).count()
        ),
        format!(
            "Messages: {} ({} host, {} embedded, {} internal)",
            registry.messages().len(),
            count(Representation::Host),
            count(Representation::Embedded),
            internal
        ),
        format!(
            "Addresses: {} in {} domains",
            addresses.entries.len(),
            addresses.domains.len()
        ),
    ]
}

/// Domains with their entries indented below them, in file order.
pub fn address_table(map: &AddressMap) -> Vec<String> {
    let mut lines = Vec::new();
    for domain in &map.domains {
        lines.push(format!("{:#06x}  {}", domain.value(), domain.name));
        for entry in map.entries.iter().filter(|e| e.region == domain.region) {
            lines.push(format!("{:#06x}    {}", entry.address(), entry.name));
        }
    }
    lines
}

#[cfg(test)]
#[path = "check/check_tests.rs"]
mod check_tests;
