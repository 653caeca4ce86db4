//! Two-level address allocation.
//!
//! Each open marker starts a region numbered by how many region markers came
//! before it; entries inside get consecutive indices from 0. An address is
//! `(region << 8) | index` and both halves must fit in 8 bits.

use crate::reader::{Directive, SchemaReader};
use msggen_core::naming::is_identifier;
use msggen_core::{
    AddressEntry, AddressMap, Domain, NameKind, SchemaError, SchemaResult, SourceLocation,
    SyntaxConfig,
};
use std::collections::HashMap;
use tracing::{debug, warn};

const SLOT_LIMIT: usize = 256;

/// Allocates addresses from an address schema, in file order.
pub struct AddressAllocator {
    syntax: SyntaxConfig,
}

impl AddressAllocator {
    pub fn new(syntax: &SyntaxConfig) -> Self {
        Self {
            syntax: syntax.clone(),
        }
    }

    pub fn allocate(&self, file: &str, text: &str) -> SchemaResult<AddressMap> {
        let mut map = AddressMap::default();
        // Domain and address enumerators share one C scope.
        let mut names: HashMap<String, SourceLocation> = HashMap::new();
        let mut regions_seen = 0usize;
        let mut open: Option<u8> = None;
        let mut index = 0usize;

        for line in SchemaReader::new(file, text, &self.syntax) {
            let line = line?;
            let location = line.location;
            match line.directive {
                Directive::Open(name) => {
                    if let Some(region) = open {
                        warn!(%location, region, "region opened without closing the previous one");
                    }
                    let region = fit(regions_seen, "region", &location)?;
                    claim(&mut names, &name, NameKind::Domain, &location)?;
                    debug!(%name, region, "opened address region");
                    map.domains.push(Domain {
                        name,
                        region,
                        location,
                    });
                    regions_seen += 1;
                    open = Some(region);
                    index = 0;
                }
                Directive::Close => {
                    if open.take().is_none() {
                        return Err(SchemaError::syntax(
                            location,
                            "close marker without an open region",
                        ));
                    }
                }
                Directive::Declaration(name) => {
                    let Some(region) = open else {
                        return Err(SchemaError::syntax(
                            location,
                            format!("address '{name}' declared outside any region"),
                        ));
                    };
                    if !is_identifier(&name) {
                        return Err(SchemaError::syntax(
                            location,
                            format!("address name '{name}' is not a single identifier"),
                        ));
                    }
                    let slot = fit(index, "index", &location)?;
                    claim(&mut names, &name, NameKind::Address, &location)?;
                    map.entries.push(AddressEntry {
                        name,
                        region,
                        index: slot,
                        location,
                    });
                    index += 1;
                }
            }
        }

        if let Some(region) = open {
            warn!(file, region, "address schema ends with an open region");
        }
        Ok(map)
    }
}

fn fit(value: usize, part: &'static str, location: &SourceLocation) -> SchemaResult<u8> {
    if value >= SLOT_LIMIT {
        return Err(SchemaError::AddressOverflow {
            location: location.clone(),
            part,
            value,
        });
    }
    Ok(value as u8)
}

fn claim(
    names: &mut HashMap<String, SourceLocation>,
    name: &str,
    kind: NameKind,
    location: &SourceLocation,
) -> SchemaResult<()> {
    if let Some(first) = names.get(name) {
        return Err(SchemaError::DuplicateName {
            location: location.clone(),
            kind,
            name: name.to_string(),
            first: first.clone(),
        });
    }
    names.insert(name.to_string(), location.clone());
    Ok(())
}
