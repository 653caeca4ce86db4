//! Registry: every message and address of one schema, in declaration order.
//!
//! Type ids are positions in the master enumeration. `Msg_NoType` holds id 0,
//! declared messages follow from id 1, and `Msg_LastType` closes the list.
//! Ids are therefore append-only: adding a message never renumbers an earlier
//! one.

use crate::error::{NameKind, SchemaError, SchemaResult};
use crate::model::{AddressMap, Interface, MessageDescriptor, Representation};
use tracing::debug;

/// Reserved first entry of the master enumeration.
pub const NO_TYPE: &str = "Msg_NoType";

/// Reserved sentinel closing the master enumeration.
pub const LAST_TYPE: &str = "Msg_LastType";

/// One type-id → decoder mapping in a dispatch table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    pub type_id: u32,
    pub name: String,
}

/// The aggregated schema.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    interfaces: Vec<Interface>,
    messages: Vec<MessageDescriptor>,
    addresses: AddressMap,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interface. Interface names are unique.
    pub fn push_interface(&mut self, interface: Interface) -> SchemaResult<()> {
        if let Some(first) = self.interfaces.iter().find(|i| i.name == interface.name) {
            return Err(SchemaError::DuplicateName {
                location: interface.location,
                kind: NameKind::Interface,
                name: interface.name,
                first: first.location.clone(),
            });
        }
        self.interfaces.push(interface);
        Ok(())
    }

    /// Append a message and list it under its interface.
    pub fn push_message(&mut self, message: MessageDescriptor) -> SchemaResult<u32> {
        if message.name == NO_TYPE || message.name == LAST_TYPE {
            return Err(SchemaError::syntax(
                message.location,
                format!("'{}' is a reserved message name", message.name),
            ));
        }
        if let Some(first) = self.messages.iter().find(|m| m.name == message.name) {
            return Err(SchemaError::DuplicateName {
                location: message.location,
                kind: NameKind::Message,
                name: message.name,
                first: first.location.clone(),
            });
        }
        let Some(interface) = self
            .interfaces
            .iter_mut()
            .find(|i| i.name == message.interface)
        else {
            return Err(SchemaError::syntax(
                message.location,
                format!("unknown interface '{}'", message.interface),
            ));
        };
        interface.messages.push(message.name.clone());

        let id = self.messages.len() as u32 + 1;
        debug!(id, name = %message.name, "registered message");
        self.messages.push(message);
        Ok(id)
    }

    pub fn set_addresses(&mut self, addresses: AddressMap) {
        self.addresses = addresses;
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn messages(&self) -> &[MessageDescriptor] {
        &self.messages
    }

    pub fn addresses(&self) -> &AddressMap {
        &self.addresses
    }

    pub fn message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.iter().find(|m| m.name == name)
    }

    /// Type id of a declared message.
    pub fn type_id(&self, name: &str) -> Option<u32> {
        self.messages
            .iter()
            .position(|m| m.name == name)
            .map(|index| index as u32 + 1)
    }

    /// Message declared under `type_id`, if any.
    pub fn by_id(&self, type_id: u32) -> Option<&MessageDescriptor> {
        let index = usize::try_from(type_id).ok()?.checked_sub(1)?;
        self.messages.get(index)
    }

    /// Id of the `Msg_LastType` sentinel.
    pub fn last_type_id(&self) -> u32 {
        self.messages.len() as u32 + 1
    }

    /// Full enumeration in id order, sentinels included.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.messages.len() + 2);
        names.push(NO_TYPE);
        names.extend(self.messages.iter().map(|m| m.name.as_str()));
        names.push(LAST_TYPE);
        names
    }

    /// Messages emitted for `representation`, internal ones included.
    pub fn messages_for(
        &self,
        representation: Representation,
    ) -> impl Iterator<Item = &MessageDescriptor> {
        self.messages
            .iter()
            .filter(move |m| m.targets.includes(representation))
    }

    /// Interfaces targeting `representation`.
    pub fn interfaces_for(&self, representation: Representation) -> impl Iterator<Item = &Interface> {
        self.interfaces
            .iter()
            .filter(move |i| i.targets.includes(representation))
    }

    /// Build the type-id → decoder table for untyped wire traffic.
    ///
    /// Entries are collected from the interface member lists. Every message
    /// that carries a wire codec in `representation` must end up with exactly
    /// one entry, otherwise the whole build fails.
    pub fn dispatch_table(&self, representation: Representation) -> SchemaResult<Vec<DispatchEntry>> {
        let mut entries = Vec::new();
        for interface in self.interfaces_for(representation) {
            for name in &interface.messages {
                let Some(message) = self.message(name) else {
                    continue;
                };
                if !message.is_wire(representation) {
                    continue;
                }
                if let Some(type_id) = self.type_id(name) {
                    entries.push(DispatchEntry {
                        type_id,
                        name: name.clone(),
                    });
                }
            }
        }

        for message in self.messages.iter().filter(|m| m.is_wire(representation)) {
            let type_id = self.type_id(&message.name).unwrap_or_default();
            let count = entries.iter().filter(|e| e.type_id == type_id).count();
            if count != 1 {
                return Err(SchemaError::Dispatch {
                    representation,
                    name: message.name.clone(),
                    type_id,
                    entries: count,
                });
            }
        }

        entries.sort_by_key(|e| e.type_id);
        Ok(entries)
    }
}
