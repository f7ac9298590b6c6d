//! Registry of field declarations for one document.
//!
//! Native fields are declared statically by the [`crate::profile`] catalog.
//! Developer fields are declared at runtime, by writing field description
//! messages, and are looked up here by their [`FieldId`].

use alloc::collections::BTreeMap;

use thiserror::Error;

use crate::{
    developer::{DeveloperDataId, FieldDescription, FieldId},
    profile::{self, FieldDef, MessageType},
};

/// An error resolving a field declaration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No description was registered for the developer field.
    #[error(
        "No description registered for developer field {field_definition_number} of index {developer_data_index}."
    )]
    UnknownField {
        developer_data_index: u8,
        field_definition_number: u8,
    },
}

/// Field declarations in force within one document.
#[derive(Debug, Default)]
pub struct Registry {
    descriptions: BTreeMap<FieldId, FieldDescription>,
    developers: BTreeMap<u8, DeveloperDataId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a developer field description.
    ///
    /// The first description registered for a key is kept; registering the
    /// key again has no effect. Returns the key.
    pub fn register(&mut self, description: FieldDescription) -> FieldId {
        let id = description.id();
        self.descriptions.entry(id).or_insert(description);
        id
    }

    /// Retrieve the description registered for a developer field.
    pub fn resolve(
        &self,
        developer_data_index: u8,
        field_definition_number: u8,
    ) -> Result<&FieldDescription, RegistryError> {
        let id = FieldId {
            developer_data_index,
            field_definition_number,
        };

        self.descriptions
            .get(&id)
            .ok_or(RegistryError::UnknownField {
                developer_data_index,
                field_definition_number,
            })
    }

    /// Record that a developer data id has been written to the document.
    ///
    /// As with descriptions, the first id written for an index is kept.
    pub fn mark_written(&mut self, developer: DeveloperDataId) {
        self.developers
            .entry(developer.developer_data_index)
            .or_insert(developer);
    }

    /// Retrieve the developer data id written for an index, if any.
    pub fn developer(&self, developer_data_index: u8) -> Option<&DeveloperDataId> {
        self.developers.get(&developer_data_index)
    }

    /// Retrieve the static declaration of a native field.
    pub fn native(&self, kind: MessageType, number: u8) -> Option<&'static FieldDef> {
        profile::field(kind, number)
    }

    /// Registered descriptions, ordered by key.
    pub fn descriptions(&self) -> impl Iterator<Item = &FieldDescription> {
        self.descriptions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sans::data::BaseType;

    #[test]
    fn resolve_before_register() {
        let registry = Registry::new();

        assert_eq!(
            registry.resolve(0, 1),
            Err(RegistryError::UnknownField {
                developer_data_index: 0,
                field_definition_number: 1
            })
        );
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = Registry::new();

        let first = FieldDescription::new(0, 1, BaseType::Uint8).with_name("Heart Rate");
        let second = FieldDescription::new(0, 1, BaseType::Float32).with_name("Doughnuts");

        let a = registry.register(first.clone());
        let b = registry.register(second);

        assert_eq!(a, b);
        assert_eq!(registry.resolve(0, 1), Ok(&first));
        assert_eq!(registry.descriptions().count(), 1);
    }

    #[test]
    fn keys_are_namespaced_by_index() {
        let mut registry = Registry::new();
        registry.register(FieldDescription::new(0, 1, BaseType::Uint8));
        registry.register(FieldDescription::new(1, 1, BaseType::Uint16));

        assert_eq!(registry.resolve(1, 1).unwrap().base_type, BaseType::Uint16);
        assert!(registry.resolve(2, 1).is_err());
    }

    #[test]
    fn written_developers() {
        let mut registry = Registry::new();
        assert!(registry.developer(0).is_none());

        registry.mark_written(DeveloperDataId::new([7; 16], 0));
        registry.mark_written(DeveloperDataId::new([8; 16], 0));

        assert_eq!(registry.developer(0).unwrap().application_id, [7; 16]);
    }

    #[test]
    fn native_fields() {
        let registry = Registry::new();
        let field = registry.native(MessageType::Record, profile::record::TIMESTAMP);

        assert_eq!(field.map(|f| f.base_type), Some(BaseType::Uint32));
    }
}
