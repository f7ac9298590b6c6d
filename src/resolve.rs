//! Resolution of developer fields into on-wire slots.

use alloc::vec::Vec;

use thiserror::Error;

use crate::{
    developer::DeveloperField,
    message::{MAX_FIELD_SIZE, Message},
    profile::MessageType,
    registry::{Registry, RegistryError},
    sans::{
        data::{BaseType, Value},
        definition::DeveloperFieldDefinition,
    },
};

/// An error resolving a developer field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The field's description was never registered.
    #[error("{kind:?} message references an undeclared field: {source}")]
    Unresolved {
        kind: MessageType,
        source: RegistryError,
    },
    /// The developer data id for the field's index has not been written.
    #[error("{kind:?} message references developer data index {index}, not yet written.")]
    StaleDeveloperDataId { kind: MessageType, index: u8 },
    /// The value does not match the registered base type.
    #[error("Developer field {number} of index {index} holds {expected:?}, found a {found} value.")]
    TypeMismatch {
        index: u8,
        number: u8,
        expected: BaseType,
        found: &'static str,
    },
    /// The encoded value does not fit in a single field.
    #[error("Developer field {number} of index {index} encodes to {size} bytes.")]
    FieldTooLarge { index: u8, number: u8, size: usize },
}

/// A developer field resolved into its definition slot and encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub developer_data_index: u8,
    pub field_definition_number: u8,
    pub size: u8,
    pub base_type: BaseType,
    pub raw: Vec<u8>,
}

impl ResolvedField {
    /// The declaration of this field within a definition record.
    pub fn definition(&self) -> DeveloperFieldDefinition {
        DeveloperFieldDefinition {
            number: self.field_definition_number,
            size: self.size,
            developer_data_index: self.developer_data_index,
        }
    }
}

/// Resolve a developer field of a message against the registered descriptions.
///
/// Unset values resolve to the 'invalid' marker of the registered base type.
pub fn resolve(
    registry: &Registry,
    message: &Message,
    field: &DeveloperField,
) -> Result<ResolvedField, ResolveError> {
    let kind = message.kind();
    let index = field.developer_data_index;
    let number = field.field_definition_number;

    let description = registry
        .resolve(index, number)
        .map_err(|source| ResolveError::Unresolved { kind, source })?;

    if registry.developer(index).is_none() {
        Err(ResolveError::StaleDeveloperDataId { kind, index })?;
    }

    let base_type = description.base_type;

    let invalid;
    let value = match &field.value {
        Some(value) => value,
        None => {
            invalid = Value::invalid(base_type);
            &invalid
        }
    };

    if !value.matches(base_type) {
        Err(ResolveError::TypeMismatch {
            index,
            number,
            expected: base_type,
            found: value.type_name(),
        })?;
    }

    let size = value.size();
    if size > MAX_FIELD_SIZE {
        Err(ResolveError::FieldTooLarge {
            index,
            number,
            size,
        })?;
    }

    let mut raw = Vec::with_capacity(size);
    value.encode(&mut raw);

    Ok(ResolvedField {
        developer_data_index: index,
        field_definition_number: number,
        size: size as u8,
        base_type,
        raw,
    })
}
