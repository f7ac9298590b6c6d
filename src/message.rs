//! The generic message model.
//!
//! A [`Message`] is a message type plus a map from field number to value. The
//! same structure serves every message type; the [`crate::profile`] catalog
//! decides which field numbers exist and which base type each one holds.

use alloc::{collections::BTreeMap, vec::Vec};

use thiserror::Error;

use crate::{
    developer::{DeveloperDataId, DeveloperField, FieldDescription},
    profile::{self, MessageType},
};

pub use crate::sans::data::{BaseType, Value};

/// Largest number of bytes a single field may occupy.
pub const MAX_FIELD_SIZE: usize = u8::MAX as usize;

/// An error building a message.
#[derive(Debug, Error, PartialEq)]
pub enum MessageError {
    /// The field number is not declared for the message type.
    #[error("Field {number} is not declared for {kind:?} messages.")]
    UnknownField { kind: MessageType, number: u8 },
    /// The value's primitive does not match the field's base type.
    #[error("Field {number} holds {expected:?}, found a {found} value.")]
    TypeMismatch {
        number: u8,
        expected: BaseType,
        found: &'static str,
    },
    /// The encoded value does not fit in a single field.
    #[error("Field {number} encodes to {size} bytes, more than a field can hold.")]
    FieldTooLarge { number: u8, size: usize },
    /// The value encodes to no bytes at all.
    #[error("Field {number} holds an empty byte array.")]
    EmptyValue { number: u8 },
    /// A field description and developer data id disagree on their index.
    #[error(
        "Field description belongs to developer data index {description}, not {developer_data_id}."
    )]
    DeveloperIndexMismatch {
        description: u8,
        developer_data_id: u8,
    },
    /// A message already holds the largest number of developer fields.
    #[error("Too many developer fields.")]
    TooManyDeveloperFields,
    /// A field required to interpret the message is missing or malformed.
    #[error("{kind:?} message is missing field {number}.")]
    MissingField { kind: MessageType, number: u8 },
}

/// A message: a message type, native field values ordered by field number, and
/// developer fields in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    kind: MessageType,
    fields: BTreeMap<u8, (BaseType, Value)>,
    developer_fields: Vec<DeveloperField>,
}

impl Message {
    /// Create an empty message of a type.
    pub fn new(kind: MessageType) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
            developer_fields: Vec::new(),
        }
    }

    pub fn kind(&self) -> MessageType {
        self.kind
    }

    /// Set a native field, replacing any earlier value.
    ///
    /// To write a field holding its 'invalid' marker, set it to
    /// [`Value::invalid`] of its base type.
    pub fn set_field(
        &mut self,
        number: u8,
        value: impl Into<Value>,
    ) -> Result<&mut Self, MessageError> {
        let value = value.into();

        let field = profile::field(self.kind, number).ok_or(MessageError::UnknownField {
            kind: self.kind,
            number,
        })?;

        check_value(number, field.base_type, &value)?;

        self.fields.insert(number, (field.base_type, value));
        Ok(self)
    }

    /// Remove a native field, returning its value if it was set.
    pub fn clear_field(&mut self, number: u8) -> Option<Value> {
        self.fields.remove(&number).map(|(_, value)| value)
    }

    /// Retrieve the value of a native field.
    pub fn field(&self, number: u8) -> Option<&Value> {
        self.fields.get(&number).map(|(_, value)| value)
    }

    /// Native fields in ascending field number order, with their base types.
    pub fn fields(&self) -> impl Iterator<Item = (u8, BaseType, &Value)> {
        self.fields
            .iter()
            .map(|(number, (base_type, value))| (*number, *base_type, value))
    }

    /// Attach a value for a developer field.
    ///
    /// `None` writes the field's 'invalid' marker. Adding a field already
    /// present replaces its value in place.
    pub fn add_developer_field(
        &mut self,
        description: &FieldDescription,
        developer_data_id: &DeveloperDataId,
        value: Option<Value>,
    ) -> Result<&mut Self, MessageError> {
        if description.developer_data_index != developer_data_id.developer_data_index {
            Err(MessageError::DeveloperIndexMismatch {
                description: description.developer_data_index,
                developer_data_id: developer_data_id.developer_data_index,
            })?;
        }

        if let Some(value) = &value {
            check_value(
                description.field_definition_number,
                description.base_type,
                value,
            )?;
        }

        let field = DeveloperField {
            developer_data_index: description.developer_data_index,
            field_definition_number: description.field_definition_number,
            value,
        };

        let key = field.key();

        if let Some(existing) = self.developer_fields.iter_mut().find(|f| f.key() == key) {
            *existing = field;
        } else if self.developer_fields.len() == u8::MAX as usize {
            Err(MessageError::TooManyDeveloperFields)?;
        } else {
            self.developer_fields.push(field);
        }

        Ok(self)
    }

    /// Developer fields in the order they were first added.
    pub fn developer_fields(&self) -> &[DeveloperField] {
        &self.developer_fields
    }

    /// Insert a field known to match the catalog, bypassing checks.
    pub(crate) fn insert(&mut self, number: u8, base_type: BaseType, value: Value) {
        self.fields.insert(number, (base_type, value));
    }
}

/// Check a value against the base type of the field receiving it.
pub(crate) fn check_value(
    number: u8,
    base_type: BaseType,
    value: &Value,
) -> Result<(), MessageError> {
    if !value.matches(base_type) {
        Err(MessageError::TypeMismatch {
            number,
            expected: base_type,
            found: value.type_name(),
        })?;
    }

    let size = value.size();
    if size == 0 {
        Err(MessageError::EmptyValue { number })?;
    }
    if size > MAX_FIELD_SIZE {
        Err(MessageError::FieldTooLarge { number, size })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;
    use crate::profile::{developer_data_id, record, session};

    fn developer() -> DeveloperDataId {
        DeveloperDataId::new([0; 16], 0)
    }

    fn heart_rate() -> FieldDescription {
        FieldDescription::new(0, 1, BaseType::Uint8)
    }

    #[test]
    fn fields_are_ordered_by_number() {
        let mut message = Message::new(MessageType::Record);
        message
            .set_field(record::TIMESTAMP, 10u32)
            .unwrap()
            .set_field(record::HEART_RATE, 120u8)
            .unwrap()
            .set_field(record::DISTANCE, 5u32)
            .unwrap();

        let numbers: Vec<u8> = message.fields().map(|(n, _, _)| n).collect();
        assert_eq!(numbers, [3, 5, 253]);
    }

    #[test]
    fn unknown_field() {
        let mut message = Message::new(MessageType::Lap);
        let err = message.set_field(200, 1u8).unwrap_err();

        assert_eq!(
            err,
            MessageError::UnknownField {
                kind: MessageType::Lap,
                number: 200
            }
        );
    }

    #[test]
    fn type_mismatch() {
        let mut message = Message::new(MessageType::Record);
        let err = message.set_field(record::HEART_RATE, 120u16).unwrap_err();

        assert_eq!(
            err,
            MessageError::TypeMismatch {
                number: record::HEART_RATE,
                expected: BaseType::Uint8,
                found: "u16"
            }
        );
        assert!(message.field(record::HEART_RATE).is_none());
    }

    #[test]
    fn empty_byte_array() {
        let mut message = Message::new(MessageType::DeveloperDataId);
        let err = message
            .set_field(developer_data_id::DEVELOPER_ID, Value::Bytes(Vec::new()))
            .unwrap_err();

        assert_eq!(
            err,
            MessageError::EmptyValue {
                number: developer_data_id::DEVELOPER_ID
            }
        );
        assert!(message.field(developer_data_id::DEVELOPER_ID).is_none());

        let blob = FieldDescription::new(0, 2, BaseType::Byte);
        let err = Message::new(MessageType::Record)
            .add_developer_field(&blob, &developer(), Some(Value::Bytes(Vec::new())))
            .unwrap_err();
        assert_eq!(err, MessageError::EmptyValue { number: 2 });
    }

    #[test]
    fn field_too_large() {
        let mut message = Message::new(MessageType::FileId);
        let name: String = core::iter::repeat_n('x', 255).collect();
        let err = message.set_field(crate::profile::file_id::PRODUCT_NAME, name);

        assert!(matches!(err, Err(MessageError::FieldTooLarge { size: 256, .. })));
    }

    #[test]
    fn replacing_fields() {
        let mut message = Message::new(MessageType::Session);
        message.set_field(session::NUM_LAPS, 1u16).unwrap();
        message.set_field(session::NUM_LAPS, 2u16).unwrap();

        assert_eq!(message.field(session::NUM_LAPS), Some(&Value::U16(2)));
        assert_eq!(message.clear_field(session::NUM_LAPS), Some(Value::U16(2)));
        assert_eq!(message.fields().count(), 0);
    }

    #[test]
    fn developer_fields() {
        let mut message = Message::new(MessageType::Record);
        message
            .add_developer_field(&heart_rate(), &developer(), Some(Value::U8(90)))
            .unwrap();
        message
            .add_developer_field(&heart_rate(), &developer(), Some(Value::U8(91)))
            .unwrap();

        assert_eq!(
            message.developer_fields(),
            [DeveloperField {
                developer_data_index: 0,
                field_definition_number: 1,
                value: Some(Value::U8(91)),
            }]
        );
    }

    #[test]
    fn developer_field_type_mismatch() {
        let mut message = Message::new(MessageType::Record);
        let err = message
            .add_developer_field(&heart_rate(), &developer(), Some(Value::F32(1.0)))
            .unwrap_err();

        assert!(matches!(err, MessageError::TypeMismatch { number: 1, .. }));
        assert!(message.developer_fields().is_empty());
    }

    #[test]
    fn developer_index_mismatch() {
        let mut message = Message::new(MessageType::Record);
        let other = DeveloperDataId::new([1; 16], 1);
        let err = message
            .add_developer_field(&heart_rate(), &other, None)
            .unwrap_err();

        assert_eq!(
            err,
            MessageError::DeveloperIndexMismatch {
                description: 0,
                developer_data_id: 1
            }
        );
    }

    #[test]
    fn unset_developer_field() {
        let mut message = Message::new(MessageType::Record);
        message
            .add_developer_field(&heart_rate(), &developer(), None)
            .unwrap();

        assert_eq!(message.developer_fields()[0].value, None);
    }
}
