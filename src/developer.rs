//! Developer data: applications and the fields they declare.
//!
//! A document carrying developer fields first writes a [`DeveloperDataId`]
//! message for each contributing application, then a [`FieldDescription`]
//! message for each field. Later messages attach values to these fields with
//! [`Message::add_developer_field`].

use alloc::string::String;

use crate::{
    message::{Message, MessageError},
    profile::{MessageType, developer_data_id as id, field_description as fd},
    sans::data::{BaseType, Value},
};

/// Key of a developer field: its developer data index and field number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId {
    pub developer_data_index: u8,
    pub field_definition_number: u8,
}

/// An application contributing developer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperDataId {
    /// A 16-byte identifier, reused for every document from the application.
    pub application_id: [u8; 16],
    /// Index namespacing the application's fields within one document.
    pub developer_data_index: u8,
    pub manufacturer_id: Option<u16>,
    pub application_version: Option<u32>,
}

impl DeveloperDataId {
    pub fn new(application_id: [u8; 16], developer_data_index: u8) -> Self {
        Self {
            application_id,
            developer_data_index,
            manufacturer_id: None,
            application_version: None,
        }
    }
}

impl From<&DeveloperDataId> for Message {
    fn from(d: &DeveloperDataId) -> Self {
        let mut message = Message::new(MessageType::DeveloperDataId);

        message.insert(id::APPLICATION_ID, BaseType::Byte, d.application_id.into());
        message.insert(
            id::DEVELOPER_DATA_INDEX,
            BaseType::Uint8,
            d.developer_data_index.into(),
        );
        if let Some(m) = d.manufacturer_id {
            message.insert(id::MANUFACTURER_ID, BaseType::Uint16, m.into());
        }
        if let Some(v) = d.application_version {
            message.insert(id::APPLICATION_VERSION, BaseType::Uint32, v.into());
        }

        message
    }
}

impl TryFrom<&Message> for DeveloperDataId {
    type Error = MessageError;

    fn try_from(m: &Message) -> Result<Self, Self::Error> {
        let kind = MessageType::DeveloperDataId;
        let missing = |number| MessageError::MissingField { kind, number };

        if m.kind() != kind {
            Err(missing(id::DEVELOPER_DATA_INDEX))?;
        }

        let application_id = match m.field(id::APPLICATION_ID) {
            Some(Value::Bytes(b)) => <[u8; 16]>::try_from(b.as_slice()).ok(),
            _ => None,
        }
        .ok_or(missing(id::APPLICATION_ID))?;

        let developer_data_index = match m.field(id::DEVELOPER_DATA_INDEX) {
            Some(Value::U8(x)) if *x != u8::MAX => *x,
            _ => Err(missing(id::DEVELOPER_DATA_INDEX))?,
        };

        let manufacturer_id = match m.field(id::MANUFACTURER_ID) {
            Some(Value::U16(x)) => Some(*x),
            _ => None,
        };

        let application_version = match m.field(id::APPLICATION_VERSION) {
            Some(Value::U32(x)) => Some(*x),
            _ => None,
        };

        Ok(Self {
            application_id,
            developer_data_index,
            manufacturer_id,
            application_version,
        })
    }
}

/// Declaration of a developer field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescription {
    pub developer_data_index: u8,
    pub field_definition_number: u8,
    pub base_type: BaseType,
    pub field_name: Option<String>,
    pub units: Option<String>,
    /// Message whose semantics this field shares, if any.
    pub native_message: Option<MessageType>,
    /// Native field whose semantics this field shares, if any.
    pub native_field: Option<u8>,
}

impl FieldDescription {
    pub fn new(developer_data_index: u8, field_definition_number: u8, base_type: BaseType) -> Self {
        Self {
            developer_data_index,
            field_definition_number,
            base_type,
            field_name: None,
            units: None,
            native_message: None,
            native_field: None,
        }
    }

    pub fn id(&self) -> FieldId {
        FieldId {
            developer_data_index: self.developer_data_index,
            field_definition_number: self.field_definition_number,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Bind this field to a native message, and optionally one of its fields.
    pub fn with_native(mut self, message: MessageType, field: Option<u8>) -> Self {
        self.native_message = Some(message);
        self.native_field = field;
        self
    }
}

/// Names and units are checked against the largest size of a field.
impl TryFrom<&FieldDescription> for Message {
    type Error = MessageError;

    fn try_from(d: &FieldDescription) -> Result<Self, Self::Error> {
        let mut message = Message::new(MessageType::FieldDescription);

        message.insert(
            fd::DEVELOPER_DATA_INDEX,
            BaseType::Uint8,
            d.developer_data_index.into(),
        );
        message.insert(
            fd::FIELD_DEFINITION_NUMBER,
            BaseType::Uint8,
            d.field_definition_number.into(),
        );
        message.insert(fd::FIT_BASE_TYPE_ID, BaseType::Uint8, d.base_type.id().into());
        if let Some(name) = &d.field_name {
            message.set_field(fd::FIELD_NAME, name.as_str())?;
        }
        if let Some(units) = &d.units {
            message.set_field(fd::UNITS, units.as_str())?;
        }
        if let Some(native) = d.native_message {
            message.insert(fd::NATIVE_MESG_NUM, BaseType::Uint16, native.global().into());
        }
        if let Some(native) = d.native_field {
            message.insert(fd::NATIVE_FIELD_NUM, BaseType::Uint8, native.into());
        }

        Ok(message)
    }
}

impl TryFrom<&Message> for FieldDescription {
    type Error = MessageError;

    fn try_from(m: &Message) -> Result<Self, Self::Error> {
        let kind = MessageType::FieldDescription;
        let missing = |number| MessageError::MissingField { kind, number };

        if m.kind() != kind {
            Err(missing(fd::FIELD_DEFINITION_NUMBER))?;
        }

        let byte = |number| match m.field(number) {
            Some(Value::U8(x)) if *x != u8::MAX => Some(*x),
            _ => None,
        };
        let string = |number| match m.field(number) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        };

        let developer_data_index =
            byte(fd::DEVELOPER_DATA_INDEX).ok_or(missing(fd::DEVELOPER_DATA_INDEX))?;
        let field_definition_number =
            byte(fd::FIELD_DEFINITION_NUMBER).ok_or(missing(fd::FIELD_DEFINITION_NUMBER))?;
        let base_type = byte(fd::FIT_BASE_TYPE_ID)
            .and_then(BaseType::from_id)
            .ok_or(missing(fd::FIT_BASE_TYPE_ID))?;

        let native_message = match m.field(fd::NATIVE_MESG_NUM) {
            Some(Value::U16(x)) => MessageType::from_global(*x),
            _ => None,
        };

        Ok(Self {
            developer_data_index,
            field_definition_number,
            base_type,
            field_name: string(fd::FIELD_NAME),
            units: string(fd::UNITS),
            native_message,
            native_field: byte(fd::NATIVE_FIELD_NUM),
        })
    }
}

/// A developer field value attached to a message.
///
/// The field is referenced by key; its base type and size are resolved against
/// the descriptions written earlier in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct DeveloperField {
    pub developer_data_index: u8,
    pub field_definition_number: u8,
    /// `None` is written as the field's 'invalid' marker.
    pub value: Option<Value>,
}

impl DeveloperField {
    pub fn key(&self) -> FieldId {
        FieldId {
            developer_data_index: self.developer_data_index,
            field_definition_number: self.field_definition_number,
        }
    }
}
