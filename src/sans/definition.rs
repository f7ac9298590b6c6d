//! Layout of definition records.

use alloc::vec::Vec;

use zerocopy::IntoBytes;

use super::{data::BaseType, header::RecordHeader};

/// Declaration of a native field within a definition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub number: u8,
    /// Size in bytes, a multiple of the base type's size.
    pub size: u8,
    pub base_type: BaseType,
}

/// Declaration of a developer field within a definition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeveloperFieldDefinition {
    pub number: u8,
    pub size: u8,
    pub developer_data_index: u8,
}

/// A definition record, binding a local message number to a global message
/// and the shape of the data records that follow.
///
/// Two definitions compare equal when data records encoded against one can be
/// read with the other, which is what an encoder needs to decide whether a
/// new definition must be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub local_message: u8,
    pub global_message: u16,
    pub fields: Vec<FieldDefinition>,
    pub developer_fields: Vec<DeveloperFieldDefinition>,
}

#[repr(C)]
#[derive(Debug, IntoBytes)]
struct DefinitionMessage {
    reserved: u8,
    architecture: u8,
    global_message: [u8; 2],
    fields: u8,
}

#[repr(C)]
#[derive(IntoBytes)]
struct FieldHeader {
    field: u8,
    size: u8,
    kind: u8,
}

impl Definition {
    /// Append the definition record, including its record header.
    ///
    /// Field and developer field counts must not exceed 255.
    pub fn encode(&self, o: &mut Vec<u8>) {
        let is_developer = !self.developer_fields.is_empty();

        o.push(
            RecordHeader::Definition {
                local_message: self.local_message,
                is_developer,
            }
            .encode(),
        );

        let message: [u8; 5] = zerocopy::transmute!(DefinitionMessage {
            reserved: 0,
            architecture: 0, // Little-endian.
            global_message: self.global_message.to_le_bytes(),
            fields: self.fields.len() as u8,
        });
        o.extend_from_slice(&message);

        for field in &self.fields {
            let header: [u8; 3] = zerocopy::transmute!(FieldHeader {
                field: field.number,
                size: field.size,
                kind: field.base_type.id(),
            });
            o.extend_from_slice(&header);
        }

        if is_developer {
            o.push(self.developer_fields.len() as u8);

            for field in &self.developer_fields {
                let header: [u8; 3] = zerocopy::transmute!(FieldHeader {
                    field: field.number,
                    size: field.size,
                    kind: field.developer_data_index,
                });
                o.extend_from_slice(&header);
            }
        }
    }

    /// Size in bytes of a data record encoded against this definition,
    /// including its record header.
    pub fn data_size(&self) -> usize {
        let native: usize = self.fields.iter().map(|f| f.size as usize).sum();
        let developer: usize = self.developer_fields.iter().map(|f| f.size as usize).sum();

        1 + native + developer
    }
}
