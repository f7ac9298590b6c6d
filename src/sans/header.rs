//! Layouts of document and record headers.

use tartan_bitfield::bitfield;
use zerocopy::IntoBytes;

use super::check::compute_crc;

/// Size of the document header written by this crate, including its check.
pub const DOCUMENT_HEADER_SIZE: u8 = 14;

/// Number of local message numbers addressable from a record header.
pub const LOCAL_MESSAGE_COUNT: usize = 16;

/// Protocol version declared in the document header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProtocolVersion {
    /// Version 1.0, without developer data.
    V1,
    /// Version 2.0.
    #[default]
    V2,
}

impl ProtocolVersion {
    /// The version byte, major version in the upper nibble.
    pub fn byte(self) -> u8 {
        match self {
            Self::V1 => 0x10,
            Self::V2 => 0x20,
        }
    }

    /// Whether documents of this version may declare developer fields.
    pub fn supports_developer_data(self) -> bool {
        self == Self::V2
    }
}

/// A document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHeader {
    pub protocol: ProtocolVersion,
    pub profile_version: u16,
    /// Number of record bytes between the header and the trailing check.
    pub data_size: u32,
}

impl DocumentHeader {
    /// Render the header, followed by a cyclic redundancy check of its first
    /// twelve bytes.
    pub fn encode(&self) -> [u8; DOCUMENT_HEADER_SIZE as usize] {
        #[repr(C)]
        #[derive(IntoBytes)]
        struct FileHeader {
            header_size: u8,
            protocol_version: u8,
            profile_version: [u8; 2],
            data_size: [u8; 4],
            data_type: [u8; 4],
        }

        let header: [u8; 12] = zerocopy::transmute!(FileHeader {
            header_size: DOCUMENT_HEADER_SIZE,
            protocol_version: self.protocol.byte(),
            profile_version: self.profile_version.to_le_bytes(),
            data_size: self.data_size.to_le_bytes(),
            data_type: *b".FIT",
        });

        let crc = compute_crc(0, &header);

        let mut r = [0; DOCUMENT_HEADER_SIZE as usize];
        r[..12].copy_from_slice(&header);
        r[12..].copy_from_slice(&crc.to_le_bytes());
        r
    }
}

/// A normal (uncompressed) record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordHeader {
    /// Introduces a definition record for a local message number.
    Definition { local_message: u8, is_developer: bool },
    /// Introduces a data record for a local message number.
    Data { local_message: u8 },
}

impl RecordHeader {
    /// Render the header byte.
    pub fn encode(self) -> u8 {
        bitfield! {
            struct NormalHeader(u8) {
                [0..4] local_message: u8,
                [5] is_developer,
                [6] is_definition,
            }
        }

        let mut header = NormalHeader(0);

        match self {
            Self::Definition {
                local_message,
                is_developer,
            } => {
                header.set_local_message(local_message);
                header.set_is_developer(is_developer);
                header.set_is_definition(true);
            }
            Self::Data { local_message } => {
                header.set_local_message(local_message);
            }
        }

        header.0
    }
}
