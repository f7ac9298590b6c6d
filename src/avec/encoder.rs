//! The encoding session.
//!
//! An [`Encoder`] writes one document to a [`Sink`]. Opening the session
//! writes the document header with a placeholder data size. Each message is
//! written as a data record, preceded by a definition record when its shape
//! differs from the last message of the same type. Closing the session patches
//! the header and appends the trailing check.
//!
//! ```
//! let mut encoder = Encoder::open(Vec::new())?;
//!
//! let mut file_id = Message::new(MessageType::FileId);
//! file_id.set_field(profile::file_id::TYPE, profile::types::FILE_ACTIVITY)?;
//! encoder.write(&file_id)?;
//!
//! encoder.close()?;
//! let document = encoder.into_inner();
//! ```

use alloc::{collections::BTreeMap, vec::Vec};

use thiserror::Error;

use crate::{
    developer::{DeveloperDataId, FieldDescription},
    message::{Message, MessageError},
    profile::MessageType,
    registry::Registry,
    resolve::{ResolveError, ResolvedField, resolve},
    sans::{
        check::{compute_crc, skip_crc},
        definition::{Definition, FieldDefinition},
        header::{
            DOCUMENT_HEADER_SIZE, DocumentHeader, LOCAL_MESSAGE_COUNT, ProtocolVersion,
            RecordHeader,
        },
    },
};

use super::{Sink, ToMessage};

/// Profile version declared by default, 21.32.
pub const PROFILE_VERSION: u16 = 2132;

// Each message type is bound to its own local message number.
const _: () = assert!(MessageType::ALL.len() <= LOCAL_MESSAGE_COUNT);

/// Errors occurring while encoding a document.
#[derive(Debug, Error)]
pub enum Error<E> {
    /// An error from the supplied sink.
    #[error(transparent)]
    Io(E),
    /// The message could not be interpreted.
    #[error("Invalid message: {0}")]
    Message(#[from] MessageError),
    /// A developer field could not be resolved.
    #[error("Unresolved developer field: {0}")]
    Resolve(#[from] ResolveError),
    /// The declared protocol version does not support a feature of a message.
    #[error("Protocol version {protocol:?} does not support the developer fields of a {kind:?} message.")]
    Protocol {
        kind: MessageType,
        protocol: ProtocolVersion,
    },
    /// The record section would exceed the largest representable size.
    #[error("Document exceeds the largest representable size.")]
    TooLarge,
    /// The session was closed, or aborted after an earlier error.
    #[error("Session is closed.")]
    Closed,
}

/// Options applied to the document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub protocol: ProtocolVersion,
    pub profile_version: u16,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            protocol: ProtocolVersion::V2,
            profile_version: PROFILE_VERSION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Finalized,
    Aborted,
}

/// Declaration carried by a message, applied to the registry once written.
enum Declaration {
    Developer(DeveloperDataId),
    Field(FieldDescription),
}

/// A session writing one document to a sink.
#[derive(Debug)]
pub struct Encoder<S: Sink> {
    sink: S,
    options: Options,
    state: State,
    registry: Registry,
    /// Last definition written for each message type.
    definitions: BTreeMap<MessageType, Definition>,
    /// Bytes of the record section written so far.
    size: u64,
    /// Check of the record section, accumulated from zero.
    crc: u16,
    buffer: Vec<u8>,
}

impl<S: Sink> Encoder<S> {
    /// Open a session, writing a document header with default options.
    pub fn open(sink: S) -> Result<Self, Error<S::Error>> {
        Self::with_options(sink, Options::default())
    }

    /// Open a session, writing a document header.
    pub fn with_options(mut sink: S, options: Options) -> Result<Self, Error<S::Error>> {
        let header = DocumentHeader {
            protocol: options.protocol,
            profile_version: options.profile_version,
            data_size: 0,
        };

        sink.write_bytes(&header.encode()).map_err(Error::Io)?;

        Ok(Self {
            sink,
            options,
            state: State::Open,
            registry: Registry::new(),
            definitions: BTreeMap::new(),
            size: 0,
            crc: 0,
            buffer: Vec::new(),
        })
    }

    /// Write a message as a data record, preceded by a definition record if
    /// its shape differs from the last message of the same type.
    ///
    /// Messages declaring developer data ids or field descriptions take effect
    /// for the messages written after them. If the message is rejected, nothing
    /// is written.
    pub fn write(&mut self, message: &Message) -> Result<(), Error<S::Error>> {
        self.check_open()?;

        let kind = message.kind();

        let developer_fields = message
            .developer_fields()
            .iter()
            .map(|f| resolve(&self.registry, message, f))
            .collect::<Result<Vec<_>, _>>()?;

        if !developer_fields.is_empty() && !self.options.protocol.supports_developer_data() {
            Err(Error::<S::Error>::Protocol {
                kind,
                protocol: self.options.protocol,
            })?;
        }

        let declaration = match kind {
            MessageType::DeveloperDataId => {
                Some(Declaration::Developer(DeveloperDataId::try_from(message)?))
            }
            MessageType::FieldDescription => {
                Some(Declaration::Field(FieldDescription::try_from(message)?))
            }
            _ => None,
        };

        let local_message = match self.definitions.get(&kind) {
            Some(definition) => definition.local_message,
            None => self.definitions.len() as u8,
        };

        let definition = Definition {
            local_message,
            global_message: kind.global(),
            fields: message
                .fields()
                .map(|(number, base_type, value)| -> Result<_, MessageError> {
                    let size = value.size();
                    let size = u8::try_from(size)
                        .map_err(|_| MessageError::FieldTooLarge { number, size })?;

                    Ok(FieldDefinition {
                        number,
                        size,
                        base_type,
                    })
                })
                .collect::<Result<_, MessageError>>()?,
            developer_fields: developer_fields
                .iter()
                .map(ResolvedField::definition)
                .collect(),
        };

        let redefine = self.definitions.get(&kind) != Some(&definition);

        self.buffer.clear();

        if redefine {
            definition.encode(&mut self.buffer);
        }

        self.buffer.push(RecordHeader::Data { local_message }.encode());

        for (_, _, value) in message.fields() {
            value.encode(&mut self.buffer);
        }
        for field in &developer_fields {
            self.buffer.extend_from_slice(&field.raw);
        }

        self.emit()?;

        if redefine {
            self.definitions.insert(kind, definition);
        }

        match declaration {
            Some(Declaration::Developer(developer)) => self.registry.mark_written(developer),
            Some(Declaration::Field(description)) => {
                self.registry.register(description);
            }
            None => {}
        }

        Ok(())
    }

    /// Convert a value to a message and write it.
    pub fn write_from(&mut self, value: &impl ToMessage) -> Result<(), Error<S::Error>> {
        self.write(&value.to_message()?)
    }

    /// Complete the document: patch the header with the size of the record
    /// section, append the trailing check and close the sink.
    pub fn close(&mut self) -> Result<(), Error<S::Error>> {
        self.check_open()?;

        let header = DocumentHeader {
            protocol: self.options.protocol,
            profile_version: self.options.profile_version,
            data_size: self.size as u32,
        }
        .encode();

        // The record section's check was accumulated from zero; account for
        // the header preceding it.
        let crc = skip_crc(compute_crc(0, &header), self.size as usize) ^ self.crc;

        match self.finish(&header, crc) {
            Ok(()) => {
                self.state = State::Finalized;
                Ok(())
            }
            Err(err) => {
                self.state = State::Aborted;
                Err(Error::Io(err))
            }
        }
    }

    /// Field declarations in force for this document.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Total bytes written to the sink, including the header and, once
    /// closed, the trailing check.
    pub fn bytes_written(&self) -> u64 {
        let check = if self.state == State::Finalized { 2 } else { 0 };
        DOCUMENT_HEADER_SIZE as u64 + self.size + check
    }

    /// Whether the session was closed successfully.
    pub fn is_finalized(&self) -> bool {
        self.state == State::Finalized
    }

    /// Release the sink.
    ///
    /// The sink holds a complete document only if the session was closed
    /// successfully.
    pub fn into_inner(self) -> S {
        self.sink
    }

    fn check_open(&self) -> Result<(), Error<S::Error>> {
        match self.state {
            State::Open => Ok(()),
            State::Finalized | State::Aborted => Err(Error::Closed),
        }
    }

    /// Write the buffered records, accumulating their size and check.
    fn emit(&mut self) -> Result<(), Error<S::Error>> {
        let size = self.size + self.buffer.len() as u64;

        if size > u32::MAX as u64 {
            Err(Error::<S::Error>::TooLarge)?;
        }

        if let Err(err) = self.sink.write_bytes(&self.buffer) {
            self.state = State::Aborted;
            Err(Error::Io(err))?;
        }

        self.crc = compute_crc(self.crc, &self.buffer);
        self.size = size;

        Ok(())
    }

    fn finish(&mut self, header: &[u8], crc: u16) -> Result<(), S::Error> {
        self.sink.patch(0, header)?;
        self.sink.write_bytes(&crc.to_le_bytes())?;
        self.sink.close()
    }
}
