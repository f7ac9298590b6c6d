//! Convenience interfaces for common encoding patterns.
//!
//! The [`Encoder`](encoder::Encoder) session in this module writes documents
//! to a [`Sink`], accepting generic [`Message`]s or any type implementing
//! [`ToMessage`]. Sinks are provided for byte vectors and, with the `std`
//! feature, for seekable writers such as files.
//!
//! In many cases (when messages are of a known shape), [`ToMessage`] can be
//! derived. See the [`ToMessage`](macro@ToMessage) macro for details.

pub mod buffer;
pub mod encoder;
#[cfg(feature = "std")]
pub mod writer;

pub use buffer::encode as encode_vec;
#[cfg(feature = "std")]
pub use writer::encode as encode_writer;

use crate::{
    developer::{DeveloperDataId, FieldDescription},
    message::{Message, MessageError},
};

/// A destination for the bytes of a document.
///
/// Bytes are appended in order. Once all records are written, the encoder
/// returns to the start of the document to patch the header, so a sink must
/// be able to overwrite bytes it has already received.
pub trait Sink {
    type Error;

    /// Append bytes to the document.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Overwrite bytes at an offset from the start of the document.
    ///
    /// The range is always within the bytes already written.
    fn patch(&mut self, offset: u64, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Flush the sink once the document is complete.
    ///
    /// The encoder keeps ownership of the sink; it is released when the
    /// encoder is dropped or taken back with
    /// [`Encoder::into_inner`](encoder::Encoder::into_inner).
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// Derive [`ToMessage`] for a struct representing a single message.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// Name the message type with the `message(T)` attribute on the struct, where
/// `T` is a variant of [`MessageType`](crate::profile::MessageType). To write
/// a value for a field, add the `field(N)` attribute to an `Option<T>` struct
/// field, where `N` is the field number and `T` is the corresponding Rust
/// primitive. Fields holding `None` are left out of the message.
///
/// ```
/// #[derive(Debug, Default, ToMessage)]
/// #[message(Record)]
/// struct Sample {
///     #[field(253)]
///     timestamp: Option<u32>,
///     #[field(3)]
///     heart_rate: Option<u8>,
/// }
/// ```
///
/// To write domain types, supply a conversion closure. The closure receives a
/// reference to the struct field and returns the value to write, or `None`.
///
/// ```
/// #[derive(Debug, ToMessage)]
/// #[message(DeviceInfo)]
/// struct Device {
///     #[field(5, |v| v.map(|v| (v * 100.0).round() as u16))]
///     software_version: Option<f32>,
///     #[field(27, |v| v.clone())]
///     product_name: Option<String>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use chainring_derive::ToMessage;

/// Convert a value into a message for encoding.
///
/// See the [`ToMessage`](macro@ToMessage) derive macro for an automatic
/// implementation of this trait.
pub trait ToMessage {
    fn to_message(&self) -> Result<Message, MessageError>;
}

impl ToMessage for Message {
    fn to_message(&self) -> Result<Message, MessageError> {
        Ok(self.clone())
    }
}

impl ToMessage for DeveloperDataId {
    fn to_message(&self) -> Result<Message, MessageError> {
        Ok(self.into())
    }
}

impl ToMessage for FieldDescription {
    fn to_message(&self) -> Result<Message, MessageError> {
        Message::try_from(self)
    }
}
