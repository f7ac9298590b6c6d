#![no_std]

//! An encoder for Garmin's Flexible and Interoperable Data Transfer protocol.
//!
//! Chainring assembles messages into FIT documents: a short header, a stream
//! of definition and data records, and a trailing cyclic redundancy check.
//! Definition records are emitted lazily, only when the shape of a message
//! differs from the last one written for its type, so long time series cost a
//! single definition.
//!
//! Most users should begin with the [`avec::encoder::Encoder`] session and the
//! generic [`message::Message`]. Messages may carry developer fields, declared
//! with [`developer::DeveloperDataId`] and [`developer::FieldDescription`]
//! messages written earlier in the same document. The byte layouts used by
//! the session are exposed in the [`sans`] module for applications assembling
//! documents by hand.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable the writer-based sink (default).

extern crate alloc;

pub mod avec;
pub mod developer;
pub mod message;
pub mod profile;
pub mod registry;
pub mod resolve;
pub mod sans;
