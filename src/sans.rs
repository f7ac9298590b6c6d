//! Byte layouts for implementing encoders.
//!
//! This module is intended for applications that need fine control over the
//! document they produce. See [`crate::avec`] for a session covering common
//! encoding patterns.
//!
//! # Architecture
//!
//! Nothing in this module performs I/O. Each layout is a plain value that
//! renders itself into bytes, leaving buffering, ordering and checksumming to
//! the caller.
//!
//! A document is laid out as:
//!
//! - A [`header::DocumentHeader`], whose data size must be patched once the
//! record section is complete.
//!
//! - Any number of records, each starting with a [`header::RecordHeader`]
//! byte. A [`definition::Definition`] record binds a local message number to
//! a global message and a list of fields; data records for that local number
//! follow, holding each field's bytes in definition order.
//!
//! - A cyclic redundancy check over every preceding byte, computed with the
//! helpers in the [`check`] module.
//!
//! Implementers are recommended to begin by studying and modifying the
//! session in [`crate::avec::encoder`].

pub mod check;
pub mod data;
pub mod definition;
pub mod header;
