//! Vector-based sink implementation.

use core::convert::Infallible;

use alloc::vec::Vec;

use crate::message::Message;

use super::{
    Sink,
    encoder::{Encoder, Error},
};

impl Sink for Vec<u8> {
    type Error = Infallible;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Infallible> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn patch(&mut self, offset: u64, bytes: &[u8]) -> Result<(), Infallible> {
        let offset = offset as usize;
        self[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Encode messages into a complete document held in memory.
///
/// This method is also re-exported as `chainring::avec::encode_vec`.
pub fn encode<'a>(
    messages: impl IntoIterator<Item = &'a Message>,
) -> Result<Vec<u8>, Error<Infallible>> {
    let mut encoder = Encoder::open(Vec::new())?;

    for message in messages {
        encoder.write(message)?;
    }

    encoder.close()?;
    Ok(encoder.into_inner())
}
