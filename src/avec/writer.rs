//! Writer-based sink implementation.
//!
//! _Requires Cargo feature `std`._

use std::io::{Seek, SeekFrom, Write};

use crate::message::Message;

use super::{
    Sink,
    encoder::{Encoder, Error},
};

extern crate std;

/// A sink writing to a seekable writer, such as a file.
///
/// Offsets are relative to the writer's position when the sink was created, so
/// a document may be appended to existing content.
///
/// _Requires Cargo feature `std`._
#[derive(Debug)]
pub struct WriterSink<W: Write + Seek> {
    writer: W,
    start: u64,
}

impl<W: Write + Seek> WriterSink<W> {
    pub fn new(mut writer: W) -> std::io::Result<Self> {
        let start = writer.stream_position()?;
        Ok(Self { writer, start })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Seek> Sink for WriterSink<W> {
    type Error = std::io::Error;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.writer.write_all(bytes)
    }

    fn patch(&mut self, offset: u64, bytes: &[u8]) -> Result<(), Self::Error> {
        let end = self.writer.stream_position()?;

        self.writer.seek(SeekFrom::Start(self.start + offset))?;
        self.writer.write_all(bytes)?;
        self.writer.seek(SeekFrom::Start(end))?;

        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.writer.flush()
    }
}

/// Encode messages into a complete document written to a seekable writer,
/// returning the writer.
///
/// This method is also re-exported as `chainring::avec::encode_writer`.
///
/// _Requires Cargo feature `std`._
pub fn encode<'a, W: Write + Seek>(
    w: W,
    messages: impl IntoIterator<Item = &'a Message>,
) -> Result<W, Error<std::io::Error>> {
    let sink = WriterSink::new(w).map_err(Error::Io)?;
    let mut encoder = Encoder::open(sink)?;

    for message in messages {
        encoder.write(message)?;
    }

    encoder.close()?;
    Ok(encoder.into_inner().into_inner())
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufWriter, Cursor},
        vec,
        vec::Vec,
    };

    use super::*;
    use crate::profile::{MessageType, file_id, types};

    #[test]
    fn offsets_from_start_position() {
        let mut cursor = Cursor::new(vec![0xAA; 3]);
        cursor.seek(SeekFrom::End(0)).unwrap();

        let mut sink = WriterSink::new(cursor).unwrap();
        sink.write_bytes(&[1, 2, 3, 4]).unwrap();
        sink.patch(1, &[9]).unwrap();
        sink.write_bytes(&[5]).unwrap();

        assert_eq!(sink.into_inner().into_inner(), [0xAA, 0xAA, 0xAA, 1, 9, 3, 4, 5]);
    }

    #[test]
    fn close_flushes() {
        let mut sink = WriterSink::new(BufWriter::new(Cursor::new(Vec::<u8>::new()))).unwrap();
        sink.write_bytes(&[1, 2, 3]).unwrap();
        assert!(sink.writer.get_ref().get_ref().is_empty());

        sink.close().unwrap();
        assert_eq!(sink.writer.get_ref().get_ref(), &[1, 2, 3]);
    }

    #[test]
    fn matches_vector_encoding() {
        let mut file_id = Message::new(MessageType::FileId);
        file_id.set_field(file_id::TYPE, types::FILE_ACTIVITY).unwrap();
        let messages = [file_id];

        let written = encode(Cursor::new(Vec::<u8>::new()), &messages).unwrap();
        let buffered = super::super::encode_vec(&messages).unwrap();

        assert_eq!(written.into_inner(), buffered);
    }
}
