use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use chnative_error::{ChResult, ch_bail, ch_err};

use crate::MAX_VARINT_LEN;

/// Large reads are grown in steps of this many bytes, so a corrupt length prefix fails with
/// [`ChError::UnexpectedEof`](chnative_error::ChError::UnexpectedEof) instead of allocating the
/// whole claimed length up front.
const READ_STEP: usize = 1 << 20;

/// A sequential source of bytes.
///
/// Only [`WireRead::read_some`] has to be provided. A short read is not an error by itself; a
/// read of zero bytes means the stream is exhausted.
pub trait WireRead {
    /// Reads up to `buf.len()` bytes into `buf` and returns how many were read.
    fn read_some(&mut self, buf: &mut [u8]) -> ChResult<usize>;

    /// Fills `buf` completely or fails with `UnexpectedEof`.
    fn read_full(&mut self, buf: &mut [u8]) -> ChResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read_some(&mut buf[filled..])?;
            if n == 0 {
                log::trace!("stream exhausted after {filled} of {} bytes", buf.len());
                ch_bail!(UnexpectedEof: buf.len(), filled);
            }
            filled += n;
        }
        Ok(())
    }

    /// Reads exactly `len` bytes into a new buffer.
    fn read_chunk(&mut self, len: usize) -> ChResult<Bytes> {
        let mut chunk = BytesMut::new();
        while chunk.len() < len {
            let start = chunk.len();
            chunk.resize(start + (len - start).min(READ_STEP), 0);
            let mut filled = start;
            while filled < chunk.len() {
                let n = self.read_some(&mut chunk[filled..])?;
                if n == 0 {
                    log::trace!("stream exhausted after {filled} of {len} bytes");
                    ch_bail!(UnexpectedEof: len, filled);
                }
                filled += n;
            }
        }
        Ok(chunk.freeze())
    }

    /// Reads a single byte.
    fn read_byte(&mut self) -> ChResult<u8> {
        let mut byte = [0u8; 1];
        self.read_full(&mut byte)?;
        Ok(byte[0])
    }

    /// Reads an unsigned LEB128 varint.
    ///
    /// Fails with `InvalidSerde` if the encoding runs past ten bytes or its value needs more
    /// than 64 bits.
    fn read_varint(&mut self) -> ChResult<u64> {
        let mut value = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_byte()?;
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                ch_bail!(InvalidSerde: "varint byte {byte:#04x} overflows 64 bits");
            }
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        ch_bail!(InvalidSerde: "varint is longer than {MAX_VARINT_LEN} bytes")
    }

    /// Reads a varint length prefix followed by that many bytes.
    fn read_binary(&mut self) -> ChResult<Bytes> {
        let len = self.read_varint()?;
        let len = usize::try_from(len)
            .map_err(|_| ch_err!(InvalidSerde: "binary length {len} does not fit in memory"))?;
        self.read_chunk(len)
    }
}

impl<R: Read + ?Sized> WireRead for R {
    fn read_some(&mut self, buf: &mut [u8]) -> ChResult<usize> {
        loop {
            match self.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chnative_error::ChError;
    use rstest::rstest;

    use super::*;

    /// Hands out at most one byte per call, like a congested socket.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn read_full_across_short_reads() {
        let mut input = Trickle(&[1, 2, 3, 4]);
        let mut buf = [0u8; 4];
        input.read_full(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn read_chunk_reports_eof() {
        let mut input: &[u8] = &[1, 2, 3];
        let err = input.read_chunk(8).unwrap_err();
        assert!(matches!(err, ChError::UnexpectedEof(8, 3, _)));
    }

    #[rstest]
    #[case(&[0x00], 0)]
    #[case(&[0x7f], 127)]
    #[case(&[0x80, 0x01], 128)]
    #[case(&[0xe5, 0x8e, 0x26], 624_485)]
    #[case(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01], u64::MAX)]
    fn varints(#[case] bytes: &[u8], #[case] expected: u64) {
        let mut input = bytes;
        assert_eq!(input.read_varint().unwrap(), expected);
        assert!(input.is_empty());
    }

    #[rstest]
    #[case(&[0x80; 11])]
    #[case(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f])]
    #[case(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x02])]
    fn overlong_varint_is_rejected(#[case] bytes: &[u8]) {
        let mut input = bytes;
        assert!(matches!(
            input.read_varint().unwrap_err(),
            ChError::InvalidSerde(..)
        ));
    }

    #[test]
    fn binary_with_length_prefix() {
        let mut input: &[u8] = &[3, b'a', b'b', b'c', 9];
        assert_eq!(input.read_binary().unwrap().as_ref(), b"abc");
        assert_eq!(input.read_byte().unwrap(), 9);
    }
}
