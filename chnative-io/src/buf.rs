use bytes::{Buf, BufMut, Bytes, BytesMut};
use chnative_error::{ChResult, ch_bail};

use crate::{WireRead, WireWrite};

/// A [`WireRead`] backed by an in-memory [`Buf`].
pub struct BufInput<B> {
    buffer: B,
}

impl<B: Buf> BufInput<B> {
    /// Wraps `buffer`, reading from its current position.
    pub fn new(buffer: B) -> Self {
        Self { buffer }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buffer.remaining()
    }

    /// Returns the wrapped buffer, positioned after the bytes read so far.
    pub fn into_inner(self) -> B {
        self.buffer
    }
}

impl<B: Buf> WireRead for BufInput<B> {
    fn read_some(&mut self, buf: &mut [u8]) -> ChResult<usize> {
        let n = buf.len().min(self.buffer.remaining());
        self.buffer.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }

    fn read_chunk(&mut self, len: usize) -> ChResult<Bytes> {
        let remaining = self.buffer.remaining();
        if remaining < len {
            log::trace!("buffer holds {remaining} of {len} requested bytes");
            ch_bail!(UnexpectedEof: len, remaining);
        }
        // Zero-copy when the underlying buffer is itself `Bytes`.
        Ok(self.buffer.copy_to_bytes(len))
    }
}

/// A [`WireWrite`] that appends into an in-memory [`BufMut`].
pub struct BufOutput<B> {
    buffer: B,
}

impl<B: BufMut> BufOutput<B> {
    /// Wraps `buffer`, appending after its current contents.
    pub fn new(buffer: B) -> Self {
        Self { buffer }
    }

    /// Returns the wrapped buffer.
    pub fn into_inner(self) -> B {
        self.buffer
    }
}

impl BufOutput<BytesMut> {
    /// Freezes everything written so far.
    pub fn freeze(self) -> Bytes {
        self.buffer.freeze()
    }
}

impl Default for BufOutput<BytesMut> {
    fn default() -> Self {
        Self::new(BytesMut::new())
    }
}

impl<B: BufMut> WireWrite for BufOutput<B> {
    fn write_raw(&mut self, data: &[u8]) -> ChResult<()> {
        if self.buffer.remaining_mut() < data.len() {
            ch_bail!(
                "output buffer has room for {} bytes, {} were written",
                self.buffer.remaining_mut(),
                data.len()
            );
        }
        self.buffer.put_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chnative_error::ChError;

    use super::*;

    #[test]
    fn bytes_round_trip() {
        let mut out = BufOutput::<BytesMut>::default();
        out.write_binary(b"abc").unwrap();
        out.write_raw(&[7, 8]).unwrap();
        let bytes = out.freeze();

        let mut input = BufInput::new(bytes);
        assert_eq!(input.read_binary().unwrap().as_ref(), b"abc");
        assert_eq!(input.read_chunk(2).unwrap().as_ref(), &[7, 8]);
        assert_eq!(input.remaining(), 0);
        assert_eq!(input.read_some(&mut [0u8; 4]).unwrap(), 0);
    }

    #[test]
    fn short_buffer_leaves_position_untouched() {
        let mut input = BufInput::new(Bytes::from_static(&[1, 2, 3]));
        assert!(matches!(
            input.read_chunk(4).unwrap_err(),
            ChError::UnexpectedEof(4, 3, _)
        ));
        assert_eq!(input.remaining(), 3);
    }

    #[test]
    fn fixed_output_rejects_overflow() {
        let mut storage = [0u8; 2];
        let mut out = BufOutput::new(&mut storage[..]);
        assert!(out.write_raw(&[1, 2, 3]).is_err());
        out.write_raw(&[1, 2]).unwrap();
        assert_eq!(storage, [1, 2]);
    }
}
