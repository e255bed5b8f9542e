use std::io::Write;

use chnative_error::ChResult;

use crate::MAX_VARINT_LEN;

/// A sequential sink of bytes.
///
/// A write either stores all of the given bytes or fails; there are no partial writes from the
/// codec's point of view.
pub trait WireWrite {
    /// Writes all of `data`.
    fn write_raw(&mut self, data: &[u8]) -> ChResult<()>;

    /// Writes a single byte.
    fn write_byte(&mut self, byte: u8) -> ChResult<()> {
        self.write_raw(&[byte])
    }

    /// Writes an unsigned LEB128 varint.
    fn write_varint(&mut self, mut value: u64) -> ChResult<()> {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let mut len = 0;
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                buf[len] = byte;
                len += 1;
                break;
            }
            buf[len] = byte | 0x80;
            len += 1;
        }
        self.write_raw(&buf[..len])
    }

    /// Writes a varint length prefix followed by `data`.
    fn write_binary(&mut self, data: &[u8]) -> ChResult<()> {
        self.write_varint(data.len() as u64)?;
        self.write_raw(data)
    }
}

impl<W: Write + ?Sized> WireWrite for W {
    fn write_raw(&mut self, data: &[u8]) -> ChResult<()> {
        self.write_all(data)?;
        Ok(())
    }
}
