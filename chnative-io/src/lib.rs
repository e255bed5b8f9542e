#![deny(missing_docs)]

//! Sequential byte-stream access for the native protocol codecs.
//!
//! Columns never see sockets, files or compression frames. They read from a [`WireRead`] and
//! write to a [`WireWrite`], both of which are implemented for every [`std::io::Read`] and
//! [`std::io::Write`], and for [`bytes`] buffers through [`BufInput`] and [`BufOutput`].

pub use buf::*;
pub use read::*;
pub use write::*;

mod buf;
pub mod protocol;
mod read;
mod write;

/// The maximum number of bytes a LEB128-encoded `u64` occupies.
pub const MAX_VARINT_LEN: usize = 10;
