//! Packet codes exchanged by the native protocol.
//!
//! Packet codes travel as varints in front of every packet. The packet bodies themselves are
//! handled by the layers above the column codecs.

use chnative_error::{ChResult, ch_err};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{WireRead, WireWrite};

/// Packets the server sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum ServerCode {
    /// Name, version, revision.
    Hello = 0,
    /// A block of data, compressed or not.
    Data = 1,
    /// An exception raised during query execution.
    Exception = 2,
    /// Query progress: rows read, bytes read.
    Progress = 3,
    /// Reply to a ping.
    Pong = 4,
    /// All packets were transmitted.
    EndOfStream = 5,
    /// Profiling info.
    ProfileInfo = 6,
    /// A block of data with totals.
    Totals = 7,
    /// A block of data with minimums and maximums.
    Extremes = 8,
}

/// Packets the client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum ClientCode {
    /// Name, version, revision, default database.
    Hello = 0,
    /// Query id, settings, stage, compression flag and query text.
    Query = 1,
    /// A block of data, compressed or not.
    Data = 2,
    /// Cancel the running query.
    Cancel = 3,
    /// Check that the connection is alive.
    Ping = 4,
}

/// Whether the data blocks of a query are compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum CompressionState {
    /// Blocks are sent as-is.
    Disable = 0,
    /// Blocks are framed and compressed.
    Enable = 1,
}

/// The stage up to which the server executes a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum Stage {
    /// Run the query to completion.
    Complete = 2,
}

/// Reads the varint code that opens a server packet.
pub fn read_server_code<R: WireRead + ?Sized>(input: &mut R) -> ChResult<ServerCode> {
    let raw = input.read_varint()?;
    ServerCode::try_from(raw).map_err(|_| ch_err!(InvalidSerde: "unknown server packet code {raw}"))
}

/// Writes the varint code that opens a client packet.
pub fn write_client_code<W: WireWrite + ?Sized>(output: &mut W, code: ClientCode) -> ChResult<()> {
    output.write_varint(code.into())
}
