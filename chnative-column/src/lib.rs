#![cfg(target_endian = "little")]
#![deny(missing_docs)]

//! In-memory columns and their native wire encoding.
//!
//! Every column implements [`Column`]: it appends, indexes, slices and clears its rows, and
//! loads and saves them in the fixed little-endian layout of its type. Fixed-width numbers live
//! in a [`PrimitiveColumn`]. Dates, addresses, UUIDs, enums and decimals keep their rows in one
//! and convert on the way in and out. Nullable, array and tuple columns own the nested columns
//! their types call for.
//!
//! [`create_column`] builds the column for any [`DType`](chnative_dtype::DType), and
//! [`create_column_for_name`] does the same for a type name.

pub use array::*;
pub use column::*;
pub use date::*;
pub use decimal::*;
pub use enum_::*;
pub use factory::*;
pub use ip::*;
pub use native::*;
pub use nullable::*;
pub use primitive::*;
pub use string::*;
pub use tuple::*;
pub use uuid_::*;

mod array;
mod column;
mod date;
mod decimal;
mod enum_;
mod factory;
mod ip;
mod native;
mod nullable;
mod primitive;
mod string;
mod tuple;
mod uuid_;
