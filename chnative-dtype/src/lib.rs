#![deny(missing_docs)]

//! The column type model of the native protocol and the grammar of its type names.
//!
//! A type name such as `Array(Nullable(FixedString(16)))` is tokenized and parsed by
//! [`TypeParser`] into a [`TypeAst`], which [`lower`] turns into a [`DType`]. [`DType`]s are
//! immutable and shared through [`TypeRef`]; their [`Display`](std::fmt::Display) output is the
//! canonical name the server expects.

pub use ast::*;
pub use cache::*;
pub use code::*;
pub use decimal::*;
pub use dtype::*;
pub use enum_::*;
pub use lower::*;
pub use parser::*;

#[cfg(feature = "arbitrary")]
mod arbitrary;
mod ast;
mod cache;
mod code;
mod decimal;
mod dtype;
mod enum_;
mod lexer;
mod lower;
mod parser;
#[cfg(feature = "serde")]
mod serde;
