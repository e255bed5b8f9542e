#![feature(error_generic_member_access)]
#![deny(missing_docs)]

//! Error handling for the chnative codec crates.
//!
//! Every fallible operation returns a [`ChResult`]. Errors are constructed through the
//! [`ch_err!`] and [`ch_bail!`] macros, which capture a backtrace at the point the error is
//! raised.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

/// A string that can be used as an error message.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        Self(msg.into())
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The top-level error type for the codec.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum ChError {
    /// An index is out of bounds.
    #[error("index {0} out of bounds from {1} to {2}\nBacktrace:\n{3}")]
    OutOfBounds(usize, usize, usize, Backtrace),
    /// A type name could not be tokenized, parsed or lowered into a type.
    #[error("{0}\nBacktrace:\n{1}")]
    GrammarError(ErrString, Backtrace),
    /// A value rejected when appending it to a column.
    #[error("{0}\nBacktrace:\n{1}")]
    FormatError(ErrString, Backtrace),
    /// A byte stream ended before the requested amount of data could be read.
    #[error("expected {0} bytes but the stream ended after {1}\nBacktrace:\n{2}")]
    UnexpectedEof(usize, usize, Backtrace),
    /// Bytes that do not decode as the expected wire layout.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidSerde(ErrString, Backtrace),
    /// An invalid argument was provided.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidArgument(ErrString, Backtrace),
    /// A function is not implemented for the given type.
    #[error("function {0} not implemented for {1}\nBacktrace:\n{2}")]
    NotImplemented(ErrString, ErrString, Backtrace),
    /// Types do not match.
    #[error("expected type: {0} but instead got {1}\nBacktrace:\n{2}")]
    MismatchedTypes(ErrString, ErrString, Backtrace),
    /// An assertion failed.
    #[error("{0}\nBacktrace:\n{1}")]
    AssertionFailed(ErrString, Backtrace),
    /// A wrapper for other errors, carrying additional context.
    #[error("{0}: {1}")]
    Context(ErrString, #[source] Box<ChError>),
    /// A wrapper for IO errors.
    #[error("{0}\nBacktrace:\n{1}")]
    IOError(#[from] std::io::Error, Backtrace),
}

impl ChError {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        ChError::Context(msg.into(), Box::new(self))
    }

    /// Strips any [`ChError::Context`] wrappers and returns the innermost error.
    pub fn root(&self) -> &ChError {
        match self {
            ChError::Context(_, inner) => inner.root(),
            other => other,
        }
    }
}

impl Debug for ChError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// A type alias for Results that return [`ChError`]s as their error type.
pub type ChResult<T> = Result<T, ChError>;

/// Construct a new [`ChError`], capturing a backtrace.
///
/// The variant can be named with a `Variant: "format", args` prefix. Without a prefix the
/// error is an [`ChError::InvalidArgument`].
#[macro_export]
macro_rules! ch_err {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::ChError::OutOfBounds($idx, $start, $stop, Backtrace::capture())
        )
    }};
    (UnexpectedEof: $expected:expr, $actual:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::ChError::UnexpectedEof($expected, $actual, Backtrace::capture())
        )
    }};
    (NotImplemented: $func:expr, $by_whom:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::ChError::NotImplemented($func.into(), format!("{}", $by_whom).into(), Backtrace::capture())
        )
    }};
    (MismatchedTypes: $expected:expr, $actual:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::ChError::MismatchedTypes(
                format!("{}", $expected).into(),
                format!("{}", $actual).into(),
                Backtrace::capture(),
            )
        )
    }};
    (Context: $msg:literal, $err:expr) => {{
        $crate::__private::must_use(
            $crate::ChError::Context($msg.into(), Box::new($err))
        )
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::ChError::$variant(format!($fmt, $($arg),*).into(), Backtrace::capture())
        )
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ch_err!(InvalidArgument: $fmt, $($arg),*)
    };
}

/// Return early from a function with the error built by [`ch_err!`].
#[macro_export]
macro_rules! ch_bail {
    ($($tt:tt)+) => {
        return Err($crate::ch_err!($($tt)+))
    };
}

#[doc(hidden)]
pub mod __private {
    use crate::ChError;

    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub fn must_use(err: ChError) -> ChError {
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails() -> ChResult<()> {
        let value = 42;
        ch_bail!(FormatError: "bad value {value}")
    }

    #[test]
    fn bail_builds_named_variant() {
        let err = fails().unwrap_err();
        assert!(matches!(err, ChError::FormatError(ref msg, _) if &**msg == "bad value 42"));
    }

    #[test]
    fn unprefixed_error_is_invalid_argument() {
        let err = ch_err!("nope");
        assert!(matches!(err, ChError::InvalidArgument(..)));
    }

    #[test]
    fn context_unwraps_to_root() {
        let err = ch_err!(UnexpectedEof: 8, 3).with_context("loading column");
        assert!(matches!(err, ChError::Context(..)));
        assert!(matches!(err.root(), ChError::UnexpectedEof(8, 3, _)));
        assert!(err.to_string().starts_with("loading column: expected 8 bytes"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: ChError = io.into();
        assert!(matches!(err, ChError::IOError(..)));
    }
}
