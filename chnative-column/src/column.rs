use std::any::Any;
use std::fmt::Debug;
use std::ops::Range;

use chnative_dtype::{TypeCode, TypeRef};
use chnative_error::{ChResult, ch_bail, ch_err};
use chnative_io::{WireRead, WireWrite};

/// An owned, type-erased column.
pub type ColumnRef = Box<dyn Column>;

/// A typed sequence of rows with a native wire encoding.
///
/// Every column owns its storage. Composite columns own the primitive columns their rows are
/// stored in and forward the wire encoding to them.
///
/// The wire encoding of a column is its rows, in order, in the column's fixed layout. Neither
/// the row count nor the type is written: both travel in the surrounding block header.
pub trait Column: Debug + Send + Sync {
    /// The column as [`Any`], for downcasting to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// The column as mutable [`Any`], for downcasting to its concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The type of the rows.
    fn dtype(&self) -> &TypeRef;

    /// Number of rows.
    fn len(&self) -> usize;

    /// Whether the column has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every row.
    fn clear(&mut self);

    /// Appends the zero value of the column's type.
    fn append_default(&mut self);

    /// Appends every row of `other`, which must be the same kind of column with the same type.
    ///
    /// Fails with `MismatchedTypes` and leaves `self` unchanged otherwise.
    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()>;

    /// Appends every row of `other` if it is the same kind of column with the same type, and
    /// does nothing otherwise.
    fn append_column(&mut self, other: &dyn Column) {
        if self.try_append_column(other).is_err() {
            log::debug!(
                "skipping append of {} rows of {} to a {} column",
                other.len(),
                other.dtype(),
                self.dtype()
            );
        }
    }

    /// Reads `rows` more rows from `input` and appends them.
    ///
    /// On failure the column is left as it was.
    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()>;

    /// Writes every row to `output`.
    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()>;

    /// A new column holding a copy of rows `begin..begin + len`.
    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef>;

    /// A new, empty column of the same kind and type.
    fn clone_empty(&self) -> ColumnRef;
}

impl dyn Column + '_ {
    /// The column as a `C`, if that is its concrete type.
    pub fn downcast_ref<C: Column + 'static>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }

    /// The column as a mutable `C`, if that is its concrete type.
    pub fn downcast_mut<C: Column + 'static>(&mut self) -> Option<&mut C> {
        self.as_any_mut().downcast_mut::<C>()
    }
}

/// `other` as the same concrete column as `this`, provided both have the same type.
pub(crate) fn same_column<'a, C: Column + 'static>(
    this: &C,
    other: &'a dyn Column,
) -> ChResult<&'a C> {
    match other.downcast_ref::<C>() {
        Some(other) if other.dtype() == this.dtype() => Ok(other),
        _ => Err(ch_err!(MismatchedTypes: this.dtype(), other.dtype())),
    }
}

/// Fails unless `dtype` is of kind `code`.
pub(crate) fn check_code(dtype: &TypeRef, code: TypeCode) -> ChResult<()> {
    if dtype.code() != code {
        ch_bail!(MismatchedTypes: code, dtype);
    }
    Ok(())
}

/// The row range `begin..begin + len`, if it lies within `0..total`.
pub(crate) fn slice_range(begin: usize, len: usize, total: usize) -> ChResult<Range<usize>> {
    match begin.checked_add(len) {
        Some(end) if end <= total => Ok(begin..end),
        _ => Err(ch_err!(OutOfBounds: begin.saturating_add(len), 0, total)),
    }
}

/// Implements [`Column`] for a column whose rows all live in a primitive column `self.data`,
/// with the type in `self.dtype`.
macro_rules! delegate_column {
    ($T:ty) => {
        impl $crate::Column for $T {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn dtype(&self) -> &::chnative_dtype::TypeRef {
                &self.dtype
            }

            fn len(&self) -> usize {
                $crate::Column::len(&self.data)
            }

            fn clear(&mut self) {
                $crate::Column::clear(&mut self.data)
            }

            fn append_default(&mut self) {
                $crate::Column::append_default(&mut self.data)
            }

            fn try_append_column(
                &mut self,
                other: &dyn $crate::Column,
            ) -> ::chnative_error::ChResult<()> {
                let other = $crate::column::same_column(self, other)?;
                self.data.extend_from(&other.data);
                Ok(())
            }

            fn load(
                &mut self,
                input: &mut dyn ::chnative_io::WireRead,
                rows: usize,
            ) -> ::chnative_error::ChResult<()> {
                $crate::Column::load(&mut self.data, input, rows)
            }

            fn save(
                &self,
                output: &mut dyn ::chnative_io::WireWrite,
            ) -> ::chnative_error::ChResult<()> {
                $crate::Column::save(&self.data, output)
            }

            fn slice(&self, begin: usize, len: usize) -> ::chnative_error::ChResult<$crate::ColumnRef> {
                Ok(Box::new(Self {
                    dtype: self.dtype.clone(),
                    data: self.data.slice_typed(begin, len)?,
                }))
            }

            fn clone_empty(&self) -> $crate::ColumnRef {
                Box::new(Self {
                    dtype: self.dtype.clone(),
                    data: Default::default(),
                })
            }
        }
    };
}

pub(crate) use delegate_column;

/// Implements [`Column`] for a column storing each row as two consecutive words of a
/// `UInt64` column `self.data`, with the type in `self.dtype`.
macro_rules! delegate_word_pairs {
    ($T:ty) => {
        impl $crate::Column for $T {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn dtype(&self) -> &::chnative_dtype::TypeRef {
                &self.dtype
            }

            fn len(&self) -> usize {
                $crate::Column::len(&self.data) / 2
            }

            fn clear(&mut self) {
                $crate::Column::clear(&mut self.data)
            }

            fn append_default(&mut self) {
                self.data.append(0);
                self.data.append(0);
            }

            fn try_append_column(
                &mut self,
                other: &dyn $crate::Column,
            ) -> ::chnative_error::ChResult<()> {
                let other = $crate::column::same_column(self, other)?;
                self.data.extend_from(&other.data);
                Ok(())
            }

            fn load(
                &mut self,
                input: &mut dyn ::chnative_io::WireRead,
                rows: usize,
            ) -> ::chnative_error::ChResult<()> {
                let words = rows.checked_mul(2).ok_or_else(|| {
                    ::chnative_error::ch_err!(InvalidSerde: "{rows} rows of {} overflow", self.dtype)
                })?;
                $crate::Column::load(&mut self.data, input, words)
            }

            fn save(
                &self,
                output: &mut dyn ::chnative_io::WireWrite,
            ) -> ::chnative_error::ChResult<()> {
                $crate::Column::save(&self.data, output)
            }

            fn slice(&self, begin: usize, len: usize) -> ::chnative_error::ChResult<$crate::ColumnRef> {
                let rows = $crate::column::slice_range(begin, len, $crate::Column::len(self))?;
                Ok(Box::new(Self {
                    dtype: self.dtype.clone(),
                    data: self.data.slice_typed(rows.start * 2, rows.len() * 2)?,
                }))
            }

            fn clone_empty(&self) -> $crate::ColumnRef {
                Box::new(Self {
                    dtype: self.dtype.clone(),
                    data: Default::default(),
                })
            }
        }
    };
}

pub(crate) use delegate_word_pairs;

#[cfg(test)]
mod tests {
    use chnative_error::ChError;

    use super::*;
    use crate::{Int8Column, UInt8Column};

    fn merge(into: &mut Int8Column, from: &dyn Column) -> ChResult<()> {
        let from = same_column(into, from)?;
        into.extend_from(from);
        Ok(())
    }

    #[test]
    fn same_column_through_short_borrow() {
        let mut column = Int8Column::from_vec(vec![1]);
        let other = Int8Column::from_vec(vec![2, 3]);
        merge(&mut column, &other).unwrap();
        assert_eq!(column.values(), &[1, 2, 3]);

        let wrong = UInt8Column::from_vec(vec![4]);
        assert!(matches!(
            merge(&mut column, &wrong),
            Err(ChError::MismatchedTypes(..))
        ));
        assert_eq!(column.len(), 3);
    }

    #[test]
    fn ranges() {
        assert_eq!(slice_range(1, 2, 5).unwrap(), 1..3);
        assert_eq!(slice_range(5, 0, 5).unwrap(), 5..5);
        assert!(matches!(
            slice_range(4, 2, 5),
            Err(ChError::OutOfBounds(6, 0, 5, _))
        ));
        assert!(slice_range(usize::MAX, 1, 5).is_err());
    }
}
