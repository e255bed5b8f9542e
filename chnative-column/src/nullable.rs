use std::any::Any;
use std::sync::Arc;

use chnative_dtype::{DType, TypeCode, TypeRef};
use chnative_error::{ChResult, ch_bail, ch_err};
use chnative_io::{WireRead, WireWrite};

use crate::column::same_column;
use crate::{Column, ColumnRef, UInt8Column, create_column};

/// Values that may be null.
///
/// Rows live in a nested column with a placeholder default in place of each null, alongside a
/// byte per row that is 1 for null. On the wire the null map comes first, then the nested rows.
#[derive(Debug)]
pub struct NullableColumn {
    dtype: TypeRef,
    nulls: UInt8Column,
    nested: ColumnRef,
}

impl NullableColumn {
    /// An empty column of `dtype`, which must be a `Nullable`.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        let nested = dtype
            .nested_type()
            .ok_or_else(|| ch_err!(MismatchedTypes: TypeCode::Nullable, dtype))?;
        let nested = create_column(nested)?;
        Ok(Self {
            dtype,
            nulls: UInt8Column::new(),
            nested,
        })
    }

    /// A column over a null map and the nested rows it describes.
    ///
    /// Both must have the same number of rows.
    pub fn from_parts(nulls: UInt8Column, nested: ColumnRef) -> ChResult<Self> {
        if nulls.len() != nested.len() {
            ch_bail!(
                "null map has {} rows but the nested column has {}",
                nulls.len(),
                nested.len()
            );
        }
        Ok(Self {
            dtype: Arc::new(DType::nullable(nested.dtype().clone())),
            nulls,
            nested,
        })
    }

    /// Appends a null.
    pub fn append_null(&mut self) {
        self.nested.append_default();
        self.nulls.append(1);
    }

    /// Appends every row of `values` as a non-null row.
    ///
    /// `values` must be the same kind of column as the nested one.
    pub fn append_values(&mut self, values: &dyn Column) -> ChResult<()> {
        self.nested.try_append_column(values)?;
        for _ in 0..values.len() {
            self.nulls.append(0);
        }
        Ok(())
    }

    /// Whether the row at `index` is null.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn is_null(&self, index: usize) -> bool {
        self.nulls.at(index) != 0
    }

    /// The nested rows, with placeholders for nulls.
    pub fn nested(&self) -> &dyn Column {
        self.nested.as_ref()
    }

    /// The null map.
    pub fn nulls(&self) -> &UInt8Column {
        &self.nulls
    }
}

impl Column for NullableColumn {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn dtype(&self) -> &TypeRef {
        &self.dtype
    }

    fn len(&self) -> usize {
        self.nulls.len()
    }

    fn clear(&mut self) {
        self.nulls.clear();
        self.nested.clear();
    }

    /// Appends a null.
    fn append_default(&mut self) {
        self.append_null();
    }

    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()> {
        let other = same_column(self, other)?;
        self.nested.try_append_column(other.nested.as_ref())?;
        self.nulls.extend_from(&other.nulls);
        Ok(())
    }

    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()> {
        let nulls = UInt8Column::from_vec(UInt8Column::read_values(input, rows)?);
        let mut nested = self.nested.clone_empty();
        nested.load(input, rows)?;
        self.nested.try_append_column(nested.as_ref())?;
        self.nulls.extend_from(&nulls);
        Ok(())
    }

    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()> {
        self.nulls.save(output)?;
        self.nested.save(output)
    }

    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef> {
        Ok(Box::new(Self {
            dtype: self.dtype.clone(),
            nulls: self.nulls.slice_typed(begin, len)?,
            nested: self.nested.slice(begin, len)?,
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            dtype: self.dtype.clone(),
            nulls: UInt8Column::new(),
            nested: self.nested.clone_empty(),
        })
    }
}
