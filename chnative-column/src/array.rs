use std::any::Any;
use std::sync::Arc;

use chnative_dtype::{DType, TypeCode, TypeRef};
use chnative_error::{ChResult, ch_bail, ch_err};
use chnative_io::{WireRead, WireWrite};
use itertools::Itertools;

use crate::column::{same_column, slice_range};
use crate::{Column, ColumnRef, UInt64Column, create_column};

/// Variable-length arrays.
///
/// The items of every row are stored back to back in one flattened column, and each row keeps
/// the cumulative item count at its end. On the wire the end offsets come first, then the
/// items.
#[derive(Debug)]
pub struct ArrayColumn {
    dtype: TypeRef,
    offsets: UInt64Column,
    items: ColumnRef,
}

fn to_offset(len: usize) -> ChResult<u64> {
    u64::try_from(len).map_err(|_| ch_err!(InvalidArgument: "array of {len} items is too long"))
}

fn to_index(offset: u64) -> ChResult<usize> {
    usize::try_from(offset).map_err(|_| ch_err!(InvalidSerde: "array offset {offset} is too large"))
}

/// Fails unless `offsets` never decrease.
fn check_offsets(offsets: &[u64]) -> ChResult<()> {
    match offsets.iter().tuple_windows().find(|(a, b)| a > b) {
        Some((a, b)) => Err(ch_err!(InvalidSerde: "array offsets decrease from {a} to {b}")),
        None => Ok(()),
    }
}

impl ArrayColumn {
    /// An empty column of `dtype`, which must be an `Array`.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        let item = dtype
            .item_type()
            .ok_or_else(|| ch_err!(MismatchedTypes: TypeCode::Array, dtype))?;
        let items = create_column(item)?;
        Ok(Self {
            dtype,
            offsets: UInt64Column::new(),
            items,
        })
    }

    /// A column over flattened `items`, split into rows by cumulative end `offsets`.
    ///
    /// The offsets must never decrease and the last one must be the number of items.
    pub fn from_parts(offsets: UInt64Column, items: ColumnRef) -> ChResult<Self> {
        check_offsets(offsets.values())?;
        let end = offsets.values().last().copied().unwrap_or_default();
        if end != to_offset(items.len())? {
            ch_bail!("array offsets end at {end} but there are {} items", items.len());
        }
        Ok(Self {
            dtype: Arc::new(DType::array(items.dtype().clone())),
            offsets,
            items,
        })
    }

    fn end(&self) -> u64 {
        self.offsets.values().last().copied().unwrap_or_default()
    }

    fn bounds(&self, index: usize) -> (usize, usize) {
        let start = match index {
            0 => 0,
            _ => self.offsets.at(index - 1),
        };
        // Offsets are bounded by the item count, which is a usize.
        (start as usize, self.offsets.at(index) as usize)
    }

    /// Appends one row holding every row of `items`.
    ///
    /// `items` must be the same kind of column as the item column.
    pub fn append(&mut self, items: &dyn Column) -> ChResult<()> {
        let end = to_offset(self.items.len() + items.len())?;
        self.items.try_append_column(items)?;
        self.offsets.append(end);
        Ok(())
    }

    /// The items of the row at `index`, as a new column.
    pub fn at(&self, index: usize) -> ChResult<ColumnRef> {
        if index >= self.offsets.len() {
            ch_bail!(OutOfBounds: index, 0, self.offsets.len());
        }
        let (start, end) = self.bounds(index);
        self.items.slice(start, end - start)
    }

    /// The number of items in the row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn row_len(&self, index: usize) -> usize {
        let (start, end) = self.bounds(index);
        end - start
    }

    /// The flattened items of every row.
    pub fn items(&self) -> &dyn Column {
        self.items.as_ref()
    }

    /// The cumulative end offset of every row.
    pub fn offsets(&self) -> &UInt64Column {
        &self.offsets
    }
}

impl Column for ArrayColumn {
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
        self.offsets.len()
    }

    fn clear(&mut self) {
        self.offsets.clear();
        self.items.clear();
    }

    /// Appends an empty array.
    fn append_default(&mut self) {
        let end = self.end();
        self.offsets.append(end);
    }

    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()> {
        let other = same_column(self, other)?;
        let base = self.end();
        self.items.try_append_column(other.items.as_ref())?;
        for offset in other.offsets.values() {
            self.offsets.append(base + offset);
        }
        Ok(())
    }

    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()> {
        let offsets = UInt64Column::read_values(input, rows)?;
        check_offsets(&offsets)?;
        let count = to_index(offsets.last().copied().unwrap_or_default())?;

        let mut items = self.items.clone_empty();
        items.load(input, count)?;
        log::trace!("loaded {rows} rows of {} with {count} items", self.dtype);

        let base = self.end();
        self.items.try_append_column(items.as_ref())?;
        for offset in offsets {
            self.offsets.append(base + offset);
        }
        Ok(())
    }

    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()> {
        self.offsets.save(output)?;
        self.items.save(output)
    }

    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef> {
        let rows = slice_range(begin, len, self.offsets.len())?;
        if rows.is_empty() {
            return Ok(self.clone_empty());
        }
        let (start, _) = self.bounds(rows.start);
        let (_, end) = self.bounds(rows.end - 1);
        let base = start as u64;
        Ok(Box::new(Self {
            dtype: self.dtype.clone(),
            offsets: self.offsets.values()[rows]
                .iter()
                .map(|offset| offset - base)
                .collect(),
            items: self.items.slice(start, end - start)?,
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            dtype: self.dtype.clone(),
            offsets: UInt64Column::new(),
            items: self.items.clone_empty(),
        })
    }
}
