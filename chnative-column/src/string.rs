use std::any::Any;
use std::sync::Arc;

use chnative_dtype::{DType, TypeCode, TypeRef};
use chnative_error::{ChResult, ch_bail, ch_err};
use chnative_io::{WireRead, WireWrite};

use crate::column::{check_code, same_column, slice_range};
use crate::{Column, ColumnRef};

/// Variable-length strings, each written as a varint byte length followed by the bytes.
#[derive(Debug, Clone)]
pub struct StringColumn {
    dtype: TypeRef,
    data: Vec<String>,
}

impl StringColumn {
    /// An empty column.
    pub fn new() -> Self {
        Self {
            dtype: Arc::new(DType::String),
            data: Vec::new(),
        }
    }

    /// Appends one string.
    pub fn append(&mut self, value: impl Into<String>) {
        self.data.push(value.into());
    }

    /// The string at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> &str {
        &self.data[index]
    }

    /// All strings in row order.
    pub fn values(&self) -> &[String] {
        &self.data
    }
}

impl Default for StringColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Into<String>> FromIterator<S> for StringColumn {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            dtype: Arc::new(DType::String),
            data: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Column for StringColumn {
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
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn append_default(&mut self) {
        self.data.push(String::new());
    }

    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from_slice(&other.data);
        Ok(())
    }

    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()> {
        let mut staged = Vec::new();
        for row in 0..rows {
            let bytes = input.read_binary()?;
            let value = String::from_utf8(bytes.to_vec())
                .map_err(|e| ch_err!(InvalidSerde: "string in row {row} is not UTF-8: {e}"))?;
            staged.push(value);
        }
        self.data.extend(staged);
        Ok(())
    }

    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()> {
        for value in &self.data {
            output.write_binary(value.as_bytes())?;
        }
        Ok(())
    }

    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef> {
        let range = slice_range(begin, len, self.data.len())?;
        Ok(Box::new(Self {
            dtype: self.dtype.clone(),
            data: self.data[range].to_vec(),
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self::new())
    }
}

/// Strings of a fixed byte width, written back to back without separators.
#[derive(Debug, Clone)]
pub struct FixedStringColumn {
    dtype: TypeRef,
    width: usize,
    rows: usize,
    data: Vec<u8>,
}

impl FixedStringColumn {
    /// An empty column of `width`-byte strings.
    pub fn new(width: usize) -> Self {
        Self {
            dtype: Arc::new(DType::fixed_string(width)),
            width,
            rows: 0,
            data: Vec::new(),
        }
    }

    /// An empty column of `dtype`, which must be a `FixedString`.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        check_code(&dtype, TypeCode::FixedString)?;
        let width = dtype.fixed_string_width().unwrap_or_default();
        Ok(Self {
            dtype,
            width,
            rows: 0,
            data: Vec::new(),
        })
    }

    /// The byte width of every row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Appends `value`, padded with zero bytes to the column width.
    ///
    /// Fails with a format error if `value` is wider than the column.
    pub fn append(&mut self, value: impl AsRef<[u8]>) -> ChResult<()> {
        let value = value.as_ref();
        if value.len() > self.width {
            ch_bail!(
                FormatError: "{} bytes do not fit in FixedString({})",
                value.len(),
                self.width
            );
        }
        self.data.extend_from_slice(value);
        self.data.resize(self.data.len() + self.width - value.len(), 0);
        self.rows += 1;
        Ok(())
    }

    /// The bytes at `index`, including any padding.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> &[u8] {
        &self.data[index * self.width..(index + 1) * self.width]
    }

    /// The bytes at `index` without trailing zero padding.
    pub fn trimmed(&self, index: usize) -> &[u8] {
        let value = self.at(index);
        let end = value.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        &value[..end]
    }
}

impl Column for FixedStringColumn {
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
        self.rows
    }

    fn clear(&mut self) {
        self.data.clear();
        self.rows = 0;
    }

    fn append_default(&mut self) {
        self.data.resize(self.data.len() + self.width, 0);
        self.rows += 1;
    }

    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from_slice(&other.data);
        self.rows += other.rows;
        Ok(())
    }

    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()> {
        let len = rows
            .checked_mul(self.width)
            .ok_or_else(|| ch_err!(InvalidSerde: "{rows} rows of {} overflow", self.dtype))?;
        let chunk = input.read_chunk(len)?;
        self.data.extend_from_slice(&chunk);
        self.rows += rows;
        Ok(())
    }

    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()> {
        output.write_raw(&self.data)
    }

    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef> {
        let range = slice_range(begin, len, self.rows)?;
        Ok(Box::new(Self {
            dtype: self.dtype.clone(),
            width: self.width,
            rows: range.len(),
            data: self.data[range.start * self.width..range.end * self.width].to_vec(),
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            dtype: self.dtype.clone(),
            width: self.width,
            rows: 0,
            data: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chnative_error::ChError;

    use super::*;

    #[test]
    fn string_wire_layout() {
        let column: StringColumn = ["", "ab", "ü"].into_iter().collect();
        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire, [0, 2, b'a', b'b', 2, 0xc3, 0xbc]);

        let mut loaded = StringColumn::new();
        loaded.load(&mut wire.as_slice(), 3).unwrap();
        assert_eq!(loaded.values(), column.values());
    }

    #[test]
    fn string_load_is_all_or_nothing() {
        let mut column = StringColumn::new();
        column.append("kept");

        let truncated = [1u8, b'x', 5, b'y'];
        assert!(matches!(
            column.load(&mut truncated.as_slice(), 2),
            Err(ChError::UnexpectedEof(5, 1, _))
        ));
        let invalid = [1u8, 0xff];
        assert!(matches!(
            column.load(&mut invalid.as_slice(), 1),
            Err(ChError::InvalidSerde(..))
        ));
        assert_eq!(column.values(), &["kept"]);
    }

    #[test]
    fn string_slice() {
        let column: StringColumn = ["a", "b", "c", "d"].into_iter().collect();
        let slice = column.slice(1, 2).unwrap();
        let slice = slice.downcast_ref::<StringColumn>().unwrap();
        assert_eq!(slice.values(), &["b", "c"]);
    }

    #[test]
    fn fixed_string_pads() {
        let mut column = FixedStringColumn::new(4);
        column.append("ab").unwrap();
        column.append(b"wxyz").unwrap();
        assert!(matches!(
            column.append("toolong"),
            Err(ChError::FormatError(..))
        ));
        assert_eq!(column.len(), 2);
        assert_eq!(column.at(0), b"ab\0\0");
        assert_eq!(column.trimmed(0), b"ab");
        assert_eq!(column.trimmed(1), b"wxyz");

        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire, b"ab\0\0wxyz");

        let mut loaded = column.clone_empty();
        loaded.load(&mut wire.as_slice(), 2).unwrap();
        let loaded = loaded.downcast_ref::<FixedStringColumn>().unwrap();
        assert_eq!(loaded.at(1), b"wxyz");
        assert_eq!(loaded.dtype().name(), "FixedString(4)");
    }

    #[test]
    fn fixed_string_slice_and_merge() {
        let mut column = FixedStringColumn::new(2);
        for value in ["a", "b", "c"] {
            column.append(value).unwrap();
        }
        let slice = column.slice(2, 1).unwrap();
        assert_eq!(slice.downcast_ref::<FixedStringColumn>().unwrap().trimmed(0), b"c");

        let narrower = FixedStringColumn::new(1);
        assert!(column.try_append_column(&narrower).is_err());
        column.append_column(&*slice);
        assert_eq!(column.len(), 4);
        assert_eq!(column.trimmed(3), b"c");
    }

    #[test]
    fn zero_width_rows_are_counted() {
        let mut column = FixedStringColumn::new(0);
        column.append("").unwrap();
        column.load(&mut [0u8; 0].as_slice(), 3).unwrap();
        assert_eq!(column.len(), 4);
        assert_eq!(column.at(2), b"");
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn at_past_the_end_panics() {
        let column: StringColumn = ["only"].into_iter().collect();
        column.at(1);
    }
}
