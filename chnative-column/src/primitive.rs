use std::any::Any;
use std::sync::Arc;

use bytes::BytesMut;
use chnative_dtype::TypeRef;
use chnative_error::{ChResult, ch_bail, ch_err};
use chnative_io::{WireRead, WireWrite};

use crate::column::{same_column, slice_range};
use crate::{Column, ColumnRef, NativeType};

/// A column of fixed-width numbers.
#[derive(Debug, Clone)]
pub struct PrimitiveColumn<T> {
    dtype: TypeRef,
    data: Vec<T>,
}

/// Column of `Int8` values.
pub type Int8Column = PrimitiveColumn<i8>;
/// Column of `Int16` values.
pub type Int16Column = PrimitiveColumn<i16>;
/// Column of `Int32` values.
pub type Int32Column = PrimitiveColumn<i32>;
/// Column of `Int64` values.
pub type Int64Column = PrimitiveColumn<i64>;
/// Column of `Int128` values.
pub type Int128Column = PrimitiveColumn<i128>;
/// Column of `UInt8` values.
pub type UInt8Column = PrimitiveColumn<u8>;
/// Column of `UInt16` values.
pub type UInt16Column = PrimitiveColumn<u16>;
/// Column of `UInt32` values.
pub type UInt32Column = PrimitiveColumn<u32>;
/// Column of `UInt64` values.
pub type UInt64Column = PrimitiveColumn<u64>;
/// Column of `Float32` values.
pub type Float32Column = PrimitiveColumn<f32>;
/// Column of `Float64` values.
pub type Float64Column = PrimitiveColumn<f64>;

impl<T: NativeType> PrimitiveColumn<T> {
    /// An empty column.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// A column holding `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            dtype: Arc::new(T::dtype()),
            data,
        }
    }

    /// An empty column of `dtype`, which must be stored as `T`.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        if dtype.code() != T::CODE {
            ch_bail!(MismatchedTypes: T::CODE, dtype);
        }
        Ok(Self {
            dtype,
            data: Vec::new(),
        })
    }

    /// Appends one value.
    pub fn append(&mut self, value: T) {
        self.data.push(value);
    }

    /// The value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; see [`PrimitiveColumn::get`] for a checked variant.
    pub fn at(&self, index: usize) -> T {
        self.data[index]
    }

    /// The value at `index`, if there is one.
    pub fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    /// All values in row order.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Reserve room for `additional` more rows.
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    /// A copy of rows `begin..begin + len`.
    pub fn slice_typed(&self, begin: usize, len: usize) -> ChResult<Self> {
        let range = slice_range(begin, len, self.data.len())?;
        Ok(Self {
            dtype: self.dtype.clone(),
            data: self.data[range].to_vec(),
        })
    }

    /// Appends every value of `other`.
    pub fn extend_from(&mut self, other: &Self) {
        self.data.extend_from_slice(&other.data);
    }

    /// Reads `rows` values without touching the column.
    pub(crate) fn read_values(input: &mut dyn WireRead, rows: usize) -> ChResult<Vec<T>> {
        let len = rows
            .checked_mul(T::WIDTH)
            .ok_or_else(|| ch_err!(InvalidSerde: "{rows} rows of {} overflow", T::CODE))?;
        let mut chunk = input.read_chunk(len)?;
        Ok((0..rows).map(|_| T::read_le(&mut chunk)).collect())
    }
}

impl<T: NativeType> Default for PrimitiveColumn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NativeType> From<Vec<T>> for PrimitiveColumn<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T: NativeType> FromIterator<T> for PrimitiveColumn<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: NativeType> Column for PrimitiveColumn<T> {
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
        self.data.push(T::default());
    }

    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from_slice(&other.data);
        Ok(())
    }

    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()> {
        let values = Self::read_values(input, rows)?;
        log::trace!("loaded {rows} rows of {}", self.dtype);
        self.data.extend(values);
        Ok(())
    }

    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()> {
        let mut buf = BytesMut::with_capacity(self.data.len() * T::WIDTH);
        for value in &self.data {
            value.write_le(&mut buf);
        }
        log::trace!("saving {} rows of {}", self.data.len(), self.dtype);
        output.write_raw(&buf)
    }

    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef> {
        Ok(Box::new(self.slice_typed(begin, len)?))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            dtype: self.dtype.clone(),
            data: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chnative_dtype::DType;
    use chnative_error::ChError;
    use rstest::rstest;

    use super::*;

    fn round_trip<T: NativeType>(values: Vec<T>) {
        let column = PrimitiveColumn::from_vec(values.clone());
        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire.len(), values.len() * T::WIDTH);

        let mut loaded = column.clone_empty();
        loaded.load(&mut wire.as_slice(), values.len()).unwrap();
        let loaded = loaded.downcast_ref::<PrimitiveColumn<T>>().unwrap();
        assert_eq!(loaded.values(), values.as_slice());
    }

    #[test]
    fn wire_round_trip() {
        round_trip(vec![0u8, 1, 255]);
        round_trip(vec![u16::MAX, 0, 7]);
        round_trip(vec![-1i32, i32::MIN, i32::MAX]);
        round_trip(vec![u64::MAX, 42]);
        round_trip(vec![i128::MIN, -1, i128::MAX]);
        round_trip(vec![0.5f32, f32::MAX]);
        round_trip(vec![-2.25f64, 1e300]);
    }

    #[test]
    fn little_endian_wire_layout() {
        let column = UInt32Column::from_vec(vec![0x0403_0201]);
        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire, [1, 2, 3, 4]);
    }

    #[test]
    fn short_stream_leaves_column_unchanged() {
        let mut column = UInt16Column::from_vec(vec![9]);
        let wire = [1u8, 0, 2];
        let err = column.load(&mut wire.as_slice(), 2).unwrap_err();
        assert!(matches!(err, ChError::UnexpectedEof(4, 3, _)));
        assert_eq!(column.values(), &[9]);
    }

    #[test]
    fn load_appends() {
        let mut column = Int8Column::from_vec(vec![1]);
        column.load(&mut [2u8, 0xff].as_slice(), 2).unwrap();
        assert_eq!(column.values(), &[1, 2, -1]);
    }

    #[test]
    fn slice_is_independent() {
        let mut column: UInt64Column = (0..5).collect();
        let slice = column.slice(1, 2).unwrap();
        column.append(99);
        column.clear();

        let slice = slice.downcast_ref::<UInt64Column>().unwrap();
        assert_eq!(slice.values(), &[1, 2]);
    }

    #[rstest]
    #[case(0, 6)]
    #[case(5, 1)]
    #[case(6, 0)]
    fn slice_out_of_bounds(#[case] begin: usize, #[case] len: usize) {
        let column: UInt8Column = (0..5).collect();
        assert!(matches!(
            column.slice(begin, len),
            Err(ChError::OutOfBounds(..))
        ));
    }

    #[test]
    fn accessors() {
        let mut column = Float64Column::new();
        column.append(1.0);
        column.append_default();
        assert_eq!(column.at(0), 1.0);
        assert_eq!(column.get(1), Some(0.0));
        assert_eq!(column.get(2), None);
        assert_eq!(column.dtype().code(), DType::Float64.code());
    }

    #[test]
    fn merge_policy() {
        let mut column = Int32Column::from_vec(vec![1]);
        let other = Int32Column::from_vec(vec![2, 3]);
        column.append_column(&other);
        assert_eq!(column.values(), &[1, 2, 3]);

        let unrelated = UInt32Column::from_vec(vec![4]);
        column.append_column(&unrelated);
        assert_eq!(column.len(), 3);
        assert!(matches!(
            column.try_append_column(&unrelated),
            Err(ChError::MismatchedTypes(..))
        ));
    }

    #[test]
    fn dtype_must_match_storage() {
        assert!(Int8Column::try_with_dtype(Arc::new(DType::Int8)).is_ok());
        assert!(Int8Column::try_with_dtype(Arc::new(DType::UInt8)).is_err());
    }
}
