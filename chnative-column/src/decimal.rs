use std::any::Any;

use chnative_dtype::{DType, DecimalDType, TypeCode, TypeRef};
use chnative_error::{ChResult, ch_bail, ch_err};
use chnative_io::{WireRead, WireWrite};

use crate::column::same_column;
use crate::{Column, ColumnRef, Int32Column, Int64Column, Int128Column};

/// Decimal values, stored as integers scaled by `10^scale`.
///
/// The storage width follows the precision: 32 bits up to 9 digits, 64 bits up to 18 and 128
/// bits beyond.
#[derive(Debug, Clone)]
pub struct DecimalColumn {
    dtype: TypeRef,
    decimal: DecimalDType,
    data: DecimalData,
}

#[derive(Debug, Clone)]
enum DecimalData {
    Int32(Int32Column),
    Int64(Int64Column),
    Int128(Int128Column),
}

/// Runs `$body` with `$data` bound to the storage column, whatever its width.
macro_rules! match_each_storage {
    ($storage:expr, |$data:ident| $body:expr) => {
        match $storage {
            DecimalData::Int32($data) => $body,
            DecimalData::Int64($data) => $body,
            DecimalData::Int128($data) => $body,
        }
    };
}

impl DecimalData {
    fn for_decimal(decimal: DecimalDType) -> Self {
        match decimal.storage_code() {
            TypeCode::Int32 => Self::Int32(Int32Column::new()),
            TypeCode::Int64 => Self::Int64(Int64Column::new()),
            _ => Self::Int128(Int128Column::new()),
        }
    }

    fn extend_from(&mut self, other: &Self) -> ChResult<()> {
        match (self, other) {
            (Self::Int32(data), Self::Int32(other)) => data.extend_from(other),
            (Self::Int64(data), Self::Int64(other)) => data.extend_from(other),
            (Self::Int128(data), Self::Int128(other)) => data.extend_from(other),
            (data, other) => ch_bail!(
                MismatchedTypes: match_each_storage!(data, |d| d.dtype()),
                match_each_storage!(other, |d| d.dtype())
            ),
        }
        Ok(())
    }

    fn slice_typed(&self, begin: usize, len: usize) -> ChResult<Self> {
        Ok(match self {
            Self::Int32(data) => Self::Int32(data.slice_typed(begin, len)?),
            Self::Int64(data) => Self::Int64(data.slice_typed(begin, len)?),
            Self::Int128(data) => Self::Int128(data.slice_typed(begin, len)?),
        })
    }
}

impl DecimalColumn {
    /// An empty column of the given precision and scale.
    pub fn try_new(precision: u8, scale: u8) -> ChResult<Self> {
        Self::try_with_dtype(DType::decimal(precision, scale)?.into())
    }

    /// An empty column of `dtype`, which must be one of the decimal types.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        let decimal = dtype
            .decimal_dtype()
            .ok_or_else(|| ch_err!(MismatchedTypes: TypeCode::Decimal, dtype))?;
        Ok(Self {
            dtype,
            decimal,
            data: DecimalData::for_decimal(decimal),
        })
    }

    /// The precision and scale of the column.
    pub fn decimal(&self) -> DecimalDType {
        self.decimal
    }

    /// Appends an already scaled value.
    ///
    /// Fails with a format error if the value has more digits than the precision allows.
    pub fn append(&mut self, value: i128) -> ChResult<()> {
        let limit = 10u128.pow(u32::from(self.decimal.precision()));
        if value.unsigned_abs() >= limit {
            ch_bail!(
                FormatError: "{value} has more than {} digits for {}",
                self.decimal.precision(),
                self.dtype
            );
        }
        let dtype = &self.dtype;
        let overflow = |_| ch_err!(FormatError: "{value} does not fit the storage of {dtype}");
        match &mut self.data {
            DecimalData::Int32(data) => data.append(i32::try_from(value).map_err(overflow)?),
            DecimalData::Int64(data) => data.append(i64::try_from(value).map_err(overflow)?),
            DecimalData::Int128(data) => data.append(value),
        }
        Ok(())
    }

    /// The scaled value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> i128 {
        match &self.data {
            DecimalData::Int32(data) => i128::from(data.at(index)),
            DecimalData::Int64(data) => i128::from(data.at(index)),
            DecimalData::Int128(data) => data.at(index),
        }
    }
}

impl Column for DecimalColumn {
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
        match_each_storage!(&self.data, |data| data.len())
    }

    fn clear(&mut self) {
        match_each_storage!(&mut self.data, |data| data.clear())
    }

    fn append_default(&mut self) {
        match_each_storage!(&mut self.data, |data| data.append_default())
    }

    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from(&other.data)
    }

    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()> {
        match_each_storage!(&mut self.data, |data| data.load(input, rows))
    }

    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()> {
        match_each_storage!(&self.data, |data| data.save(output))
    }

    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef> {
        Ok(Box::new(Self {
            dtype: self.dtype.clone(),
            decimal: self.decimal,
            data: self.data.slice_typed(begin, len)?,
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            dtype: self.dtype.clone(),
            decimal: self.decimal,
            data: DecimalData::for_decimal(self.decimal),
        })
    }
}
