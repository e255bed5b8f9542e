//! Date and time columns.
//!
//! Each stores its rows in a single unsigned primitive column and converts on the way in and
//! out. None of them interpret timezones: those only travel in the column type.

use std::sync::Arc;

use chnative_dtype::{DType, TypeCode, TypeRef};
use chnative_error::ChResult;

use crate::column::{check_code, delegate_column};
use crate::{UInt16Column, UInt32Column, UInt64Column};

const SECONDS_PER_DAY: i64 = 86_400;

/// Dates, stored as a 16-bit count of days since the epoch.
#[derive(Debug, Clone)]
pub struct DateColumn {
    dtype: TypeRef,
    data: UInt16Column,
}

impl DateColumn {
    /// An empty column.
    pub fn new() -> Self {
        Self::from_data(UInt16Column::new())
    }

    /// A column over existing day counts.
    pub fn from_data(data: UInt16Column) -> Self {
        Self {
            dtype: Arc::new(DType::Date),
            data,
        }
    }

    /// Appends the day containing `seconds` since the epoch.
    ///
    /// The time of day is truncated toward zero; days past the 16-bit range wrap.
    pub fn append(&mut self, seconds: i64) {
        self.data.append((seconds / SECONDS_PER_DAY) as u16);
    }

    /// The start of the day at `index`, in seconds since the epoch.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> i64 {
        i64::from(self.data.at(index)) * SECONDS_PER_DAY
    }

    /// The stored day counts.
    pub fn data(&self) -> &UInt16Column {
        &self.data
    }
}

impl Default for DateColumn {
    fn default() -> Self {
        Self::new()
    }
}

delegate_column!(DateColumn);

/// Timestamps, stored as 32-bit seconds since the epoch.
#[derive(Debug, Clone)]
pub struct DateTimeColumn {
    dtype: TypeRef,
    data: UInt32Column,
}

impl DateTimeColumn {
    /// An empty column without a timezone.
    pub fn new() -> Self {
        Self::from_data(UInt32Column::new())
    }

    /// An empty column of `dtype`, which must be a `DateTime`.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        check_code(&dtype, TypeCode::DateTime)?;
        Ok(Self {
            dtype,
            data: UInt32Column::new(),
        })
    }

    /// A column over existing second counts.
    pub fn from_data(data: UInt32Column) -> Self {
        Self {
            dtype: Arc::new(DType::DateTime(None)),
            data,
        }
    }

    /// Appends `seconds` since the epoch, wrapped to 32 bits.
    pub fn append(&mut self, seconds: i64) {
        self.data.append(seconds as u32);
    }

    /// The timestamp at `index`, in seconds since the epoch.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> i64 {
        i64::from(self.data.at(index))
    }

    /// The timezone of the column type.
    pub fn timezone(&self) -> Option<&str> {
        self.dtype.timezone()
    }

    /// The stored second counts.
    pub fn data(&self) -> &UInt32Column {
        &self.data
    }
}

impl Default for DateTimeColumn {
    fn default() -> Self {
        Self::new()
    }
}

delegate_column!(DateTimeColumn);

/// Sub-second timestamps, stored as 64-bit ticks of `10^-precision` seconds.
///
/// Values are stored exactly as given: scaling to and from the precision is up to the caller.
#[derive(Debug, Clone)]
pub struct DateTime64Column {
    dtype: TypeRef,
    data: UInt64Column,
}

impl DateTime64Column {
    /// An empty column with the given precision and no timezone.
    pub fn try_new(precision: u8) -> ChResult<Self> {
        Ok(Self {
            dtype: Arc::new(DType::try_datetime64(precision)?),
            data: UInt64Column::new(),
        })
    }

    /// An empty column of `dtype`, which must be a `DateTime64`.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        check_code(&dtype, TypeCode::DateTime64)?;
        Ok(Self {
            dtype,
            data: UInt64Column::new(),
        })
    }

    /// Appends an already scaled value.
    pub fn append(&mut self, ticks: u64) {
        self.data.append(ticks);
    }

    /// The scaled value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> u64 {
        self.data.at(index)
    }

    /// The number of decimal digits below one second.
    pub fn precision(&self) -> u8 {
        self.dtype.datetime64_precision().unwrap_or_default()
    }

    /// The stored ticks.
    pub fn data(&self) -> &UInt64Column {
        &self.data
    }
}

delegate_column!(DateTime64Column);

#[cfg(test)]
mod tests {
    use chnative_error::ChError;

    use super::*;
    use crate::Column;

    #[test]
    fn date_truncates_to_day() {
        let mut column = DateColumn::new();
        column.append(1_700_000_000);
        assert_eq!(column.at(0), 1_700_000_000 - (1_700_000_000 % 86_400));
        assert_eq!(column.data().at(0), 19_675);
    }

    #[test]
    fn date_wire_round_trip() {
        let mut column = DateColumn::new();
        for days in [0i64, 1, 19_675, 65_535] {
            column.append(days * SECONDS_PER_DAY + 5);
        }
        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(&wire[..4], &[0, 0, 1, 0]);

        let mut loaded = DateColumn::new();
        loaded.load(&mut wire.as_slice(), 4).unwrap();
        assert_eq!(
            (0..4).map(|i| loaded.at(i)).collect::<Vec<_>>(),
            [0, 1, 19_675, 65_535].map(|d| d * SECONDS_PER_DAY)
        );
    }

    #[test]
    fn datetime_wraps_to_32_bits() {
        let mut column = DateTimeColumn::new();
        column.append(1_700_000_000);
        column.append((1 << 32) + 7);
        assert_eq!(column.at(0), 1_700_000_000);
        assert_eq!(column.at(1), 7);

        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire.len(), 8);
        assert_eq!(&wire[4..], &[7, 0, 0, 0]);
    }

    #[test]
    fn datetime_keeps_timezone() {
        let dtype: TypeRef = Arc::new("DateTime('UTC')".parse().unwrap());
        let column = DateTimeColumn::try_with_dtype(dtype).unwrap();
        assert_eq!(column.timezone(), Some("UTC"));
        assert_eq!(column.clone_empty().dtype().name(), "DateTime('UTC')");
        assert!(DateTimeColumn::try_with_dtype(Arc::new(DType::Date)).is_err());
    }

    #[test]
    fn datetime64_is_verbatim() {
        let mut column = DateTime64Column::try_new(3).unwrap();
        column.append(1_700_000_000_123);
        column.append(u64::MAX);
        assert_eq!(column.precision(), 3);
        assert_eq!(column.dtype().name(), "DateTime64(3)");

        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        let mut loaded = DateTime64Column::try_new(3).unwrap();
        loaded.load(&mut wire.as_slice(), 2).unwrap();
        assert_eq!(loaded.at(0), 1_700_000_000_123);
        assert_eq!(loaded.at(1), u64::MAX);
        assert!(DateTime64Column::try_new(10).is_err());
    }

    #[test]
    fn failed_load_keeps_rows() {
        let mut column = DateTimeColumn::new();
        column.append(1);
        assert!(matches!(
            column.load(&mut [0u8; 7].as_slice(), 2),
            Err(ChError::UnexpectedEof(8, 7, _))
        ));
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn slices_are_copies() {
        let mut column = DateColumn::new();
        for day in 0..5 {
            column.append(day * SECONDS_PER_DAY);
        }
        let slice = column.slice(1, 2).unwrap();
        column.append(10 * SECONDS_PER_DAY);

        let slice = slice.downcast_ref::<DateColumn>().unwrap();
        assert_eq!(slice.len(), 2);
        assert_eq!(slice.at(0), SECONDS_PER_DAY);
        assert_eq!(slice.at(1), 2 * SECONDS_PER_DAY);
    }

    #[test]
    fn merge_requires_same_kind() {
        let mut dates = DateColumn::new();
        dates.append(0);
        let mut times = DateTimeColumn::new();
        times.append(0);

        dates.append_column(&times);
        assert_eq!(dates.len(), 1);
        dates.append_column(&dates.clone());
        assert_eq!(dates.len(), 2);
    }
}
