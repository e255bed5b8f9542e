use std::any::Any;
use std::sync::Arc;

use chnative_dtype::{DType, EnumDType, TypeCode, TypeRef};
use chnative_error::{ChResult, ch_bail, ch_err};
use chnative_io::{WireRead, WireWrite};

use crate::column::{check_code, same_column};
use crate::{Column, ColumnRef, NativeType, PrimitiveColumn};

/// The storage type of an enum column.
pub trait EnumStorage: NativeType + Into<i16> + TryFrom<i16> {
    /// The enum kind stored as this type.
    const ENUM_CODE: TypeCode;
}

impl EnumStorage for i8 {
    const ENUM_CODE: TypeCode = TypeCode::Enum8;
}

impl EnumStorage for i16 {
    const ENUM_CODE: TypeCode = TypeCode::Enum16;
}

/// Values of an `Enum8` or `Enum16`, stored as their numbers.
///
/// Appends are checked against the enum type: only values and names it declares are accepted.
#[derive(Debug, Clone)]
pub struct EnumColumn<T> {
    dtype: TypeRef,
    items: Arc<EnumDType>,
    data: PrimitiveColumn<T>,
}

/// Column of `Enum8` values.
pub type Enum8Column = EnumColumn<i8>;
/// Column of `Enum16` values.
pub type Enum16Column = EnumColumn<i16>;

impl<T: EnumStorage> EnumColumn<T> {
    /// An empty column of `dtype`, which must be the enum kind stored as `T`.
    pub fn try_with_dtype(dtype: TypeRef) -> ChResult<Self> {
        check_code(&dtype, T::ENUM_CODE)?;
        let items = match dtype.as_ref() {
            DType::Enum8(items) | DType::Enum16(items) => items.clone(),
            _ => ch_bail!(MismatchedTypes: T::ENUM_CODE, dtype),
        };
        Ok(Self {
            dtype,
            items,
            data: PrimitiveColumn::new(),
        })
    }

    /// The names and values the enum type declares.
    pub fn items(&self) -> &EnumDType {
        &self.items
    }

    /// Appends a value, which must be declared by the enum type.
    pub fn append(&mut self, value: T) -> ChResult<()> {
        let raw: i16 = value.into();
        if !self.items.has_value(raw) {
            ch_bail!(FormatError: "{raw} is not a value of {}", self.dtype);
        }
        self.data.append(value);
        Ok(())
    }

    /// Appends the value bound to `name`.
    pub fn append_name(&mut self, name: &str) -> ChResult<()> {
        let value = self
            .items
            .value_of(name)
            .ok_or_else(|| ch_err!(FormatError: "'{name}' is not a name of {}", self.dtype))?;
        let value = T::try_from(value)
            .map_err(|_| ch_err!(FormatError: "{value} does not fit {}", T::ENUM_CODE))?;
        self.data.append(value);
        Ok(())
    }

    /// The value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn at(&self, index: usize) -> T {
        self.data.at(index)
    }

    /// The name of the value at `index`, if the enum type declares one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.items.name_of(self.at(index).into())
    }

    /// The stored values.
    pub fn data(&self) -> &PrimitiveColumn<T> {
        &self.data
    }
}

impl<T: EnumStorage> Column for EnumColumn<T> {
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

    /// Appends the smallest declared value.
    fn append_default(&mut self) {
        let value = self
            .items
            .iter()
            .next()
            .and_then(|(value, _)| T::try_from(value).ok())
            .unwrap_or_default();
        self.data.append(value);
    }

    fn try_append_column(&mut self, other: &dyn Column) -> ChResult<()> {
        let other = same_column(self, other)?;
        self.data.extend_from(&other.data);
        Ok(())
    }

    /// Loads stored numbers as they are, without checking them against the enum type.
    fn load(&mut self, input: &mut dyn WireRead, rows: usize) -> ChResult<()> {
        self.data.load(input, rows)
    }

    fn save(&self, output: &mut dyn WireWrite) -> ChResult<()> {
        self.data.save(output)
    }

    fn slice(&self, begin: usize, len: usize) -> ChResult<ColumnRef> {
        Ok(Box::new(Self {
            dtype: self.dtype.clone(),
            items: self.items.clone(),
            data: self.data.slice_typed(begin, len)?,
        }))
    }

    fn clone_empty(&self) -> ColumnRef {
        Box::new(Self {
            dtype: self.dtype.clone(),
            items: self.items.clone(),
            data: PrimitiveColumn::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chnative_error::ChError;

    use super::*;

    fn status() -> Enum8Column {
        let dtype = "Enum8('active' = 1, 'paused' = 2, 'gone' = -1)".parse().unwrap();
        Enum8Column::try_with_dtype(Arc::new(dtype)).unwrap()
    }

    #[test]
    fn appends_by_value_and_name() {
        let mut column = status();
        column.append(2).unwrap();
        column.append_name("gone").unwrap();
        assert_eq!(column.at(1), -1);
        assert_eq!(column.name_at(0), Some("paused"));

        assert!(matches!(column.append(3), Err(ChError::FormatError(..))));
        assert!(matches!(
            column.append_name("unknown"),
            Err(ChError::FormatError(..))
        ));
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn wire_round_trip() {
        let mut column = status();
        column.append_name("active").unwrap();
        column.append_name("gone").unwrap();
        column.append_default();

        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire, [1, 0xff, 0xff]);

        let mut loaded = column.clone_empty();
        loaded.load(&mut wire.as_slice(), 3).unwrap();
        let loaded = loaded.downcast_ref::<Enum8Column>().unwrap();
        assert_eq!(loaded.name_at(0), Some("active"));
        assert_eq!(loaded.name_at(2), Some("gone"));
    }

    #[test]
    fn enum16_storage() {
        let items = [chnative_dtype::EnumItem::new("big", 1000)];
        let dtype = Arc::new(DType::try_enum16(items).unwrap());
        let mut column = Enum16Column::try_with_dtype(dtype.clone()).unwrap();
        column.append_name("big").unwrap();
        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();
        assert_eq!(wire, 1000i16.to_le_bytes());

        assert!(Enum8Column::try_with_dtype(dtype).is_err());
    }

    #[test]
    fn merge_requires_same_enum() {
        let mut column = status();
        column.append(1).unwrap();
        let other = Enum8Column::try_with_dtype(Arc::new(
            "Enum8('active' = 1)".parse().unwrap(),
        ))
        .unwrap();
        assert!(column.try_append_column(&other).is_err());
        column.append_column(&column.clone());
        assert_eq!(column.len(), 2);
    }
}
