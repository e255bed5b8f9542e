use chnative_dtype::{DType, TypeNameCache, TypeRef};
use chnative_error::{ChResult, ch_bail};

use crate::{
    ArrayColumn, ColumnRef, DateColumn, DateTime64Column, DateTimeColumn, DecimalColumn,
    Enum8Column, Enum16Column, FixedStringColumn, Float32Column, Float64Column, Int8Column,
    Int16Column, Int32Column, Int64Column, Int128Column, Ipv4Column, Ipv6Column, NullableColumn,
    StringColumn, TupleColumn, UInt8Column, UInt16Column, UInt32Column, UInt64Column, UuidColumn,
};

/// An empty column for rows of `dtype`.
///
/// Nested types get their nested columns built the same way. `Void` has no column.
pub fn create_column(dtype: &TypeRef) -> ChResult<ColumnRef> {
    let dtype = dtype.clone();
    let column: ColumnRef = match dtype.as_ref() {
        DType::Void => ch_bail!(NotImplemented: "create_column", dtype),
        DType::Int8 => Box::new(Int8Column::try_with_dtype(dtype)?),
        DType::Int16 => Box::new(Int16Column::try_with_dtype(dtype)?),
        DType::Int32 => Box::new(Int32Column::try_with_dtype(dtype)?),
        DType::Int64 => Box::new(Int64Column::try_with_dtype(dtype)?),
        DType::Int128 => Box::new(Int128Column::try_with_dtype(dtype)?),
        DType::UInt8 => Box::new(UInt8Column::try_with_dtype(dtype)?),
        DType::UInt16 => Box::new(UInt16Column::try_with_dtype(dtype)?),
        DType::UInt32 => Box::new(UInt32Column::try_with_dtype(dtype)?),
        DType::UInt64 => Box::new(UInt64Column::try_with_dtype(dtype)?),
        DType::Float32 => Box::new(Float32Column::try_with_dtype(dtype)?),
        DType::Float64 => Box::new(Float64Column::try_with_dtype(dtype)?),
        DType::String => Box::new(StringColumn::new()),
        DType::FixedString(_) => Box::new(FixedStringColumn::try_with_dtype(dtype)?),
        DType::Uuid => Box::new(UuidColumn::new()),
        DType::IPv4 => Box::new(Ipv4Column::new()),
        DType::IPv6 => Box::new(Ipv6Column::new()),
        DType::Date => Box::new(DateColumn::new()),
        DType::DateTime(_) => Box::new(DateTimeColumn::try_with_dtype(dtype)?),
        DType::DateTime64(..) => Box::new(DateTime64Column::try_with_dtype(dtype)?),
        DType::Array(_) => Box::new(ArrayColumn::try_with_dtype(dtype)?),
        DType::Nullable(_) => Box::new(NullableColumn::try_with_dtype(dtype)?),
        DType::Tuple(_) => Box::new(TupleColumn::try_with_dtype(dtype)?),
        DType::Enum8(_) => Box::new(Enum8Column::try_with_dtype(dtype)?),
        DType::Enum16(_) => Box::new(Enum16Column::try_with_dtype(dtype)?),
        DType::Decimal(_) | DType::Decimal32(_) | DType::Decimal64(_) | DType::Decimal128(_) => {
            Box::new(DecimalColumn::try_with_dtype(dtype)?)
        }
    };
    Ok(column)
}

/// An empty column for rows of the type named `name`, parsed through the global type cache.
pub fn create_column_for_name(name: &str) -> ChResult<ColumnRef> {
    let dtype = TypeNameCache::global().get_or_parse(name)?;
    log::debug!("creating column for {dtype}");
    create_column(&dtype)
}

#[cfg(test)]
mod tests {
    use chnative_error::ChError;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Int8")]
    #[case("UInt64")]
    #[case("Int128")]
    #[case("Float64")]
    #[case("String")]
    #[case("FixedString(16)")]
    #[case("UUID")]
    #[case("IPv4")]
    #[case("IPv6")]
    #[case("Date")]
    #[case("DateTime('Europe/Moscow')")]
    #[case("DateTime64(6)")]
    #[case("Array(Array(Int32))")]
    #[case("Nullable(FixedString(4))")]
    #[case("Tuple(Int8, Array(String))")]
    #[case("Enum8('a' = 1, 'b' = 2)")]
    #[case("Enum16('x' = -300)")]
    #[case("Decimal(18,4)")]
    #[case("Decimal128(3)")]
    fn builds_column_of_named_type(#[case] name: &str) {
        let column = create_column_for_name(name).unwrap();
        assert_eq!(column.dtype().name(), name);
        assert!(column.is_empty());
    }

    #[rstest]
    #[case("Array(Nullable(UInt16))", 4)]
    #[case("Tuple(String, Nullable(Int8))", 3)]
    #[case("Nullable(Decimal(5,1))", 2)]
    fn default_rows_round_trip(#[case] name: &str, #[case] rows: usize) {
        let mut column = create_column_for_name(name).unwrap();
        for _ in 0..rows {
            column.append_default();
        }
        let mut wire = Vec::new();
        column.save(&mut wire).unwrap();

        let mut loaded = create_column_for_name(name).unwrap();
        let mut input = wire.as_slice();
        loaded.load(&mut input, rows).unwrap();
        assert!(input.is_empty());
        assert_eq!(loaded.len(), rows);

        let mut again = Vec::new();
        loaded.save(&mut again).unwrap();
        assert_eq!(again, wire);
    }

    #[test]
    fn void_has_no_column() {
        assert!(matches!(
            create_column_for_name("Void"),
            Err(ChError::NotImplemented(..))
        ));
        assert!(create_column_for_name("Array(Nothing)").is_err());
        assert!(create_column_for_name("Array(").is_err());
    }
}
