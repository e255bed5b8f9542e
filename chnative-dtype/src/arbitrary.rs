use std::sync::Arc;

use arbitrary::{Arbitrary, Result, Unstructured};

use crate::{DType, DecimalDType, EnumItem, MAX_DATETIME64_PRECISION, MAX_DECIMAL_PRECISION};

const TIMEZONES: [&str; 3] = ["UTC", "Europe/Moscow", "Asia/Tokyo"];

impl<'a> Arbitrary<'a> for DType {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        random_dtype(u, 2)
    }
}

fn random_dtype(u: &mut Unstructured<'_>, depth: u8) -> Result<DType> {
    const BASE_TYPE_COUNT: i32 = 25;
    const CONTAINER_TYPE_COUNT: i32 = 3;
    let max_dtype_kind = if depth == 0 {
        BASE_TYPE_COUNT
    } else {
        CONTAINER_TYPE_COUNT + BASE_TYPE_COUNT
    };
    Ok(match u.int_in_range(1..=max_dtype_kind)? {
        // base types
        1 => DType::Int8,
        2 => DType::Int16,
        3 => DType::Int32,
        4 => DType::Int64,
        5 => DType::Int128,
        6 => DType::UInt8,
        7 => DType::UInt16,
        8 => DType::UInt32,
        9 => DType::UInt64,
        10 => DType::Float32,
        11 => DType::Float64,
        12 => DType::String,
        13 => DType::FixedString(u.int_in_range(0..=64)?),
        14 => DType::Uuid,
        15 => DType::IPv4,
        16 => DType::IPv6,
        17 => DType::Date,
        18 => DType::DateTime(random_timezone(u)?),
        19 => DType::DateTime64(
            u.int_in_range(0..=MAX_DATETIME64_PRECISION)?,
            random_timezone(u)?,
        ),
        20 => DType::try_enum8(random_enum_items(u, i8::MIN.into(), i8::MAX.into())?)
            .map_err(|_| arbitrary::Error::IncorrectFormat)?,
        21 => DType::try_enum16(random_enum_items(u, i16::MIN, i16::MAX)?)
            .map_err(|_| arbitrary::Error::IncorrectFormat)?,
        22 => DType::Decimal(u.arbitrary()?),
        23 => DType::Decimal32(random_decimal(u, crate::DECIMAL32_PRECISION)?),
        24 => DType::Decimal64(random_decimal(u, crate::DECIMAL64_PRECISION)?),
        25 => DType::Decimal128(random_decimal(u, crate::DECIMAL128_PRECISION)?),

        // container types
        26 => DType::array(Arc::new(random_dtype(u, depth - 1)?)),
        27 => DType::nullable(Arc::new(random_dtype(u, depth - 1)?)),
        28 => {
            let count = u.int_in_range(1..=3)?;
            DType::try_tuple(
                (0..count)
                    .map(|_| random_dtype(u, depth - 1).map(Arc::new))
                    .collect::<Result<Vec<_>>>()?,
            )
            .map_err(|_| arbitrary::Error::IncorrectFormat)?
        }
        _ => unreachable!("Number out of range"),
    })
}

fn random_timezone(u: &mut Unstructured<'_>) -> Result<Option<Arc<str>>> {
    Ok(if u.arbitrary()? {
        Some(Arc::from(*u.choose(&TIMEZONES)?))
    } else {
        None
    })
}

fn random_enum_items(u: &mut Unstructured<'_>, min: i16, max: i16) -> Result<Vec<EnumItem>> {
    let count = u.int_in_range(1..=4)?;
    (0..count)
        .map(|i| Ok(EnumItem::new(format!("e{i}"), u.int_in_range(min..=max)?)))
        .collect()
}

fn random_decimal(u: &mut Unstructured<'_>, precision: u8) -> Result<DecimalDType> {
    let scale = u.int_in_range(0..=precision)?;
    DecimalDType::try_new(precision, scale).map_err(|_| arbitrary::Error::IncorrectFormat)
}

impl<'a> Arbitrary<'a> for DecimalDType {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        let precision = u.int_in_range(1..=MAX_DECIMAL_PRECISION)?;
        random_decimal(u, precision)
    }
}
