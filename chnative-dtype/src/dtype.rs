use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;

use chnative_error::{ChError, ChResult, ch_bail};
use itertools::Itertools;

use crate::decimal::{DECIMAL32_PRECISION, DECIMAL64_PRECISION, DECIMAL128_PRECISION};
use crate::{
    DecimalDType, EnumDType, EnumItem, MAX_DATETIME64_PRECISION, TypeCode, TypeParser, lower,
};

/// A shared, immutable column type.
pub type TypeRef = Arc<DType>;

/// A timezone name attached to a date-time type.
pub type Timezone = Arc<str>;

/// The type of a column.
///
/// Each variant carries exactly the parameters its kind needs; nested types are shared
/// [`TypeRef`]s. Types are immutable once built.
///
/// Two types are equal when their canonical names are equal. That is weaker than a structural
/// comparison (`Decimal32(2)` and `Decimal(9,2)` print differently and so are different types)
/// but it is exactly what the server compares when it checks a block against a schema.
#[derive(Debug, Clone)]
pub enum DType {
    /// The empty type.
    Void,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Signed 128-bit integer.
    Int128,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit IEEE float.
    Float32,
    /// 64-bit IEEE float.
    Float64,
    /// Variable-length string.
    String,
    /// String of the given byte width.
    FixedString(usize),
    /// 128-bit UUID.
    Uuid,
    /// IPv4 address.
    IPv4,
    /// IPv6 address.
    IPv6,
    /// Days since the epoch.
    Date,
    /// Seconds since the epoch, with an optional timezone.
    DateTime(Option<Timezone>),
    /// Ticks of `10^-precision` seconds since the epoch, with an optional timezone.
    DateTime64(u8, Option<Timezone>),
    /// Variable-length array of the item type.
    Array(TypeRef),
    /// The nested type, admitting nulls.
    Nullable(TypeRef),
    /// Fixed sequence of item types.
    Tuple(Arc<[TypeRef]>),
    /// Named 8-bit values.
    Enum8(Arc<EnumDType>),
    /// Named 16-bit values.
    Enum16(Arc<EnumDType>),
    /// Decimal with explicit precision and scale.
    Decimal(DecimalDType),
    /// Decimal with precision 9.
    Decimal32(DecimalDType),
    /// Decimal with precision 18.
    Decimal64(DecimalDType),
    /// Decimal with precision 38.
    Decimal128(DecimalDType),
}

impl DType {
    /// An array of `item`.
    pub fn array(item: TypeRef) -> Self {
        Self::Array(item)
    }

    /// A nullable `nested`.
    pub fn nullable(nested: TypeRef) -> Self {
        Self::Nullable(nested)
    }

    /// A tuple of `items`, in order. There must be at least one.
    pub fn try_tuple(items: impl IntoIterator<Item = TypeRef>) -> ChResult<Self> {
        let items: Arc<[TypeRef]> = items.into_iter().collect();
        if items.is_empty() {
            ch_bail!("a tuple needs at least one item type");
        }
        Ok(Self::Tuple(items))
    }

    /// An `Enum8` with the given items, whose values must fit in an `i8`.
    pub fn try_enum8(items: impl IntoIterator<Item = EnumItem>) -> ChResult<Self> {
        enum_items(TypeCode::Enum8, items, i8::MIN.into()..=i8::MAX.into()).map(Self::Enum8)
    }

    /// An `Enum16` with the given items.
    pub fn try_enum16(items: impl IntoIterator<Item = EnumItem>) -> ChResult<Self> {
        enum_items(TypeCode::Enum16, items, i16::MIN..=i16::MAX).map(Self::Enum16)
    }

    /// A `Decimal(precision, scale)`.
    pub fn decimal(precision: u8, scale: u8) -> ChResult<Self> {
        Ok(Self::Decimal(DecimalDType::try_new(precision, scale)?))
    }

    /// A `Decimal32(scale)`.
    pub fn decimal32(scale: u8) -> ChResult<Self> {
        Ok(Self::Decimal32(DecimalDType::try_new(
            DECIMAL32_PRECISION,
            scale,
        )?))
    }

    /// A `Decimal64(scale)`.
    pub fn decimal64(scale: u8) -> ChResult<Self> {
        Ok(Self::Decimal64(DecimalDType::try_new(
            DECIMAL64_PRECISION,
            scale,
        )?))
    }

    /// A `Decimal128(scale)`.
    pub fn decimal128(scale: u8) -> ChResult<Self> {
        Ok(Self::Decimal128(DecimalDType::try_new(
            DECIMAL128_PRECISION,
            scale,
        )?))
    }

    /// A `DateTime64(precision)` without a timezone. The precision is at most 9.
    pub fn try_datetime64(precision: u8) -> ChResult<Self> {
        if precision > MAX_DATETIME64_PRECISION {
            ch_bail!("DateTime64 precision {precision} exceeds {MAX_DATETIME64_PRECISION}");
        }
        Ok(Self::DateTime64(precision, None))
    }

    /// A `FixedString(width)`.
    pub fn fixed_string(width: usize) -> Self {
        Self::FixedString(width)
    }

    /// The kind of this type.
    pub fn code(&self) -> TypeCode {
        match self {
            Self::Void => TypeCode::Void,
            Self::Int8 => TypeCode::Int8,
            Self::Int16 => TypeCode::Int16,
            Self::Int32 => TypeCode::Int32,
            Self::Int64 => TypeCode::Int64,
            Self::Int128 => TypeCode::Int128,
            Self::UInt8 => TypeCode::UInt8,
            Self::UInt16 => TypeCode::UInt16,
            Self::UInt32 => TypeCode::UInt32,
            Self::UInt64 => TypeCode::UInt64,
            Self::Float32 => TypeCode::Float32,
            Self::Float64 => TypeCode::Float64,
            Self::String => TypeCode::String,
            Self::FixedString(_) => TypeCode::FixedString,
            Self::Uuid => TypeCode::Uuid,
            Self::IPv4 => TypeCode::IPv4,
            Self::IPv6 => TypeCode::IPv6,
            Self::Date => TypeCode::Date,
            Self::DateTime(_) => TypeCode::DateTime,
            Self::DateTime64(..) => TypeCode::DateTime64,
            Self::Array(_) => TypeCode::Array,
            Self::Nullable(_) => TypeCode::Nullable,
            Self::Tuple(_) => TypeCode::Tuple,
            Self::Enum8(_) => TypeCode::Enum8,
            Self::Enum16(_) => TypeCode::Enum16,
            Self::Decimal(_) => TypeCode::Decimal,
            Self::Decimal32(_) => TypeCode::Decimal32,
            Self::Decimal64(_) => TypeCode::Decimal64,
            Self::Decimal128(_) => TypeCode::Decimal128,
        }
    }

    /// The item type of an `Array`.
    pub fn item_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Array(item) => Some(item),
            _ => None,
        }
    }

    /// The nested type of a `Nullable`.
    pub fn nested_type(&self) -> Option<&TypeRef> {
        match self {
            Self::Nullable(nested) => Some(nested),
            _ => None,
        }
    }

    /// The item types of a `Tuple`, or an empty slice for any other type.
    pub fn tuple_types(&self) -> &[TypeRef] {
        match self {
            Self::Tuple(items) => items,
            _ => &[],
        }
    }

    /// The mapping of an `Enum8` or `Enum16`.
    pub fn enum_dtype(&self) -> Option<&EnumDType> {
        match self {
            Self::Enum8(e) | Self::Enum16(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// The precision and scale of any decimal type.
    pub fn decimal_dtype(&self) -> Option<DecimalDType> {
        match self {
            Self::Decimal(d) | Self::Decimal32(d) | Self::Decimal64(d) | Self::Decimal128(d) => {
                Some(*d)
            }
            _ => None,
        }
    }

    /// The byte width of a `FixedString`.
    pub fn fixed_string_width(&self) -> Option<usize> {
        match self {
            Self::FixedString(width) => Some(*width),
            _ => None,
        }
    }

    /// The sub-second precision of a `DateTime64`.
    pub fn datetime64_precision(&self) -> Option<u8> {
        match self {
            Self::DateTime64(precision, _) => Some(*precision),
            _ => None,
        }
    }

    /// The timezone of a `DateTime` or `DateTime64`, if one was given.
    pub fn timezone(&self) -> Option<&str> {
        match self {
            Self::DateTime(tz) | Self::DateTime64(_, tz) => tz.as_deref(),
            _ => None,
        }
    }

    /// The canonical name of the type.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Whether `self` and `other` have the same canonical name.
    pub fn is_equal(&self, other: &DType) -> bool {
        self.name() == other.name()
    }
}

/// The value map of an enum of kind `code`, with at least one item and every value in `range`.
///
/// Names may not contain a quote, which the grammar has no way to escape.
fn enum_items(
    code: TypeCode,
    items: impl IntoIterator<Item = EnumItem>,
    range: RangeInclusive<i16>,
) -> ChResult<Arc<EnumDType>> {
    let items = items.into_iter().collect::<Vec<_>>();
    if items.is_empty() {
        ch_bail!("{code} needs at least one item");
    }
    for EnumItem { name, value } in &items {
        if !range.contains(value) {
            ch_bail!(
                "{code} value {value} for '{name}' outside of {}..={}",
                range.start(),
                range.end()
            );
        }
        if name.contains('\'') {
            ch_bail!("{code} name '{name}' contains a quote");
        }
    }
    Ok(Arc::new(EnumDType::new(items)))
}

impl Display for DType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FixedString(width) => write!(f, "FixedString({width})"),
            Self::DateTime(None) => write!(f, "DateTime"),
            Self::DateTime(Some(tz)) => write!(f, "DateTime('{tz}')"),
            Self::DateTime64(precision, None) => write!(f, "DateTime64({precision})"),
            Self::DateTime64(precision, Some(tz)) => {
                write!(f, "DateTime64({precision}, '{tz}')")
            }
            Self::Array(item) => write!(f, "Array({item})"),
            Self::Nullable(nested) => write!(f, "Nullable({nested})"),
            Self::Tuple(items) => write!(f, "Tuple({})", items.iter().format(", ")),
            Self::Enum8(items) | Self::Enum16(items) => write!(
                f,
                "{}({})",
                self.code(),
                items
                    .iter()
                    .format_with(", ", |(value, name), f| f(&format_args!("'{name}' = {value}")))
            ),
            Self::Decimal(d) => write!(f, "Decimal({d})"),
            Self::Decimal32(d) | Self::Decimal64(d) | Self::Decimal128(d) => {
                write!(f, "{}({})", self.code(), d.scale())
            }
            _ => write!(f, "{}", self.code()),
        }
    }
}

impl PartialEq for DType {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl Eq for DType {}

impl Hash for DType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state)
    }
}

impl FromStr for DType {
    type Err = ChError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lower(&TypeParser::new(s).parse()?)
    }
}
