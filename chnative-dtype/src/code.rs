use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The kind of a [`DType`](crate::DType), without any of its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TypeCode {
    /// The empty type, also spelled `Nothing`.
    Void = 0,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
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
    /// String of a fixed byte width.
    FixedString,
    /// Seconds since the epoch.
    DateTime,
    /// Days since the epoch.
    Date,
    /// Variable-length array of a single item type.
    Array,
    /// A nested type that admits nulls.
    Nullable,
    /// Fixed sequence of item types.
    Tuple,
    /// Named 8-bit values.
    Enum8,
    /// Named 16-bit values.
    Enum16,
    /// 128-bit UUID.
    Uuid,
    /// IPv4 address.
    IPv4,
    /// IPv6 address.
    IPv6,
    /// Signed 128-bit integer.
    Int128,
    /// Decimal with explicit precision and scale.
    Decimal,
    /// Decimal stored in 32 bits.
    Decimal32,
    /// Decimal stored in 64 bits.
    Decimal64,
    /// Decimal stored in 128 bits.
    Decimal128,
    /// Sub-second timestamp with a decimal precision.
    DateTime64,
}

impl TypeCode {
    /// The name the type is spelled with in type names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Void => "Void",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::String => "String",
            Self::FixedString => "FixedString",
            Self::DateTime => "DateTime",
            Self::Date => "Date",
            Self::Array => "Array",
            Self::Nullable => "Nullable",
            Self::Tuple => "Tuple",
            Self::Enum8 => "Enum8",
            Self::Enum16 => "Enum16",
            Self::Uuid => "UUID",
            Self::IPv4 => "IPv4",
            Self::IPv6 => "IPv6",
            Self::Int128 => "Int128",
            Self::Decimal => "Decimal",
            Self::Decimal32 => "Decimal32",
            Self::Decimal64 => "Decimal64",
            Self::Decimal128 => "Decimal128",
            Self::DateTime64 => "DateTime64",
        }
    }

    /// Types whose values have a fixed byte width and no parameters.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Int128
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
                | Self::Float32
                | Self::Float64
        )
    }

    /// Types that wrap other types.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Array | Self::Nullable | Self::Tuple)
    }
}

impl Display for TypeCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes() {
        assert_eq!(u8::from(TypeCode::Void), 0);
        assert_eq!(TypeCode::try_from(22u8).unwrap(), TypeCode::IPv6);
        assert!(TypeCode::try_from(200u8).is_err());
    }

    #[test]
    fn classification() {
        assert!(TypeCode::Int128.is_primitive());
        assert!(!TypeCode::Date.is_primitive());
        assert!(TypeCode::Tuple.is_composite());
        assert_eq!(TypeCode::Uuid.to_string(), "UUID");
    }
}
