use std::fmt::{Display, Formatter};

use chnative_error::{ChResult, ch_bail};

use crate::TypeCode;

/// Largest precision any decimal type supports.
pub const MAX_DECIMAL_PRECISION: u8 = 38;
/// Precision implied by `Decimal32(S)`.
pub const DECIMAL32_PRECISION: u8 = 9;
/// Precision implied by `Decimal64(S)`.
pub const DECIMAL64_PRECISION: u8 = 18;
/// Precision implied by `Decimal128(S)`.
pub const DECIMAL128_PRECISION: u8 = 38;

/// Parameters that define the precision and scale of a decimal type.
///
/// A value is stored as an integer `v` meaning `v / 10^scale`, with at most `precision`
/// significant digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DecimalDType {
    precision: u8,
    scale: u8,
}

impl DecimalDType {
    /// Checked constructor.
    ///
    /// The precision must be in `1..=38` and the scale must not exceed it.
    pub fn try_new(precision: u8, scale: u8) -> ChResult<Self> {
        if precision == 0 || precision > MAX_DECIMAL_PRECISION {
            ch_bail!("decimal precision {precision} outside of 1..={MAX_DECIMAL_PRECISION}");
        }
        if scale > precision {
            ch_bail!("decimal scale {scale} exceeds precision {precision}");
        }
        Ok(Self { precision, scale })
    }

    /// The number of significant digits.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// The number of digits after the decimal point.
    pub fn scale(&self) -> u8 {
        self.scale
    }

    /// The integer type values of this decimal are stored as on the wire.
    pub fn storage_code(&self) -> TypeCode {
        if self.precision <= DECIMAL32_PRECISION {
            TypeCode::Int32
        } else if self.precision <= DECIMAL64_PRECISION {
            TypeCode::Int64
        } else {
            TypeCode::Int128
        }
    }
}

impl Display for DecimalDType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.precision, self.scale)
    }
}
