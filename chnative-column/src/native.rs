use std::fmt::Debug;

use bytes::{Buf, BufMut};
use chnative_dtype::{DType, TypeCode};

/// A fixed-width value stored little-endian on the wire.
pub trait NativeType: Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    /// The kind of type the value is stored as.
    const CODE: TypeCode;
    /// Bytes per value on the wire.
    const WIDTH: usize;

    /// The column type of plain values.
    fn dtype() -> DType;

    /// Decode a value from the front of `buf`, which must hold at least [`Self::WIDTH`] bytes.
    fn read_le<B: Buf>(buf: &mut B) -> Self;

    /// Encode the value at the end of `buf`.
    fn write_le<B: BufMut>(self, buf: &mut B);
}

macro_rules! native_type {
    ($T:ty, $variant:ident, $get:ident, $put:ident) => {
        impl NativeType for $T {
            const CODE: TypeCode = TypeCode::$variant;
            const WIDTH: usize = size_of::<$T>();

            fn dtype() -> DType {
                DType::$variant
            }

            #[inline]
            fn read_le<B: Buf>(buf: &mut B) -> Self {
                buf.$get()
            }

            #[inline]
            fn write_le<B: BufMut>(self, buf: &mut B) {
                buf.$put(self)
            }
        }
    };
}

native_type!(u8, UInt8, get_u8, put_u8);
native_type!(u16, UInt16, get_u16_le, put_u16_le);
native_type!(u32, UInt32, get_u32_le, put_u32_le);
native_type!(u64, UInt64, get_u64_le, put_u64_le);
native_type!(i8, Int8, get_i8, put_i8);
native_type!(i16, Int16, get_i16_le, put_i16_le);
native_type!(i32, Int32, get_i32_le, put_i32_le);
native_type!(i64, Int64, get_i64_le, put_i64_le);
native_type!(i128, Int128, get_i128_le, put_i128_le);
native_type!(f32, Float32, get_f32_le, put_f32_le);
native_type!(f64, Float64, get_f64_le, put_f64_le);
