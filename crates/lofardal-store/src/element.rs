//! Conversion between typed element buffers and little-endian storage bytes.

use byteorder::{ByteOrder as _, LittleEndian};
use num_complex::{Complex32, Complex64};

use crate::types::DType;

/// A dataset element type with a fixed little-endian storage encoding.
pub trait Element: Copy + Default + PartialEq + std::fmt::Debug + 'static {
    const DTYPE: DType;

    /// Encode `values` into `out`, which holds exactly `values.len() * DTYPE.size()` bytes.
    fn encode(values: &[Self], out: &mut [u8]);

    /// Decode `bytes` into `out`, which holds exactly `bytes.len() / DTYPE.size()` elements.
    fn decode(bytes: &[u8], out: &mut [Self]);
}

macro_rules! impl_element {
    ($ty:ty, $dtype:expr, $read:ident, $write:ident) => {
        impl Element for $ty {
            const DTYPE: DType = $dtype;

            fn encode(values: &[Self], out: &mut [u8]) {
                LittleEndian::$write(values, out);
            }

            fn decode(bytes: &[u8], out: &mut [Self]) {
                LittleEndian::$read(bytes, out);
            }
        }
    };
}

impl_element!(i16, DType::I16, read_i16_into, write_i16_into);
impl_element!(i32, DType::I32, read_i32_into, write_i32_into);
impl_element!(i64, DType::I64, read_i64_into, write_i64_into);
impl_element!(u16, DType::U16, read_u16_into, write_u16_into);
impl_element!(u32, DType::U32, read_u32_into, write_u32_into);
impl_element!(u64, DType::U64, read_u64_into, write_u64_into);
impl_element!(f32, DType::F32, read_f32_into, write_f32_into);
impl_element!(f64, DType::F64, read_f64_into, write_f64_into);

impl Element for u8 {
    const DTYPE: DType = DType::U8;

    fn encode(values: &[Self], out: &mut [u8]) {
        out.copy_from_slice(values);
    }

    fn decode(bytes: &[u8], out: &mut [Self]) {
        out.copy_from_slice(bytes);
    }
}

impl Element for i8 {
    const DTYPE: DType = DType::I8;

    fn encode(values: &[Self], out: &mut [u8]) {
        for (dst, &v) in out.iter_mut().zip(values) {
            *dst = v as u8;
        }
    }

    fn decode(bytes: &[u8], out: &mut [Self]) {
        for (dst, &b) in out.iter_mut().zip(bytes) {
            *dst = b as i8;
        }
    }
}

impl Element for Complex32 {
    const DTYPE: DType = DType::C32;

    fn encode(values: &[Self], out: &mut [u8]) {
        for (chunk, v) in out.chunks_exact_mut(8).zip(values) {
            LittleEndian::write_f32(&mut chunk[..4], v.re);
            LittleEndian::write_f32(&mut chunk[4..], v.im);
        }
    }

    fn decode(bytes: &[u8], out: &mut [Self]) {
        for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(8)) {
            *dst = Complex32::new(
                LittleEndian::read_f32(&chunk[..4]),
                LittleEndian::read_f32(&chunk[4..]),
            );
        }
    }
}

impl Element for Complex64 {
    const DTYPE: DType = DType::C64;

    fn encode(values: &[Self], out: &mut [u8]) {
        for (chunk, v) in out.chunks_exact_mut(16).zip(values) {
            LittleEndian::write_f64(&mut chunk[..8], v.re);
            LittleEndian::write_f64(&mut chunk[8..], v.im);
        }
    }

    fn decode(bytes: &[u8], out: &mut [Self]) {
        for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(16)) {
            *dst = Complex64::new(
                LittleEndian::read_f64(&chunk[..8]),
                LittleEndian::read_f64(&chunk[8..]),
            );
        }
    }
}

/// Encode a typed buffer into fresh little-endian bytes.
pub fn to_le_bytes<T: Element>(values: &[T]) -> Vec<u8> {
    let mut out = vec![0u8; values.len() * T::DTYPE.size()];
    T::encode(values, &mut out);
    out
}

/// Decode little-endian bytes into a typed buffer; trailing partial elements are ignored.
pub fn from_le_bytes<T: Element>(bytes: &[u8]) -> Vec<T> {
    let n = bytes.len() / T::DTYPE.size();
    let mut out = vec![T::default(); n];
    T::decode(&bytes[..n * T::DTYPE.size()], &mut out);
    out
}

/// Reverse the bytes of every scalar component in place.
pub(crate) fn swap_components(buf: &mut [u8], component_size: usize) {
    if component_size <= 1 {
        return;
    }
    for chunk in buf.chunks_exact_mut(component_size) {
        chunk.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_is_little_endian() {
        let bytes = to_le_bytes(&[1.0f32]);
        assert_eq!(bytes, 1.0f32.to_le_bytes().to_vec());
        assert_eq!(from_le_bytes::<f32>(&bytes), vec![1.0]);
    }

    #[test]
    fn complex_is_interleaved() {
        let bytes = to_le_bytes(&[Complex32::new(1.5, -2.0)]);
        assert_eq!(&bytes[..4], &1.5f32.to_le_bytes());
        assert_eq!(&bytes[4..], &(-2.0f32).to_le_bytes());
        assert_eq!(from_le_bytes::<Complex32>(&bytes), vec![Complex32::new(1.5, -2.0)]);
    }

    #[test]
    fn signed_bytes() {
        let bytes = to_le_bytes(&[-1i8, 5]);
        assert_eq!(bytes, vec![0xff, 5]);
        assert_eq!(from_le_bytes::<i8>(&bytes), vec![-1, 5]);
    }

    #[test]
    fn swap_reverses_components_only() {
        let mut buf = to_le_bytes(&[Complex32::new(1.0, 2.0)]);
        swap_components(&mut buf, 4);
        assert_eq!(&buf[..4], &1.0f32.to_be_bytes());
        assert_eq!(&buf[4..], &2.0f32.to_be_bytes());
    }
}
