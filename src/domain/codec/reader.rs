//! Bounds-checked little-endian reads over a borrowed buffer.

use crate::domain::error::DecodeError;

pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

macro_rules! read_le {
    ($name:ident, $ty:ty) => {
        pub fn $name(&mut self) -> Result<$ty, DecodeError> {
            self.take::<{ std::mem::size_of::<$ty>() }>()
                .map(<$ty>::from_le_bytes)
        }
    };
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    /// Copy the next `N` bytes into a stack array.
    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let remaining = self.remaining();
        let Some(chunk) = remaining.get(..N) else {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: N,
                available: remaining.len(),
            });
        };
        let mut out = [0u8; N];
        out.copy_from_slice(chunk);
        self.offset += N;
        Ok(out)
    }

    read_le!(read_u8, u8);
    read_le!(read_i8, i8);
    read_le!(read_u16, u16);
    read_le!(read_i16, i16);
    read_le!(read_u32, u32);
    read_le!(read_i32, i32);
    read_le!(read_u64, u64);
    read_le!(read_i64, i64);
    read_le!(read_f32, f32);
    read_le!(read_f64, f64);

    /// Borrow a NUL-terminated UTF-8 string and step over its terminator.
    pub fn read_cstr(&mut self) -> Result<&'a str, DecodeError> {
        let remaining = self.remaining();
        let Some(end) = remaining.iter().position(|&b| b == 0) else {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: remaining.len() + 1,
                available: remaining.len(),
            });
        };
        let text = std::str::from_utf8(&remaining[..end])
            .map_err(|_| DecodeError::InvalidUtf8 {
                offset: self.offset,
            })?;
        self.offset += end + 1;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let mut reader = ByteReader::new(&[0x34, 0x12, 0xff, 0x01, 0, 0, 0]);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_i8().unwrap(), -1);
        assert_eq!(reader.read_i32().unwrap(), 1);
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn test_truncated_read_does_not_advance() {
        let mut reader = ByteReader::new(&[1, 2]);
        reader.read_u8().unwrap();
        assert_eq!(
            reader.read_u32(),
            Err(DecodeError::Truncated {
                offset: 1,
                needed: 4,
                available: 1
            })
        );
        assert_eq!(reader.offset(), 1);
    }

    #[test]
    fn test_cstr() {
        let mut reader = ByteReader::new(b"abc\0\0x");
        assert_eq!(reader.read_cstr().unwrap(), "abc");
        assert_eq!(reader.read_cstr().unwrap(), "");
        assert!(matches!(
            reader.read_cstr(),
            Err(DecodeError::Truncated { offset: 5, .. })
        ));
    }

    #[test]
    fn test_cstr_invalid_utf8() {
        let mut reader = ByteReader::new(&[0xff, 0xfe, 0]);
        assert_eq!(reader.read_cstr(), Err(DecodeError::InvalidUtf8 { offset: 0 }));
    }
}
