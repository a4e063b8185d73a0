//! Element types - the storage types of array payloads in an archive.

use std::fmt;

/// On-disk element type of an array node.
///
/// Numeric payloads are little-endian. `Char` payloads are fixed-width
/// character codes (one byte each) and are read back as text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ElementType {
    /// Unsigned 8-bit integer
    Uint8 = 1,
    /// Signed 8-bit integer
    Int8 = 2,
    /// Unsigned 16-bit integer
    Uint16 = 3,
    /// Signed 16-bit integer
    Int16 = 4,
    /// Unsigned 32-bit integer
    Uint32 = 5,
    /// Signed 32-bit integer
    Int32 = 6,
    /// Unsigned 64-bit integer
    Uint64 = 7,
    /// Signed 64-bit integer
    Int64 = 8,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32 = 10,
    /// 64-bit floating point (IEEE 754 double precision)
    Float64 = 11,
    /// Fixed-width character codes
    Char = 12,
    /// Unknown/invalid type
    #[default]
    Unknown = 127,
}

impl ElementType {
    /// Returns the size in bytes of a single element of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Uint8 | Self::Int8 | Self::Char => 1,
            Self::Uint16 | Self::Int16 => 2,
            Self::Uint32 | Self::Int32 | Self::Float32 => 4,
            Self::Uint64 | Self::Int64 | Self::Float64 => 8,
            Self::Unknown => 0,
        }
    }

    /// Returns the name of this type as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8_t",
            Self::Int8 => "int8_t",
            Self::Uint16 => "uint16_t",
            Self::Int16 => "int16_t",
            Self::Uint32 => "uint32_t",
            Self::Int32 => "int32_t",
            Self::Uint64 => "uint64_t",
            Self::Int64 => "int64_t",
            Self::Float32 => "float32_t",
            Self::Float64 => "float64_t",
            Self::Char => "char",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Convert from u8 tag value.
    pub const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Uint8,
            2 => Self::Int8,
            3 => Self::Uint16,
            4 => Self::Int16,
            5 => Self::Uint32,
            6 => Self::Int32,
            7 => Self::Uint64,
            8 => Self::Int64,
            10 => Self::Float32,
            11 => Self::Float64,
            12 => Self::Char,
            _ => Self::Unknown,
        }
    }

    /// Returns true if this is an integer type.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Uint8
                | Self::Int8
                | Self::Uint16
                | Self::Int16
                | Self::Uint32
                | Self::Int32
                | Self::Uint64
                | Self::Int64
        )
    }

    /// Returns true if this is a floating point type.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(ElementType::Uint8.num_bytes(), 1);
        assert_eq!(ElementType::Int32.num_bytes(), 4);
        assert_eq!(ElementType::Float32.num_bytes(), 4);
        assert_eq!(ElementType::Float64.num_bytes(), 8);
        assert_eq!(ElementType::Char.num_bytes(), 1);
    }

    #[test]
    fn test_tag_roundtrip() {
        for tag in [1u8, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12] {
            let ty = ElementType::from_u8(tag);
            assert_ne!(ty, ElementType::Unknown);
            assert_eq!(ty as u8, tag);
        }
        assert_eq!(ElementType::from_u8(9), ElementType::Unknown);
    }
}
