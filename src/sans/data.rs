//! Base types and field values.

use alloc::{string::String, vec::Vec};

use zerocopy::TryFromBytes;

/// A base type, as declared for each field of a definition record.
///
/// The discriminant is the identifier written on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromBytes)]
pub enum BaseType {
    /// `enum`
    Enum = 0x00,
    /// `sint8`
    Sint8 = 0x01,
    /// `uint8`
    Uint8 = 0x02,
    /// `sint16`
    Sint16 = 0x83,
    /// `uint16`
    Uint16 = 0x84,
    /// `sint32`
    Sint32 = 0x85,
    /// `uint32`
    Uint32 = 0x86,
    /// `string`, null-terminated UTF-8.
    String = 0x07,
    /// `float32`
    Float32 = 0x88,
    /// `float64`
    Float64 = 0x89,
    /// `uint8z`
    Uint8z = 0x0A,
    /// `uint16z`
    Uint16z = 0x8B,
    /// `uint32z`
    Uint32z = 0x8C,
    /// `byte`
    Byte = 0x0D,
    /// `sint64`
    Sint64 = 0x8E,
    /// `uint64`
    Uint64 = 0x8F,
    /// `uint64z`
    Uint64z = 0x90,
}

impl BaseType {
    /// The identifier written to definition records.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look up a base type by its identifier.
    pub fn from_id(id: u8) -> Option<Self> {
        let base_type: Result<Self, _> = zerocopy::try_transmute!(id);
        base_type.ok()
    }

    /// Size in bytes of a single element of this base type.
    pub fn size(self) -> u8 {
        match self {
            Self::Enum | Self::Sint8 | Self::Uint8 | Self::Uint8z | Self::Byte | Self::String => 1,
            Self::Sint16 | Self::Uint16 | Self::Uint16z => 2,
            Self::Sint32 | Self::Uint32 | Self::Uint32z | Self::Float32 => 4,
            Self::Float64 | Self::Sint64 | Self::Uint64 | Self::Uint64z => 8,
        }
    }
}

/// A field value.
///
/// Values are stored as the Rust primitive corresponding to their base type.
/// Arrays of single bytes (as used by `byte`, `uint8` and `enum` arrays) are
/// held in [`Value::Bytes`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// The 'invalid' marker value of a base type, written for unset fields.
    pub fn invalid(base_type: BaseType) -> Self {
        match base_type {
            BaseType::Enum | BaseType::Uint8 | BaseType::Byte => Self::U8(u8::MAX),
            BaseType::Uint8z => Self::U8(u8::MIN),
            BaseType::Sint8 => Self::I8(i8::MAX),
            BaseType::Uint16 => Self::U16(u16::MAX),
            BaseType::Uint16z => Self::U16(u16::MIN),
            BaseType::Sint16 => Self::I16(i16::MAX),
            BaseType::Uint32 => Self::U32(u32::MAX),
            BaseType::Uint32z => Self::U32(u32::MIN),
            BaseType::Sint32 => Self::I32(i32::MAX),
            BaseType::Uint64 => Self::U64(u64::MAX),
            BaseType::Uint64z => Self::U64(u64::MIN),
            BaseType::Sint64 => Self::I64(i64::MAX),
            BaseType::Float32 => Self::F32(f32::from_bits(u32::MAX)),
            BaseType::Float64 => Self::F64(f64::from_bits(u64::MAX)),
            BaseType::String => Self::String(String::new()),
        }
    }

    /// Whether this value can be stored in a field of a base type.
    pub fn matches(&self, base_type: BaseType) -> bool {
        use BaseType as B;

        matches!(
            (self, base_type),
            (Self::U8(_), B::Enum | B::Uint8 | B::Uint8z | B::Byte)
                | (Self::I8(_), B::Sint8)
                | (Self::U16(_), B::Uint16 | B::Uint16z)
                | (Self::I16(_), B::Sint16)
                | (Self::U32(_), B::Uint32 | B::Uint32z)
                | (Self::I32(_), B::Sint32)
                | (Self::U64(_), B::Uint64 | B::Uint64z)
                | (Self::I64(_), B::Sint64)
                | (Self::F32(_), B::Float32)
                | (Self::F64(_), B::Float64)
                | (Self::String(_), B::String)
                | (Self::Bytes(_), B::Enum | B::Uint8 | B::Uint8z | B::Byte)
        )
    }

    /// Name of the primitive held, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::I8(_) => "i8",
            Self::U16(_) => "u16",
            Self::I16(_) => "i16",
            Self::U32(_) => "u32",
            Self::I32(_) => "i32",
            Self::U64(_) => "u64",
            Self::I64(_) => "i64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Number of bytes this value occupies on the wire.
    ///
    /// Strings include their null terminator.
    pub fn size(&self) -> usize {
        match self {
            Self::U8(_) | Self::I8(_) => 1,
            Self::U16(_) | Self::I16(_) => 2,
            Self::U32(_) | Self::I32(_) | Self::F32(_) => 4,
            Self::U64(_) | Self::I64(_) | Self::F64(_) => 8,
            Self::String(s) => s.len() + 1,
            Self::Bytes(b) => b.len(),
        }
    }

    /// Append the little-endian representation of this value.
    pub fn encode(&self, o: &mut Vec<u8>) {
        match self {
            Self::U8(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::I8(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::U16(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::I16(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::U32(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::I32(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::U64(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::I64(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::F32(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::F64(x) => o.extend_from_slice(&x.to_le_bytes()),
            Self::String(s) => {
                o.extend_from_slice(s.as_bytes());
                o.push(0);
            }
            Self::Bytes(b) => o.extend_from_slice(b),
        }
    }
}

macro_rules! value_from {
    ($variant:ident, $t:ty) => {
        impl From<$t> for Value {
            fn from(x: $t) -> Self {
                Self::$variant(x)
            }
        }
    };
}

value_from!(U8, u8);
value_from!(I8, i8);
value_from!(U16, u16);
value_from!(I16, i16);
value_from!(U32, u32);
value_from!(I32, i32);
value_from!(U64, u64);
value_from!(I64, i64);
value_from!(F32, f32);
value_from!(F64, f64);
value_from!(String, String);
value_from!(Bytes, Vec<u8>);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(b: [u8; N]) -> Self {
        Self::Bytes(b.to_vec())
    }
}
