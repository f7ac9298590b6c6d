//! A minimal decoder, used to verify encoded documents.
//!
//! Decoding panics on any malformed input.

#![allow(dead_code)]

use chainring::message::{BaseType, Value};

/// A definition record, as found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub local: u8,
    pub global: u16,
    /// Field number, size and base type id.
    pub fields: Vec<(u8, u8, u8)>,
    /// Field number, size and developer data index.
    pub developer_fields: Vec<(u8, u8, u8)>,
}

impl Definition {
    fn data_size(&self) -> usize {
        let native: usize = self.fields.iter().map(|f| f.1 as usize).sum();
        let developer: usize = self.developer_fields.iter().map(|f| f.1 as usize).sum();
        1 + native + developer
    }
}

/// A data record, split into fields by its definition.
#[derive(Debug, Clone)]
pub struct Data {
    pub global: u16,
    /// Field number, base type id and raw bytes.
    pub fields: Vec<(u8, u8, Vec<u8>)>,
    /// Developer data index, field number and raw bytes.
    pub developer_fields: Vec<(u8, u8, Vec<u8>)>,
}

impl Data {
    pub fn field(&self, number: u8) -> Option<Value> {
        self.fields
            .iter()
            .find(|f| f.0 == number)
            .map(|(_, base_type, raw)| decode_value(*base_type, raw))
    }

    pub fn developer_field(&self, index: u8, number: u8) -> Option<&[u8]> {
        self.developer_fields
            .iter()
            .find(|f| f.0 == index && f.1 == number)
            .map(|f| f.2.as_slice())
    }
}

#[derive(Debug)]
pub struct Document {
    pub protocol: u8,
    pub profile_version: u16,
    pub data_size: u32,
    pub definitions: Vec<Definition>,
    pub data: Vec<Data>,
    /// Bytes occupied by definition records.
    pub definition_bytes: usize,
    /// Bytes occupied by data records.
    pub data_bytes: usize,
    pub crc: u16,
}

impl Document {
    /// Number of definition records written for a global message number.
    pub fn definitions_for(&self, global: u16) -> usize {
        self.definitions.iter().filter(|d| d.global == global).count()
    }

    /// Data records of a global message number.
    pub fn data_for(&self, global: u16) -> impl Iterator<Item = &Data> {
        self.data.iter().filter(move |d| d.global == global)
    }
}

/// The check used by the protocol (CRC-16/ARC), computed bit by bit.
pub fn crc16(bytes: &[u8]) -> u16 {
    let mut crc = 0u16;

    for b in bytes {
        crc ^= *b as u16;
        for _ in 0..8 {
            crc = if crc & 1 == 1 {
                (crc >> 1) ^ 0xA001
            } else {
                crc >> 1
            };
        }
    }

    crc
}

pub fn decode(bytes: &[u8]) -> Document {
    assert!(bytes.len() >= 16, "document too short");
    assert_eq!(bytes[0], 14, "header size");
    assert_eq!(&bytes[8..12], b".FIT");

    let header_crc = u16::from_le_bytes([bytes[12], bytes[13]]);
    assert_eq!(header_crc, crc16(&bytes[..12]), "header check");

    let data_size = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    let end = 14 + data_size as usize;
    assert_eq!(bytes.len(), end + 2, "data size");

    let crc = u16::from_le_bytes([bytes[end], bytes[end + 1]]);
    assert_eq!(crc, crc16(&bytes[..end]), "document check");

    let mut document = Document {
        protocol: bytes[1],
        profile_version: u16::from_le_bytes([bytes[2], bytes[3]]),
        data_size,
        definitions: Vec::new(),
        data: Vec::new(),
        definition_bytes: 0,
        data_bytes: 0,
        crc,
    };

    let mut active: [Option<Definition>; 16] = Default::default();
    let mut i = 14;

    while i < end {
        let header = bytes[i];
        assert_eq!(header & 0x80, 0, "compressed timestamp header");
        let local = header & 0x0F;
        let start = i;
        i += 1;

        if header & 0x40 != 0 {
            assert_eq!(bytes[i], 0, "reserved");
            assert_eq!(bytes[i + 1], 0, "architecture");
            let global = u16::from_le_bytes([bytes[i + 2], bytes[i + 3]]);
            let count = bytes[i + 4] as usize;
            i += 5;

            let fields = triples(bytes, &mut i, count);

            let developer_fields = if header & 0x20 != 0 {
                let count = bytes[i] as usize;
                i += 1;
                triples(bytes, &mut i, count)
            } else {
                Vec::new()
            };

            let definition = Definition {
                local,
                global,
                fields,
                developer_fields,
            };

            document.definitions.push(definition.clone());
            document.definition_bytes += i - start;
            active[local as usize] = Some(definition);
        } else {
            let definition = active[local as usize]
                .as_ref()
                .expect("data record without a definition");

            let fields = definition
                .fields
                .iter()
                .map(|&(number, size, base_type)| (number, base_type, take(bytes, &mut i, size)))
                .collect();
            let developer_fields = definition
                .developer_fields
                .iter()
                .map(|&(number, size, index)| (index, number, take(bytes, &mut i, size)))
                .collect();

            assert_eq!(i - start, definition.data_size());

            document.data.push(Data {
                global: definition.global,
                fields,
                developer_fields,
            });
            document.data_bytes += i - start;
        }
    }

    assert_eq!(i, end, "record overran the record section");

    document
}

fn triples(bytes: &[u8], i: &mut usize, count: usize) -> Vec<(u8, u8, u8)> {
    let triples = bytes[*i..*i + count * 3]
        .chunks(3)
        .map(|c| (c[0], c[1], c[2]))
        .collect();
    *i += count * 3;
    triples
}

fn take(bytes: &[u8], i: &mut usize, size: u8) -> Vec<u8> {
    let raw = bytes[*i..*i + size as usize].to_vec();
    *i += size as usize;
    raw
}

/// Interpret raw little-endian bytes according to a base type id.
pub fn decode_value(base_type: u8, raw: &[u8]) -> Value {
    let base_type = BaseType::from_id(base_type).expect("unknown base type");
    let size = base_type.size() as usize;

    if base_type == BaseType::String {
        let text = raw.split(|b| *b == 0).next().unwrap_or_default();
        return Value::String(String::from_utf8(text.to_vec()).unwrap());
    }

    if raw.len() != size {
        return Value::Bytes(raw.to_vec());
    }

    match base_type {
        BaseType::Enum | BaseType::Uint8 | BaseType::Uint8z | BaseType::Byte => Value::U8(raw[0]),
        BaseType::Sint8 => Value::I8(raw[0] as i8),
        BaseType::Uint16 | BaseType::Uint16z => {
            Value::U16(u16::from_le_bytes(raw.try_into().unwrap()))
        }
        BaseType::Sint16 => Value::I16(i16::from_le_bytes(raw.try_into().unwrap())),
        BaseType::Uint32 | BaseType::Uint32z => {
            Value::U32(u32::from_le_bytes(raw.try_into().unwrap()))
        }
        BaseType::Sint32 => Value::I32(i32::from_le_bytes(raw.try_into().unwrap())),
        BaseType::Uint64 | BaseType::Uint64z => {
            Value::U64(u64::from_le_bytes(raw.try_into().unwrap()))
        }
        BaseType::Sint64 => Value::I64(i64::from_le_bytes(raw.try_into().unwrap())),
        BaseType::Float32 => Value::F32(f32::from_le_bytes(raw.try_into().unwrap())),
        BaseType::Float64 => Value::F64(f64::from_le_bytes(raw.try_into().unwrap())),
        BaseType::String => unreachable!(),
    }
}

/// Render a value the way fixture tables spell it.
pub fn render(value: &Value) -> String {
    match value {
        Value::U8(x) => x.to_string(),
        Value::I8(x) => x.to_string(),
        Value::U16(x) => x.to_string(),
        Value::I16(x) => x.to_string(),
        Value::U32(x) => x.to_string(),
        Value::I32(x) => x.to_string(),
        Value::U64(x) => x.to_string(),
        Value::I64(x) => x.to_string(),
        Value::F32(x) => x.to_string(),
        Value::F64(x) => x.to_string(),
        Value::String(s) => s.clone(),
        Value::Bytes(b) => b
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(" "),
    }
}
