//! Array payload encoding.
//!
//! Payloads are the array elements in row-major order, little-endian.
//! Integer arrays are written as `int64_t`, float arrays as `float64_t`,
//! text as one `char` per byte. Narrower widths are accepted on read.

use byteorder::{ByteOrder, LittleEndian};
use ndarray::{ArrayD, IxDyn};

use crate::core::{Field, NumericArray};
use crate::util::{Dimensions, ElementType, Error, Result};

/// Encode a numeric array payload.
pub fn encode_array(array: &NumericArray) -> Vec<u8> {
    match array {
        NumericArray::Int(a) => {
            let values: Vec<i64> = a.iter().copied().collect();
            let mut buf = vec![0u8; values.len() * 8];
            LittleEndian::write_i64_into(&values, &mut buf);
            buf
        }
        NumericArray::Float(a) => {
            let values: Vec<f64> = a.iter().copied().collect();
            let mut buf = vec![0u8; values.len() * 8];
            LittleEndian::write_f64_into(&values, &mut buf);
            buf
        }
    }
}

/// Decode a payload into a field. `char` payloads become text.
pub fn decode_payload(name: &str, element_type: ElementType, dims: &Dimensions, bytes: &[u8]) -> Result<Field> {
    let count = dims.num_points();
    let expected = count
        .checked_mul(element_type.num_bytes())
        .ok_or_else(|| Error::invalid(format!("node '{}' is too large", name)))?;
    if bytes.len() != expected {
        return Err(Error::invalid(format!(
            "node '{}' holds {} bytes, expected {} for {} {}",
            name,
            bytes.len(),
            expected,
            element_type,
            dims
        )));
    }

    if element_type == ElementType::Char {
        // Fixed-width char arrays are NUL padded.
        let len = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
        return Ok(Field::Text(String::from_utf8(bytes[..len].to_vec())?));
    }

    let shape = IxDyn(dims.sizes());
    let array = if element_type.is_float() {
        let mut values = vec![0f64; count];
        if element_type == ElementType::Float32 {
            let mut narrow = vec![0f32; count];
            LittleEndian::read_f32_into(bytes, &mut narrow);
            values.iter_mut().zip(narrow).for_each(|(v, n)| *v = n as f64);
        } else {
            LittleEndian::read_f64_into(bytes, &mut values);
        }
        NumericArray::Float(to_array(name, shape, values)?)
    } else {
        NumericArray::Int(to_array(name, shape, decode_integers(name, element_type, bytes, count)?)?)
    };
    Ok(Field::Array(array))
}

fn decode_integers(name: &str, element_type: ElementType, bytes: &[u8], count: usize) -> Result<Vec<i64>> {
    let values = match element_type {
        ElementType::Uint8 => bytes.iter().map(|&b| b as i64).collect(),
        ElementType::Int8 => bytes.iter().map(|&b| b as i8 as i64).collect(),
        ElementType::Uint16 => bytes.chunks_exact(2).map(|c| LittleEndian::read_u16(c) as i64).collect(),
        ElementType::Int16 => bytes.chunks_exact(2).map(|c| LittleEndian::read_i16(c) as i64).collect(),
        ElementType::Uint32 => bytes.chunks_exact(4).map(|c| LittleEndian::read_u32(c) as i64).collect(),
        ElementType::Int32 => bytes.chunks_exact(4).map(|c| LittleEndian::read_i32(c) as i64).collect(),
        ElementType::Int64 => {
            let mut values = vec![0i64; count];
            LittleEndian::read_i64_into(bytes, &mut values);
            values
        }
        ElementType::Uint64 => bytes
            .chunks_exact(8)
            .map(|c| {
                i64::try_from(LittleEndian::read_u64(c))
                    .map_err(|_| Error::invalid(format!("node '{}' holds a uint64 beyond i64 range", name)))
            })
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(Error::TypeMismatch {
                expected: "integer element type".to_string(),
                actual: other.to_string(),
            })
        }
    };
    Ok(values)
}

fn to_array<T>(name: &str, shape: IxDyn, values: Vec<T>) -> Result<ArrayD<T>> {
    ArrayD::from_shape_vec(shape, values)
        .map_err(|e| Error::invalid(format!("node '{}': {}", name, e)))
}
