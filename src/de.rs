//! Binary body decoder.
//!
//! The header fixes each element's record layout, so the body is consumed as
//! a run of fixed-stride vertex records followed by count-prefixed face
//! records. Scalars are extracted at the byte offsets the header resolved,
//! honouring the file's declared byte order, and converted to `f32`
//! coordinates and `i32` indices.

use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{FaceElementHeader, Format, PlyError, ScalarType, VertexElementHeader};

/// Decode the vertex element records into an interleaved XYZ coordinate
/// array, three values per vertex.
pub fn read_vertices<R: Read>(
    reader: &mut R,
    format: Format,
    header: &VertexElementHeader,
) -> Result<Vec<f32>, PlyError> {
    match format {
        Format::Ascii => Err(PlyError::AsciiBodyUnsupported),
        Format::BinaryLittleEndian => read_vertices_impl::<_, LittleEndian>(reader, header),
        Format::BinaryBigEndian => read_vertices_impl::<_, BigEndian>(reader, header),
    }
}

/// Decode the face element records into a triangle index array, three
/// indices per triangle.
///
/// Quad faces are fan-triangulated into `(v0, v1, v2)` and `(v0, v2, v3)`;
/// any other vertex count per face is an error.
pub fn read_faces<R: Read>(
    reader: &mut R,
    format: Format,
    header: &FaceElementHeader,
) -> Result<Vec<i32>, PlyError> {
    match format {
        Format::Ascii => Err(PlyError::AsciiBodyUnsupported),
        Format::BinaryLittleEndian => read_faces_impl::<_, LittleEndian>(reader, header),
        Format::BinaryBigEndian => read_faces_impl::<_, BigEndian>(reader, header),
    }
}

fn read_vertices_impl<R: Read, E: ByteOrder>(
    reader: &mut R,
    header: &VertexElementHeader,
) -> Result<Vec<f32>, PlyError> {
    let x = header.x.ok_or(PlyError::MissingProperty("vertex x"))?;
    let y = header.y.ok_or(PlyError::MissingProperty("vertex y"))?;
    let z = header.z.ok_or(PlyError::MissingProperty("vertex z"))?;

    let mut coordinates = Vec::with_capacity(header.count * 3);
    let mut record = vec![0u8; header.stride];
    for _ in 0..header.count {
        read_exact(reader, &mut record)?;
        coordinates.push(extract_f32::<E>(&record, x.scalar_type, x.offset)?);
        coordinates.push(extract_f32::<E>(&record, y.scalar_type, y.offset)?);
        coordinates.push(extract_f32::<E>(&record, z.scalar_type, z.offset)?);
    }
    Ok(coordinates)
}

fn read_faces_impl<R: Read, E: ByteOrder>(
    reader: &mut R,
    header: &FaceElementHeader,
) -> Result<Vec<i32>, PlyError> {
    let size_prop = header
        .index_list_size
        .ok_or(PlyError::MissingProperty("vertex_indices list size"))?;
    let index_prop = header
        .index_list
        .ok_or(PlyError::MissingProperty("vertex_indices list"))?;

    let index_width = index_prop.scalar_type.size_bytes();
    // Scalar properties declared after the list payload.
    let trailing = header.stride.saturating_sub(index_prop.offset);

    let mut count_buf = vec![0u8; size_prop.scalar_type.size_bytes()];
    let mut indices = Vec::new();

    for _ in 0..header.count {
        // Scalar properties declared before the list.
        skip(reader, size_prop.offset)?;

        read_exact(reader, &mut count_buf)?;
        let vertex_count = extract_i32::<E>(&count_buf, size_prop.scalar_type, 0)?;
        if vertex_count != 3 && vertex_count != 4 {
            return Err(PlyError::UnsupportedFaceArity(i64::from(vertex_count)));
        }

        let mut list = vec![0u8; vertex_count as usize * index_width];
        read_exact(reader, &mut list)?;

        let first = extract_i32::<E>(&list, index_prop.scalar_type, 0)?;
        let second = extract_i32::<E>(&list, index_prop.scalar_type, index_width)?;
        let third = extract_i32::<E>(&list, index_prop.scalar_type, 2 * index_width)?;
        if vertex_count == 3 {
            indices.extend_from_slice(&[first, second, third]);
        } else {
            let fourth = extract_i32::<E>(&list, index_prop.scalar_type, 3 * index_width)?;
            indices.extend_from_slice(&[first, second, third, first, third, fourth]);
        }

        skip(reader, trailing)?;
    }
    Ok(indices)
}

/// Extract the scalar at `offset` and widen or narrow it to `f32`.
///
/// `u32` values are read as unsigned before the cast; `f64` narrows with the
/// default round-to-nearest.
pub(crate) fn extract_f32<E: ByteOrder>(
    record: &[u8],
    scalar_type: ScalarType,
    offset: usize,
) -> Result<f32, PlyError> {
    let bytes = record
        .get(offset..offset + scalar_type.size_bytes())
        .ok_or(PlyError::Truncated)?;
    Ok(match scalar_type {
        ScalarType::U8 => f32::from(bytes[0]),
        ScalarType::I8 => f32::from(bytes[0] as i8),
        ScalarType::U16 => f32::from(E::read_u16(bytes)),
        ScalarType::I16 => f32::from(E::read_i16(bytes)),
        ScalarType::U32 => E::read_u32(bytes) as f32,
        ScalarType::I32 => E::read_i32(bytes) as f32,
        ScalarType::F32 => E::read_f32(bytes),
        ScalarType::F64 => E::read_f64(bytes) as f32,
    })
}

/// Extract the scalar at `offset` and narrow it to `i32`.
///
/// `u32` values keep their bit pattern in the signed slot; float values
/// truncate toward zero.
pub(crate) fn extract_i32<E: ByteOrder>(
    record: &[u8],
    scalar_type: ScalarType,
    offset: usize,
) -> Result<i32, PlyError> {
    let bytes = record
        .get(offset..offset + scalar_type.size_bytes())
        .ok_or(PlyError::Truncated)?;
    Ok(match scalar_type {
        ScalarType::U8 => i32::from(bytes[0]),
        ScalarType::I8 => i32::from(bytes[0] as i8),
        ScalarType::U16 => i32::from(E::read_u16(bytes)),
        ScalarType::I16 => i32::from(E::read_i16(bytes)),
        ScalarType::U32 => E::read_u32(bytes) as i32,
        ScalarType::I32 => E::read_i32(bytes),
        ScalarType::F32 => E::read_f32(bytes) as i32,
        ScalarType::F64 => E::read_f64(bytes) as i32,
    })
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), PlyError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => PlyError::Truncated,
        _ => PlyError::Io(e),
    })
}

fn skip<R: Read>(reader: &mut R, count: usize) -> Result<(), PlyError> {
    let mut scratch = [0u8; 32];
    let mut remaining = count;
    while remaining > 0 {
        let take = remaining.min(scratch.len());
        read_exact(reader, &mut scratch[..take])?;
        remaining -= take;
    }
    Ok(())
}
