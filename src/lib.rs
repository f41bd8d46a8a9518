//! Loader for binary Stanford PLY triangle meshes.
//!
//! PLY files describe their own record layout in a textual header, so the
//! header is parsed first and the resulting strides and per-property byte
//! offsets drive the binary body decoder. The loader emits two flat arrays:
//! interleaved XYZ coordinates (`f32`, three per vertex) and triangle
//! indices (`i32`, three per face, with quad faces fan-triangulated).
//!
//! Only the binary little-endian and big-endian variants of version 1.0 can
//! be decoded. An `ascii` format tag is recognised by the header parser,
//! but body decoding refuses it. Per-vertex attributes other than the XYZ
//! coordinates are skipped over.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//!
//! let mut file = b"ply\nformat binary_little_endian 1.0\n\
//! element vertex 3\n\
//! property float x\nproperty float y\nproperty float z\n\
//! element face 1\n\
//! property list uchar int vertex_indices\n\
//! end_header\n"
//!     .to_vec();
//! for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
//!     file.extend_from_slice(&v.to_le_bytes());
//! }
//! file.push(3);
//! for i in [0i32, 1, 2] {
//!     file.extend_from_slice(&i.to_le_bytes());
//! }
//!
//! let (header, vertices, indices) = stanford_ply::from_reader(Cursor::new(file)).unwrap();
//! assert_eq!(header.vertex.as_ref().unwrap().count, 3);
//! assert_eq!(vertices.len(), 9);
//! assert_eq!(indices, [0, 1, 2]);
//! ```

pub mod de;
mod error;
mod header;
mod importer;

pub use error::PlyError;
pub use header::{
    FaceElementHeader, Format, Header, LineReader, Property, ScalarType, VertexElementHeader,
};
pub use importer::StanfordImporter;

use std::io::{BufRead, Seek, SeekFrom};

/// Parse the header and decode both element bodies from one seekable source.
///
/// Header parsing buffers past `end_header`, so the source is seeked back to
/// the header's reported size before the body is decoded. A file without a
/// vertex or face element is rejected.
pub fn from_reader<R: BufRead + Seek>(
    mut reader: R,
) -> Result<(Header, Vec<f32>, Vec<i32>), PlyError> {
    let header = Header::parse(&mut reader)?;
    reader.seek(SeekFrom::Start(header.size as u64))?;

    let vertex = header
        .vertex
        .as_ref()
        .ok_or_else(|| PlyError::MissingElement("vertex".to_string()))?;
    let face = header
        .face
        .as_ref()
        .ok_or_else(|| PlyError::MissingElement("face".to_string()))?;

    let vertices = de::read_vertices(&mut reader, header.format, vertex)?;
    let indices = de::read_faces(&mut reader, header.format, face)?;

    Ok((header, vertices, indices))
}
