//! Textual PLY header parsing.
//!
//! The header is a sequence of LF-terminated lines describing the binary
//! body that follows it. Parsing resolves each element's record stride and
//! the byte offset of every property of interest, so the body decoder can
//! work on fixed-size records without any further negotiation.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::PlyError;

/// PLY file format, as declared by the header's `format` line.
///
/// Only the two binary variants can be decoded; `ascii` is recognised so
/// header parsing succeeds, but body decoding refuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Ascii => write!(f, "ascii"),
            Format::BinaryLittleEndian => write!(f, "binary_little_endian"),
            Format::BinaryBigEndian => write!(f, "binary_big_endian"),
        }
    }
}

/// PLY scalar property types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl ScalarType {
    /// Resolve a type token from a `property` line.
    ///
    /// Both the classic spellings (`uchar`, `float`, ...) and the sized
    /// spellings (`uint8`, `float32`, ...) are accepted, except that the
    /// 64-bit float is only ever spelled `double`.
    pub fn parse(s: &str) -> Result<Self, PlyError> {
        match s {
            "uchar" | "uint8" => Ok(ScalarType::U8),
            "char" | "int8" => Ok(ScalarType::I8),
            "ushort" | "uint16" => Ok(ScalarType::U16),
            "short" | "int16" => Ok(ScalarType::I16),
            "uint" | "uint32" => Ok(ScalarType::U32),
            "int" | "int32" => Ok(ScalarType::I32),
            "float" | "float32" => Ok(ScalarType::F32),
            "double" => Ok(ScalarType::F64),
            _ => Err(PlyError::UnknownScalarType(s.to_string())),
        }
    }

    /// Width of the encoded scalar in bytes.
    pub fn size_bytes(&self) -> usize {
        match self {
            ScalarType::U8 | ScalarType::I8 => 1,
            ScalarType::U16 | ScalarType::I16 => 2,
            ScalarType::U32 | ScalarType::I32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }
}

impl FromStr for ScalarType {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A fixed-width scalar property and its byte offset within the element
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub scalar_type: ScalarType,
    pub offset: usize,
}

impl Property {
    pub fn new(scalar_type: ScalarType, offset: usize) -> Self {
        Property {
            scalar_type,
            offset,
        }
    }
}

/// Record layout of the `vertex` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexElementHeader {
    pub count: usize,
    /// Total record length in bytes. Every property line contributes its
    /// width, recognised or not.
    pub stride: usize,
    pub x: Option<Property>,
    pub y: Option<Property>,
    pub z: Option<Property>,
}

/// Record layout of the `face` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceElementHeader {
    pub count: usize,
    /// Fixed portion of the record: all scalar properties plus the list
    /// count prefix. The variable index payload is not included, so a whole
    /// record occupies `stride + count * index_width` bytes.
    pub stride: usize,
    /// Count prefix of the `vertex_indices` list.
    pub index_list_size: Option<Property>,
    /// First index of the `vertex_indices` list; sits directly after the
    /// count prefix.
    pub index_list: Option<Property>,
}

/// Parsed PLY header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub format: Format,
    pub vertex: Option<VertexElementHeader>,
    pub face: Option<FaceElementHeader>,
    /// Exact byte offset of the first body byte from the start of the file,
    /// i.e. the byte length of all header lines including the terminating
    /// `end_header` and its newline.
    pub size: usize,
}

/// Line-oriented reader over the textual header.
///
/// Counts exactly the bytes consumed from the underlying stream and supports
/// one line of look-back, which the element sub-parsers need in order to
/// re-read the `element` line that dispatched them. A rewound line was
/// already counted; replaying it does not count twice.
pub struct LineReader<R> {
    reader: R,
    pending: Option<String>,
    bytes_read: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        LineReader {
            reader,
            pending: None,
            bytes_read: 0,
        }
    }

    /// Next header line without its terminating newline, or `None` once the
    /// stream is exhausted.
    pub fn next_line(&mut self) -> Result<Option<String>, PlyError> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        self.bytes_read += n;

        if line.ends_with('\n') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Push the most recently read line back so the next call to
    /// [`LineReader::next_line`] returns it again.
    pub fn rewind(&mut self, line: String) {
        self.pending = Some(line);
    }

    /// Bytes consumed from the underlying stream so far, line terminators
    /// included.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }
}

impl Header {
    /// Parse a PLY header from a buffered reader.
    ///
    /// Reads up to and including the `end_header` line and records the
    /// byte-exact body offset in [`Header::size`]. The reader will have
    /// buffered past that offset; seek back to it before decoding the body.
    pub fn parse<R: BufRead>(reader: &mut R) -> Result<Self, PlyError> {
        let mut lines = LineReader::new(reader);

        let Some(signature) = lines.next_line()? else {
            return Err(PlyError::Truncated);
        };
        if signature != "ply" {
            return Err(PlyError::SignatureMismatch(signature));
        }

        let mut format = None;
        let mut vertex = None;
        let mut face = None;

        loop {
            let Some(line) = lines.next_line()? else {
                return Err(PlyError::Truncated);
            };
            let tokens: Vec<&str> = line.split_whitespace().collect();

            if tokens.is_empty() || tokens[0] == "comment" {
                continue;
            }

            match tokens[0] {
                "format" => {
                    if format.is_some() {
                        return Err(PlyError::DuplicateFormat(line));
                    }
                    if tokens.len() != 3 {
                        return Err(PlyError::MalformedHeaderLine {
                            kind: "format line",
                            line,
                        });
                    }
                    if tokens[2] != "1.0" {
                        return Err(PlyError::UnsupportedVersion(tokens[2].to_string()));
                    }
                    format = Some(match tokens[1] {
                        "ascii" => Format::Ascii,
                        "binary_little_endian" => Format::BinaryLittleEndian,
                        "binary_big_endian" => Format::BinaryBigEndian,
                        other => return Err(PlyError::UnsupportedFormat(other.to_string())),
                    });
                }
                "element" => {
                    if tokens.len() != 3 {
                        return Err(PlyError::MalformedHeaderLine {
                            kind: "element line",
                            line,
                        });
                    }
                    match tokens[1] {
                        "vertex" => {
                            lines.rewind(line);
                            vertex = Some(VertexElementHeader::parse(&mut lines)?);
                        }
                        "face" => {
                            lines.rewind(line);
                            face = Some(FaceElementHeader::parse(&mut lines)?);
                        }
                        other => log::warn!("ignoring unknown element {other}"),
                    }
                }
                "end_header" => break,
                _ => log::warn!("ignoring unknown line: {line}"),
            }
        }

        let Some(format) = format else {
            return Err(PlyError::MissingFormat);
        };

        Ok(Header {
            format,
            vertex,
            face,
            size: lines.bytes_read(),
        })
    }
}

impl VertexElementHeader {
    /// Parse a vertex element block, starting at its `element vertex <n>`
    /// line.
    ///
    /// Property lines named `x`, `y` or `z` are recorded with the offset
    /// accumulated so far; other properties are ignored but still advance
    /// the offset. The first non-property line is rewound for the caller
    /// and the final offset becomes the stride. Whether all three
    /// coordinates were declared is not checked here; decoding reports the
    /// gap.
    pub fn parse<R: BufRead>(lines: &mut LineReader<R>) -> Result<Self, PlyError> {
        let Some(line) = lines.next_line()? else {
            return Err(PlyError::Truncated);
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 3 || tokens[0] != "element" || tokens[1] != "vertex" {
            return Err(PlyError::MalformedHeaderLine {
                kind: "vertex element header",
                line,
            });
        }
        let count = tokens[2]
            .parse::<usize>()
            .map_err(|_| PlyError::MalformedHeaderLine {
                kind: "vertex element header",
                line: line.clone(),
            })?;

        let mut offset = 0;
        let mut x = None;
        let mut y = None;
        let mut z = None;

        loop {
            let Some(line) = lines.next_line()? else {
                return Err(PlyError::Truncated);
            };
            match line.split_whitespace().next() {
                None | Some("comment") => continue,
                Some("property") => {}
                Some(_) => {
                    lines.rewind(line);
                    break;
                }
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 3 {
                return Err(PlyError::MalformedHeaderLine {
                    kind: "vertex property line",
                    line,
                });
            }

            let scalar_type = ScalarType::parse(tokens[1])?;
            match tokens[2] {
                "x" => {
                    if x.is_some() {
                        return Err(PlyError::DuplicateCoordinate { axis: 'x', line });
                    }
                    x = Some(Property::new(scalar_type, offset));
                }
                "y" => {
                    if y.is_some() {
                        return Err(PlyError::DuplicateCoordinate { axis: 'y', line });
                    }
                    y = Some(Property::new(scalar_type, offset));
                }
                "z" => {
                    if z.is_some() {
                        return Err(PlyError::DuplicateCoordinate { axis: 'z', line });
                    }
                    z = Some(Property::new(scalar_type, offset));
                }
                _ => log::warn!("ignoring unsupported vertex property: {line}"),
            }

            offset += scalar_type.size_bytes();
        }

        Ok(VertexElementHeader {
            count,
            stride: offset,
            x,
            y,
            z,
        })
    }
}

impl FaceElementHeader {
    /// Parse a face element block, starting at its `element face <n>` line.
    ///
    /// The `vertex_indices` list records two properties: the count prefix
    /// at the offset accumulated so far, and the first index directly after
    /// it. The variable index payload is never added to the offset, so any
    /// scalar properties declared after the list contribute only their own
    /// widths to the stride.
    ///
    /// An unknown list property does not advance the offset either — its
    /// payload cannot be sized — so a property declared after one lands at
    /// a wrong offset. Files in the wild declare `vertex_indices` as their
    /// only list.
    pub fn parse<R: BufRead>(lines: &mut LineReader<R>) -> Result<Self, PlyError> {
        let Some(line) = lines.next_line()? else {
            return Err(PlyError::Truncated);
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 3 || tokens[0] != "element" || tokens[1] != "face" {
            return Err(PlyError::MalformedHeaderLine {
                kind: "face element header",
                line,
            });
        }
        let count = tokens[2]
            .parse::<usize>()
            .map_err(|_| PlyError::MalformedHeaderLine {
                kind: "face element header",
                line: line.clone(),
            })?;

        let mut offset = 0;
        let mut index_list_size = None;
        let mut index_list = None;

        loop {
            let Some(line) = lines.next_line()? else {
                return Err(PlyError::Truncated);
            };
            match line.split_whitespace().next() {
                None | Some("comment") => continue,
                Some("property") => {}
                Some(_) => {
                    lines.rewind(line);
                    break;
                }
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() == 5 && tokens[1] == "list" {
                if tokens[4] == "vertex_indices" {
                    let size_type = ScalarType::parse(tokens[2])?;
                    index_list_size = Some(Property::new(size_type, offset));
                    offset += size_type.size_bytes();
                    index_list = Some(Property::new(ScalarType::parse(tokens[3])?, offset));
                    // From here on the offset varies from face to face.
                } else {
                    log::warn!("ignoring unknown face list property {}", tokens[4]);
                }
            } else if tokens.len() == 3 {
                log::warn!("ignoring unknown face property {}", tokens[2]);
                offset += ScalarType::parse(tokens[1])?.size_bytes();
            } else {
                return Err(PlyError::MalformedHeaderLine {
                    kind: "face property line",
                    line,
                });
            }
        }

        Ok(FaceElementHeader {
            count,
            stride: offset,
            index_list_size,
            index_list,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn scalar_type_aliases() {
        assert_eq!(ScalarType::parse("uchar").unwrap(), ScalarType::U8);
        assert_eq!(ScalarType::parse("uint8").unwrap(), ScalarType::U8);
        assert_eq!(ScalarType::parse("char").unwrap(), ScalarType::I8);
        assert_eq!(ScalarType::parse("int16").unwrap(), ScalarType::I16);
        assert_eq!(ScalarType::parse("ushort").unwrap(), ScalarType::U16);
        assert_eq!(ScalarType::parse("uint").unwrap(), ScalarType::U32);
        assert_eq!(ScalarType::parse("int32").unwrap(), ScalarType::I32);
        assert_eq!(ScalarType::parse("float32").unwrap(), ScalarType::F32);
        assert_eq!(ScalarType::parse("double").unwrap(), ScalarType::F64);

        assert!(ScalarType::parse("float64").is_err());
        assert!(ScalarType::parse("long").is_err());
        assert!("quadruple".parse::<ScalarType>().is_err());
    }

    #[test]
    fn scalar_type_widths() {
        assert_eq!(ScalarType::U8.size_bytes(), 1);
        assert_eq!(ScalarType::I8.size_bytes(), 1);
        assert_eq!(ScalarType::U16.size_bytes(), 2);
        assert_eq!(ScalarType::I16.size_bytes(), 2);
        assert_eq!(ScalarType::U32.size_bytes(), 4);
        assert_eq!(ScalarType::I32.size_bytes(), 4);
        assert_eq!(ScalarType::F32.size_bytes(), 4);
        assert_eq!(ScalarType::F64.size_bytes(), 8);
    }

    #[test]
    fn line_reader_counts_bytes() {
        let mut lines = LineReader::new(Cursor::new("ply\nend_header\n"));
        assert_eq!(lines.next_line().unwrap().unwrap(), "ply");
        assert_eq!(lines.bytes_read(), 4);
        assert_eq!(lines.next_line().unwrap().unwrap(), "end_header");
        assert_eq!(lines.bytes_read(), 15);
        assert!(lines.next_line().unwrap().is_none());
        assert_eq!(lines.bytes_read(), 15);
    }

    #[test]
    fn line_reader_replays_rewound_line() {
        let mut lines = LineReader::new(Cursor::new("first\nsecond\n"));
        let first = lines.next_line().unwrap().unwrap();
        let counted = lines.bytes_read();

        lines.rewind(first);
        assert_eq!(lines.bytes_read(), counted);
        assert_eq!(lines.next_line().unwrap().unwrap(), "first");
        assert_eq!(lines.bytes_read(), counted);
        assert_eq!(lines.next_line().unwrap().unwrap(), "second");
    }

    #[test]
    fn line_without_terminator() {
        let mut lines = LineReader::new(Cursor::new("end_header"));
        assert_eq!(lines.next_line().unwrap().unwrap(), "end_header");
        assert_eq!(lines.bytes_read(), 10);
    }

    #[test]
    fn format_display_matches_header_spelling() {
        assert_eq!(Format::Ascii.to_string(), "ascii");
        assert_eq!(
            Format::BinaryLittleEndian.to_string(),
            "binary_little_endian"
        );
        assert_eq!(Format::BinaryBigEndian.to_string(), "binary_big_endian");
    }
}
