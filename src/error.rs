use thiserror::Error;

/// Errors that can occur while loading a PLY file.
///
/// Every variant aborts the parse that produced it; no partial result is
/// returned. Unknown elements, unknown property names and unknown list
/// names are not errors — they are logged and skipped.
#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wrong file signature {0}")]
    SignatureMismatch(String),

    #[error("the file is too short")]
    Truncated,

    #[error("unsupported file version {0}")]
    UnsupportedVersion(String),

    #[error("unsupported file format {0}")]
    UnsupportedFormat(String),

    #[error("duplicit format line: {0}")]
    DuplicateFormat(String),

    #[error("format line missing")]
    MissingFormat,

    #[error("wrong {kind}: {line}")]
    MalformedHeaderLine { kind: &'static str, line: String },

    #[error("unknown property type {0}")]
    UnknownScalarType(String),

    #[error("duplicit vertex {axis} property line: {line}")]
    DuplicateCoordinate { axis: char, line: String },

    #[error("unsupported count of vertices per face: {0}")]
    UnsupportedFaceArity(i64),

    #[error("cannot decode body of an ascii file")]
    AsciiBodyUnsupported,

    #[error("missing {0} property")]
    MissingProperty(&'static str),

    #[error("missing required element: {0}")]
    MissingElement(String),
}
