use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{Header, PlyError};

/// Loader façade that owns the results of the most recent [`open`] call.
///
/// ```no_run
/// use stanford_ply::StanfordImporter;
///
/// let mut importer = StanfordImporter::new();
/// if importer.open("mesh.ply") {
///     let vertices = importer.vertices().unwrap();
///     let indices = importer.indices().unwrap();
///     assert_eq!(indices.len() % 3, 0);
///     let _ = vertices;
/// }
/// ```
///
/// [`open`]: StanfordImporter::open
#[derive(Debug, Default)]
pub struct StanfordImporter {
    header: Option<Header>,
    vertices: Option<Vec<f32>>,
    indices: Option<Vec<i32>>,
}

impl StanfordImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a file and load its contents.
    ///
    /// Any previously loaded data is discarded first. On failure a one-line
    /// diagnostic is printed to stderr and `false` is returned, leaving the
    /// importer empty.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.close();
        match self.load(path.as_ref()) {
            Ok(()) => true,
            Err(err) => {
                eprintln!("StanfordImporter: {err}");
                self.close();
                false
            }
        }
    }

    fn load(&mut self, path: &Path) -> Result<(), PlyError> {
        let reader = BufReader::new(File::open(path)?);
        let (header, vertices, indices) = crate::from_reader(reader)?;

        self.header = Some(header);
        self.vertices = Some(vertices);
        self.indices = Some(indices);
        Ok(())
    }

    /// Release the loaded data.
    pub fn close(&mut self) {
        self.header = None;
        self.vertices = None;
        self.indices = None;
    }

    /// Header of the currently opened file, if any.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Interleaved XYZ coordinates, three per vertex.
    pub fn vertices(&self) -> Option<&[f32]> {
        self.vertices.as_deref()
    }

    /// Triangle indices, three per face.
    pub fn indices(&self) -> Option<&[i32]> {
        self.indices.as_deref()
    }
}
