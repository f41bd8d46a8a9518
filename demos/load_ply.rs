//! Load a binary PLY file given on the command line and print a summary.

use stanford_ply::StanfordImporter;

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: load_ply <file.ply>");
        std::process::exit(2);
    };

    let mut importer = StanfordImporter::new();
    if !importer.open(&path) {
        std::process::exit(1);
    }

    let header = importer.header().unwrap();
    let vertices = importer.vertices().unwrap();
    let indices = importer.indices().unwrap();

    println!("format:    {}", header.format);
    println!("vertices:  {}", vertices.len() / 3);
    println!("triangles: {}", indices.len() / 3);

    if let Some(first) = vertices.chunks_exact(3).next() {
        println!("first vertex: ({}, {}, {})", first[0], first[1], first[2]);
    }
}
