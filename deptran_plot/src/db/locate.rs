use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use std::path::{Path, PathBuf};

// file names containing one of these are result documents
const DOCUMENT_MARKERS: [&str; 2] = [".yml", ".yaml"];

/// Marker of the machine-readable copy written next to each document.
pub const DERIVED_MARKER: &str = ".json";

/// Finds the result document inside `dir`.
///
/// Returns `Ok(None)` if `dir` does not exist or holds no document; a missing
/// document is how a missing data point shows up, not an error. Derived
/// artifacts are skipped. If more than one document is present, the first in
/// file-name order is returned.
pub fn locate(dir: impl AsRef<Path>) -> Result<Option<PathBuf>, Report> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(None);
    }

    let read_dir = std::fs::read_dir(dir)
        .wrap_err_with(|| format!("read result directory {}", dir.display()))?;
    let mut documents = Vec::new();
    for entry in read_dir {
        let entry = entry.wrap_err("incorrect directory entry")?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_document(&name) {
            documents.push((name, path));
        }
    }

    // `read_dir` order is platform-dependent
    documents.sort();
    Ok(documents.into_iter().next().map(|(_, path)| path))
}

fn is_document(name: &str) -> bool {
    DOCUMENT_MARKERS.iter().any(|marker| name.contains(marker))
        && !name.contains(DERIVED_MARKER)
}
