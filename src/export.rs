use std::path::{Path, PathBuf};

use crate::core::note::Note;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn to_markdown(note: &Note) -> String {
    let mut out = format!("# {}\n\n", note.display_title());
    out.push_str(&note.body);
    if !note.body.is_empty() && !note.body.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// File stem for a note: lowercase alphanumeric words joined by `-`.
pub fn slug(note: &Note) -> String {
    let words: Vec<String> = note
        .title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    if words.is_empty() {
        note.id.to_string()
    } else {
        words.join("-")
    }
}

/// Write the note as `<dir>/<slug>.md` and return the path.
pub fn write_markdown(note: &Note, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.md", slug(note)));
    let write_err = |source: std::io::Error| ExportError::Write {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;
    std::fs::write(&path, to_markdown(note)).map_err(write_err)?;
    log::info!("Exported note {} to {}", note.id, path.display());
    Ok(path)
}
