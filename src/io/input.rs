use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::models::Transcript;

/// Read every `.txt` file in a directory, in file-name order, into one transcript
pub fn load_transcript_dir(dir: &Path) -> Result<Transcript> {
    let sources = list_text_files(dir)?;

    let mut text = String::new();
    for path in &sources {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        debug!("Read {} bytes from {:?}", content.len(), path);
        text.push_str(&content);
        if !content.ends_with('\n') {
            text.push('\n');
        }
    }

    let mut transcript = Transcript::from_text(&text);
    transcript.sources = sources;
    info!(
        "Loaded {} lines from {} files",
        transcript.len(),
        transcript.sources.len()
    );
    Ok(transcript)
}

/// Sorted `.txt` files directly inside `dir`
pub fn list_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        bail!("Input path does not exist: {:?}", dir);
    }
    if !dir.is_dir() {
        bail!("Input path is not a directory: {:?}", dir);
    }

    let mut files = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?
    {
        let path = entry?.path();
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if path.is_file() && is_txt {
            files.push(path);
        }
    }

    if files.is_empty() {
        bail!("No .txt files found in {:?}", dir);
    }
    files.sort();
    Ok(files)
}
