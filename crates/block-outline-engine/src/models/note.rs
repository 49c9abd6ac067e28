use relative_path::{RelativePath, RelativePathBuf};
use std::path::Path;

use crate::io::{self, IoError};
use crate::parsing::{Outline, ParseOptions, parse_outline};

/// A markdown note and the outline parsed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    relative_path: RelativePathBuf,
    display_name: String,
    outline: Outline,
}

impl Note {
    /// Read `relative_path` under `notes_root` and parse it
    pub fn load(
        relative_path: &RelativePath,
        notes_root: &Path,
        options: &ParseOptions,
    ) -> Result<Self, IoError> {
        let source = io::read_file(relative_path, notes_root)?;
        Ok(Self::from_source(relative_path.to_owned(), &source, options))
    }

    /// Parse in-memory content for a note at `relative_path`
    pub fn from_source(relative_path: RelativePathBuf, source: &str, options: &ParseOptions) -> Self {
        let outline = parse_outline(source, options);
        log::debug!(
            "{}: {} blocks, {} task lines",
            relative_path,
            outline.blocks.len(),
            outline.task_lines.len()
        );
        Self {
            display_name: Self::extract_display_name(&relative_path),
            relative_path,
            outline,
        }
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without the .md extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    /// Block key qualified with the note path, as stored by downstream caches
    pub fn qualified_key(&self, block_key: &str) -> String {
        format!("{}{}", self.relative_path, block_key)
    }

    fn extract_display_name(path: &RelativePath) -> String {
        path.file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string()
    }
}
