use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::DomainError;
use crate::domain::export::ExportRequest;
use crate::domain::ports::ExportSink;

use super::render_table;

/// Writes each export to `<dir>/<title>.<ext>`, replacing any earlier file of
/// the same name.
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, request: &ExportRequest) -> PathBuf {
        self.dir
            .join(format!("{}.{}", file_stem(&request.title), request.format.extension()))
    }
}

/// Keeps letters, digits, `-` and `_`; everything else becomes `_`.
pub fn file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl ExportSink for FileExportSink {
    fn export(&self, request: &ExportRequest) -> Result<(), DomainError> {
        let bytes = render_table(request)?;
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(request);
        fs::write(&path, &bytes)?;
        log::info!(
            "exported {} rows to {} ({} bytes)",
            request.rows.len(),
            path.display(),
            bytes.len()
        );
        Ok(())
    }
}
