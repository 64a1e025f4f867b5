//! File system backed save/load for command-line runs

use std::fs;
use std::path::{Path, PathBuf};

use crate::platform::ports::{FileIo, FileIoError};

/// Writes exports into a directory and reads imports from a chosen file
#[derive(Debug, Clone)]
pub struct DiskFiles {
    output_dir: PathBuf,
    import_path: Option<PathBuf>,
}

impl DiskFiles {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            import_path: None,
        }
    }

    /// Selects the file the next `import_text` call reads
    pub fn with_import(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_path = Some(path.into());
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn io_error(path: &Path, source: std::io::Error) -> FileIoError {
    FileIoError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl FileIo for DiskFiles {
    fn export_text(&mut self, filename: &str, content: &str) -> Result<(), FileIoError> {
        let path = self.output_dir.join(filename);
        fs::write(&path, content).map_err(|e| io_error(&path, e))?;
        tracing::info!(path = %path.display(), bytes = content.len(), "exported text");
        Ok(())
    }

    fn import_text(&mut self) -> Result<String, FileIoError> {
        let path = self.import_path.as_ref().ok_or(FileIoError::NothingSelected)?;
        fs::read_to_string(path).map_err(|e| io_error(path, e))
    }

    fn copy_to_clipboard(&mut self, _content: &str) -> Result<(), FileIoError> {
        Err(FileIoError::ClipboardUnavailable(
            "terminal sessions have no clipboard access".to_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_then_import_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = DiskFiles::new(dir.path()).with_import(dir.path().join("wheel-entries.txt"));

        files.export_text("wheel-entries.txt", "Alice\nBob").unwrap();
        assert_eq!(files.import_text().unwrap(), "Alice\nBob");
    }

    #[test]
    fn import_without_selection_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = DiskFiles::new(dir.path());
        assert!(matches!(files.import_text(), Err(FileIoError::NothingSelected)));
    }

    #[test]
    fn import_of_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let mut files = DiskFiles::new(dir.path()).with_import(&missing);

        match files.import_text() {
            Err(FileIoError::Io { path, .. }) => assert!(path.ends_with("missing.txt")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn clipboard_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = DiskFiles::new(dir.path());
        assert!(matches!(
            files.copy_to_clipboard("x"),
            Err(FileIoError::ClipboardUnavailable(_))
        ));
    }
}
