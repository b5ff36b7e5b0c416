// Move Log
// Plain-text record of every move and deleted folder in a run

use chrono::Local;
use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

use crate::constants::LOG_FILE_PREFIX;
use crate::core::MoveRecord;

/// Log file opened for the length of one run. Dropping it closes the file.
#[derive(Debug)]
pub struct MoveLog {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl MoveLog {
    /// Create `merge_log_<timestamp>.txt` in `dir`, replacing a file of the same name
    pub fn create(dir: &Path) -> io::Result<Self> {
        let path = dir.join(Self::file_name());
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: LineWriter::new(file),
        })
    }

    fn file_name() -> String {
        format!("{}{}.txt", LOG_FILE_PREFIX, Local::now().format("%Y%m%d_%H%M%S"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record_move(&mut self, record: &MoveRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "Moved: {} -> {}",
            record.source.display(),
            record.destination.display()
        )
    }

    pub fn record_deleted_folder(&mut self, folder: &Path) -> io::Result<()> {
        writeln!(self.writer, "Deleted empty folder: {}", folder.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_log_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = MoveLog::create(dir.path()).unwrap();
        let path = log.path().to_path_buf();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("merge_log_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "merge_log_".len() + "YYYYmmdd_HHMMSS".len() + ".txt".len());

        log.record_move(&MoveRecord {
            source: PathBuf::from("/a/f1.txt"),
            destination: PathBuf::from("/out/f1.txt"),
        })
        .unwrap();

        // Lines are on disk before the log is closed
        assert_eq!(fs::read_to_string(&path).unwrap(), "Moved: /a/f1.txt -> /out/f1.txt\n");

        log.record_deleted_folder(Path::new("/a")).unwrap();
        drop(log);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Moved: /a/f1.txt -> /out/f1.txt\nDeleted empty folder: /a\n"
        );
    }
}
