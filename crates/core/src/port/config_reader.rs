// Config File Reader Port

use std::io;
use std::path::Path;

/// Reads the per-user credential file
pub trait ConfigReader: Send + Sync {
    /// Full file contents, `Ok(None)` when the file does not exist
    fn read(&self, path: &Path) -> io::Result<Option<String>>;
}

/// Filesystem reader (production)
pub struct FsConfigReader;

impl ConfigReader for FsConfigReader {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(path).map(Some)
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// What the mock reader returns
    #[derive(Debug, Clone)]
    pub enum MockFile {
        Missing,
        Contents(String),
        Unreadable(io::ErrorKind),
    }

    /// In-memory reader that counts accesses (file-access observer)
    pub struct RecordingConfigReader {
        file: MockFile,
        reads: AtomicUsize,
    }

    impl RecordingConfigReader {
        pub fn new(file: MockFile) -> Self {
            Self {
                file,
                reads: AtomicUsize::new(0),
            }
        }

        pub fn with_contents(contents: impl Into<String>) -> Self {
            Self::new(MockFile::Contents(contents.into()))
        }

        pub fn missing() -> Self {
            Self::new(MockFile::Missing)
        }

        pub fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ConfigReader for RecordingConfigReader {
        fn read(&self, _path: &Path) -> io::Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            match &self.file {
                MockFile::Missing => Ok(None),
                MockFile::Contents(contents) => Ok(Some(contents.clone())),
                MockFile::Unreadable(kind) => Err(io::Error::new(*kind, "mock read failure")),
            }
        }
    }
}
