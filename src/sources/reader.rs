//! Byte-level file readers.

use std::io;
use std::path::Path;

/// Trait for reading a file's entire contents into memory.
///
/// The reload step calls this once per attempt. Implement it to read from
/// somewhere other than the local filesystem, or to script reads in tests.
pub trait FileReader: Send + Sync {
    /// Read the whole file, or fail.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads files from the local filesystem with [`std::fs::read`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

impl<F> FileReader for F
where
    F: Fn(&Path) -> io::Result<Vec<u8>> + Send + Sync,
{
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fs_reader_reads_whole_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");
        fs::write(&path, b"\x00\x01payload").unwrap();

        assert_eq!(FsReader.read(&path).unwrap(), b"\x00\x01payload");
    }

    #[test]
    fn test_fs_reader_missing_file() {
        let err = FsReader.read(Path::new("/nonexistent/data.bin")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_closure_reader() {
        let reader = |_: &Path| -> io::Result<Vec<u8>> { Ok(b"fixed".to_vec()) };
        assert_eq!(reader.read(Path::new("ignored")).unwrap(), b"fixed");
    }
}
