//! Atomic file output

use crate::error::{ConvertError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write `bytes` to `path` through a temp file and a rename
///
/// The temp file lives in the same directory (same filesystem for the
/// rename). On failure it is removed and `path` is left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);

    let result = write_file(&temp_path, bytes)
        .and_then(|_| std::fs::rename(&temp_path, path))
        .map_err(|e| ConvertError::output(path, e));

    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }

    result
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("set.json");

        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"second");
        assert!(!dir.path().join("set.json.tmp").exists());
    }

    #[test]
    fn test_missing_directory_is_output_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("set.xml");

        let err = write_atomic(&target, b"data").unwrap_err();
        assert!(matches!(err, ConvertError::Output { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_temp_path_keeps_extension() {
        assert_eq!(
            temp_path_for(Path::new("/out/My Set.xml")),
            PathBuf::from("/out/My Set.xml.tmp")
        );
    }
}
