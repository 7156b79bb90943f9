//! Tests for the FileSystem trait used by path-typed values.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use optparser::application::ValueCaster;
use optparser::domain::{ArgType, CastError};
use optparser::infrastructure::traits::{FileSystem, RealFileSystem};
use tempfile::TempDir;

#[test]
fn given_temp_dir_when_probing_then_readable_and_writable() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let fs = RealFileSystem;

    // Act / Assert
    assert!(fs.exists(temp.path()));
    assert!(fs.is_dir(temp.path()));
    assert!(fs.is_readable(temp.path()));
    assert!(fs.is_writable_dir(temp.path()));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0, "probe file must be removed");
}

#[test]
fn given_file_when_probing_then_not_a_writable_dir() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("data.txt");
    fs::write(&file, "x").unwrap();
    let fs = RealFileSystem;

    assert!(fs.is_readable(&file));
    assert!(!fs.is_dir(&file));
    assert!(!fs.is_writable_dir(&file));
}

/// Filesystem where every directory is read-only.
struct ReadOnlyFileSystem;

impl FileSystem for ReadOnlyFileSystem {
    fn exists(&self, path: &Path) -> bool {
        RealFileSystem.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        RealFileSystem.is_dir(path)
    }

    fn is_readable(&self, path: &Path) -> bool {
        RealFileSystem.is_readable(path)
    }

    fn is_writable_dir(&self, _path: &Path) -> bool {
        false
    }

    fn canonicalize(&self, path: &Path) -> std::io::Result<std::path::PathBuf> {
        RealFileSystem.canonicalize(path)
    }
}

#[test]
fn given_read_only_filesystem_when_cast_as_outfile_then_invalid() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let caster = ValueCaster::new(Arc::new(ReadOnlyFileSystem));
    let target = temp.path().join("out.txt");

    // Act
    let err = caster.cast(ArgType::Outfile, target.to_str().unwrap()).unwrap_err();

    // Assert
    assert_eq!(
        err,
        CastError::Invalid {
            arg_type: ArgType::Outfile,
            reason: "file directory is not writable".into()
        }
    );
}

#[test]
fn given_read_only_filesystem_when_cast_as_dir_then_still_accepted() {
    let temp = TempDir::new().unwrap();
    let caster = ValueCaster::new(Arc::new(ReadOnlyFileSystem));

    let value = caster.cast(ArgType::Dir, temp.path().to_str().unwrap()).unwrap();

    assert_eq!(
        value.as_str(),
        Some(fs::canonicalize(temp.path()).unwrap().to_string_lossy().as_ref())
    );
}
