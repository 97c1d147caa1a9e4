//! Where a file's bytes come from.

use std::borrow::Cow;
use std::fmt;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::{NodeError, NodeResult};

/// A file to attach to a node: a filesystem path or an open byte stream.
pub enum FileSource {
    /// An absolute path to an existing regular file.
    Path(PathBuf),
    /// A readable stream, optionally carrying a name.
    Stream {
        name: Option<String>,
        reader: Box<dyn Read + Send>,
    },
}

impl FileSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn stream(name: Option<&str>, reader: impl Read + Send + 'static) -> Self {
        Self::Stream {
            name: name.map(str::to_string),
            reader: Box::new(reader),
        }
    }

    /// An in-memory stream over `data`.
    pub fn bytes(name: Option<&str>, data: impl Into<Vec<u8>>) -> Self {
        Self::stream(name, Cursor::new(data.into()))
    }

    /// The name keys are derived from, if the source has one.
    ///
    /// For paths this is the final component. A component that is not
    /// valid UTF-8 is converted lossily.
    pub fn name(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Path(path) => path.file_name().map(|name| name.to_string_lossy()),
            Self::Stream { name, .. } => name.as_deref().map(Cow::Borrowed),
        }
    }

    /// Fail early on paths that cannot be read.
    pub fn check(&self) -> NodeResult<()> {
        if let Self::Path(path) = self {
            check_path(path)?;
        }
        Ok(())
    }

    /// Consume the source and return its full contents.
    pub fn read_all(self) -> NodeResult<Vec<u8>> {
        match self {
            Self::Path(path) => {
                check_path(&path)?;
                Ok(std::fs::read(&path)?)
            }
            Self::Stream { mut reader, .. } => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

fn check_path(path: &Path) -> NodeResult<()> {
    if !path.is_absolute() {
        return Err(NodeError::InvalidPath(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(NodeError::FileNotFound(path.to_path_buf()));
    }
    Ok(())
}

impl From<PathBuf> for FileSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for FileSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Stream { name, .. } => f
                .debug_struct("Stream")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_is_invalid() {
        let err = FileSource::path("data.txt").read_all().unwrap_err();
        assert!(matches!(err, NodeError::InvalidPath(_)));
    }

    #[test]
    fn missing_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::path(dir.path().join("missing.txt"))
            .read_all()
            .unwrap_err();
        assert!(matches!(err, NodeError::FileNotFound(_)));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::path(dir.path()).check().unwrap_err();
        assert!(matches!(err, NodeError::FileNotFound(_)));
    }

    #[test]
    fn reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, b"some text ABCDE").unwrap();
        let source = FileSource::from(path.as_path());
        assert_eq!(source.name().as_deref(), Some("data.txt"));
        assert_eq!(source.read_all().unwrap(), b"some text ABCDE");
    }

    #[test]
    fn stream_name_and_contents() {
        let source = FileSource::bytes(Some("notes.md"), "# notes");
        assert_eq!(source.name().as_deref(), Some("notes.md"));
        assert_eq!(source.read_all().unwrap(), b"# notes");

        let anonymous = FileSource::bytes(None, vec![1, 2, 3]);
        assert_eq!(anonymous.name(), None);
        assert!(anonymous.check().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_name_is_kept_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = FileSource::path(Path::new("/data").join(OsStr::from_bytes(b"r\xffport.txt")));
        assert_eq!(source.name().as_deref(), Some("r\u{fffd}port.txt"));
    }

    #[test]
    fn root_path_has_no_name() {
        assert_eq!(FileSource::path("/").name(), None);
    }

    #[test]
    fn debug_hides_reader() {
        let source = FileSource::bytes(Some("a.txt"), "x");
        assert_eq!(format!("{source:?}"), "Stream { name: Some(\"a.txt\"), .. }");
    }
}
