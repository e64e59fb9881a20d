//! Directory-backed file store

use super::{FileStat, FileStore, StoreFile};
use crate::logger;
use async_trait::async_trait;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::SystemTime;
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

/// Serves files below a root directory on the local filesystem
///
/// Names are resolved as if they were absolute paths below the root: `.` and
/// `..` segments are collapsed lexically first, so a name can never climb above
/// the root. Symlinks that resolve outside the root are treated as missing.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a store for an existing directory
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("not a directory: {}", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn join(&self, name: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in clean_segments(name) {
            path.push(segment);
        }
        path
    }
}

#[async_trait]
impl FileStore for DirStore {
    async fn open(&self, name: &str) -> io::Result<Box<dyn StoreFile>> {
        if name.contains('\0') {
            return Err(ErrorKind::NotFound.into());
        }

        let path = self.join(name);
        let canonical = tokio::fs::canonicalize(&path)
            .await
            .map_err(map_open_error)?;
        if !canonical.starts_with(&self.root) {
            logger::log_warning(&format!(
                "Path escapes store root: {name:?} -> {}",
                canonical.display()
            ));
            return Err(ErrorKind::NotFound.into());
        }

        let file = File::open(&canonical).await.map_err(map_open_error)?;
        Ok(Box::new(DirFile { file }))
    }
}

/// Split a name into path segments, resolving `.` and `..` against the root
fn clean_segments(name: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}

/// A path through a regular file (`a.css/b`) is just another missing name
fn map_open_error(err: io::Error) -> io::Error {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => ErrorKind::NotFound.into(),
        _ => err,
    }
}

struct DirFile {
    file: File,
}

impl AsyncRead for DirFile {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.file).poll_read(cx, buf)
    }
}

#[async_trait]
impl StoreFile for DirFile {
    async fn stat(&mut self) -> io::Result<FileStat> {
        let meta = self.file.metadata().await?;
        Ok(FileStat {
            is_dir: meta.is_dir(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn fixture() -> (tempfile::TempDir, DirStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("base.css"), "body{}").unwrap();
        std::fs::create_dir(dir.path().join("pure")).unwrap();
        std::fs::write(dir.path().join("pure/grids.css"), ".g{}").unwrap();
        let store = DirStore::new(dir.path()).unwrap();
        (dir, store)
    }

    async fn read_all(store: &DirStore, name: &str) -> io::Result<String> {
        let mut file = store.open(name).await?;
        let mut out = String::new();
        file.read_to_string(&mut out).await?;
        Ok(out)
    }

    #[test]
    fn test_clean_segments() {
        assert_eq!(clean_segments("a/b.css"), vec!["a", "b.css"]);
        assert_eq!(clean_segments("./a//b.css"), vec!["a", "b.css"]);
        assert_eq!(clean_segments("../../etc/passwd"), vec!["etc", "passwd"]);
        assert_eq!(clean_segments("a/../b"), vec!["b"]);
        assert!(clean_segments("").is_empty());
    }

    #[tokio::test]
    async fn test_reads_files() {
        let (_dir, store) = fixture();
        assert_eq!(read_all(&store, "base.css").await.unwrap(), "body{}");
        assert_eq!(read_all(&store, "pure/grids.css").await.unwrap(), ".g{}");
    }

    #[tokio::test]
    async fn test_stat_reports_directory() {
        let (_dir, store) = fixture();
        let mut file = store.open("pure").await.unwrap();
        assert!(file.stat().await.unwrap().is_dir);

        let mut file = store.open("base.css").await.unwrap();
        let stat = file.stat().await.unwrap();
        assert!(!stat.is_dir);
        assert!(stat.modified > SystemTime::UNIX_EPOCH);
    }

    #[tokio::test]
    async fn test_missing_is_not_found() {
        let (_dir, store) = fixture();
        let err = store.open("missing.css").await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.open("base.css/inner").await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.open("nul\0byte").await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_parent_segments_stay_in_root() {
        let (_dir, store) = fixture();
        assert_eq!(read_all(&store, "../base.css").await.unwrap(), "body{}");
        assert_eq!(read_all(&store, "pure/../base.css").await.unwrap(), "body{}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_blocked() {
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        let (dir, store) = fixture();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("link.txt"))
            .unwrap();

        let err = store.open("link.txt").await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
