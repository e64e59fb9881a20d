//! File concatenation
//!
//! Reads every requested file from the store, in order, into one buffer.

use super::{ComboError, FileList};
use crate::logger;
use crate::store::FileStore;
use hyper::body::Bytes;
use std::io::ErrorKind;
use std::time::SystemTime;

/// Concatenated content of a [`FileList`]
#[derive(Debug, Clone)]
pub struct Concatenated {
    pub body: Bytes,
    /// Latest modification time of all parts, `UNIX_EPOCH` if none is known
    pub last_modified: SystemTime,
}

/// Read all files of `files` from `store` and join them without delimiters
///
/// Fails on the first file that cannot be served; nothing read so far is kept.
pub async fn concatenate(
    files: &FileList,
    store: &dyn FileStore,
) -> Result<Concatenated, ComboError> {
    let mut buf = Vec::new();
    let mut last_modified = SystemTime::UNIX_EPOCH;

    for name in files.iter() {
        let modified = append_file(&mut buf, store, name).await?;
        last_modified = last_modified.max(modified);
    }

    Ok(Concatenated {
        body: Bytes::from(buf),
        last_modified,
    })
}

/// Append one file to `buf` and return its modification time
///
/// The handle is dropped when this returns, on success and on every error.
async fn append_file(
    buf: &mut Vec<u8>,
    store: &dyn FileStore,
    name: &str,
) -> Result<SystemTime, ComboError> {
    let classify = |err: std::io::Error| {
        if err.kind() == ErrorKind::NotFound {
            ComboError::FileNotFound(name.to_string())
        } else {
            logger::log_error(&format!("Failed to read {name:?}: {err}"));
            ComboError::Internal(err)
        }
    };

    let mut file = store.open(name).await.map_err(classify)?;

    let stat = file.stat().await.map_err(classify)?;
    if stat.is_dir {
        return Err(ComboError::FileNotFound(name.to_string()));
    }

    tokio::io::copy(&mut file, buf).await.map_err(classify)?;
    Ok(stat.modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::parse_file_list;
    use crate::config::ComboConfig;
    use crate::store::{FileStat, MemoryStore, StoreFile};
    use async_trait::async_trait;
    use hyper::Method;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use std::time::Duration;
    use tokio::io::{AsyncRead, ReadBuf};

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn list(query: &str) -> FileList {
        parse_file_list(&Method::GET, "/", Some(query), &ComboConfig::default()).unwrap()
    }

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_file("base.css", "A", at(1_000))
            .with_file("grid.css", "B", at(2_000))
            .with_file("pure/buttons.css", "C", at(1_500))
    }

    #[tokio::test]
    async fn test_request_order() {
        let store = store();

        let out = concatenate(&list("base.css&grid.css"), &store).await.unwrap();
        assert_eq!(out.body, "AB");
        assert_eq!(out.last_modified, at(2_000));

        let out = concatenate(&list("grid.css&base.css"), &store).await.unwrap();
        assert_eq!(out.body, "BA");
        assert_eq!(out.last_modified, at(2_000));

        let out = concatenate(&list("pure/buttons.css&base.css"), &store).await.unwrap();
        assert_eq!(out.body, "CA");
        assert_eq!(out.last_modified, at(1_500));
    }

    #[tokio::test]
    async fn test_missing_file() {
        match concatenate(&list("base.css&missing.css"), &store()).await {
            Err(ComboError::FileNotFound(name)) => assert_eq!(name, "missing.css"),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_directory_is_not_found() {
        match concatenate(&list("pure"), &store()).await {
            Err(ComboError::FileNotFound(name)) => assert_eq!(name, "pure"),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_mtime() {
        let store = MemoryStore::new().with_file("a.txt", "x", SystemTime::UNIX_EPOCH);
        let out = concatenate(&list("a.txt"), &store).await.unwrap();
        assert_eq!(out.last_modified, SystemTime::UNIX_EPOCH);
    }

    /// Store whose files fail halfway through reading
    #[derive(Debug)]
    struct BrokenStore;

    struct BrokenFile {
        sent: bool,
    }

    impl AsyncRead for BrokenFile {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(io::Error::other("device error")));
            }
            self.sent = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        }
    }

    #[async_trait]
    impl StoreFile for BrokenFile {
        async fn stat(&mut self) -> io::Result<FileStat> {
            Ok(FileStat {
                is_dir: false,
                modified: SystemTime::now(),
            })
        }
    }

    #[async_trait]
    impl FileStore for BrokenStore {
        async fn open(&self, name: &str) -> io::Result<Box<dyn StoreFile>> {
            if name == "denied.css" {
                return Err(io::Error::from(ErrorKind::PermissionDenied));
            }
            Ok(Box::new(BrokenFile { sent: false }))
        }
    }

    #[tokio::test]
    async fn test_read_error_is_internal() {
        assert!(matches!(
            concatenate(&list("a.css"), &BrokenStore).await,
            Err(ComboError::Internal(_))
        ));
        assert!(matches!(
            concatenate(&list("denied.css"), &BrokenStore).await,
            Err(ComboError::Internal(_))
        ));
    }
}
