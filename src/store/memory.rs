//! In-memory file store

use super::{FileStat, FileStore, StoreFile};
use async_trait::async_trait;
use hyper::body::Bytes;
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, ErrorKind};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::SystemTime;
use tokio::io::{AsyncRead, ReadBuf};

/// File store holding its entries in memory
///
/// Names are matched literally. A name is a directory when it was added with
/// [`MemoryStore::with_dir`], when another entry lives below it (`name/...`), or
/// when it is empty (the store root).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: HashMap<String, (Bytes, SystemTime)>,
    dirs: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any previous entry with the same name
    #[must_use]
    pub fn with_file(
        mut self,
        name: impl Into<String>,
        content: impl Into<Bytes>,
        modified: SystemTime,
    ) -> Self {
        self.insert_file(name, content, modified);
        self
    }

    /// Add an explicit directory entry
    #[must_use]
    pub fn with_dir(mut self, name: impl Into<String>) -> Self {
        self.dirs.insert(name.into());
        self
    }

    pub fn insert_file(
        &mut self,
        name: impl Into<String>,
        content: impl Into<Bytes>,
        modified: SystemTime,
    ) {
        self.files.insert(name.into(), (content.into(), modified));
    }

    fn is_dir(&self, name: &str) -> bool {
        if name.is_empty() || self.dirs.contains(name) {
            return true;
        }
        let prefix = format!("{name}/");
        self.files.keys().any(|k| k.starts_with(&prefix))
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn open(&self, name: &str) -> io::Result<Box<dyn StoreFile>> {
        if let Some((content, modified)) = self.files.get(name) {
            return Ok(Box::new(MemoryFile {
                content: Cursor::new(content.clone()),
                stat: FileStat {
                    is_dir: false,
                    modified: *modified,
                },
            }));
        }
        if self.is_dir(name) {
            return Ok(Box::new(MemoryFile {
                content: Cursor::new(Bytes::new()),
                stat: FileStat {
                    is_dir: true,
                    modified: SystemTime::UNIX_EPOCH,
                },
            }));
        }
        Err(ErrorKind::NotFound.into())
    }
}

struct MemoryFile {
    content: Cursor<Bytes>,
    stat: FileStat,
}

impl AsyncRead for MemoryFile {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.content).poll_read(cx, buf)
    }
}

#[async_trait]
impl StoreFile for MemoryFile {
    async fn stat(&mut self) -> io::Result<FileStat> {
        Ok(self.stat)
    }
}
