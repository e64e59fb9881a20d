//! File store module
//!
//! Abstracts where combined files come from. The pipeline only ever talks to a
//! [`FileStore`], so a directory on disk, an in-memory map or any other backend
//! can be plugged in without touching request handling.

mod dir;
mod memory;

pub use dir::DirStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::time::SystemTime;
use tokio::io::AsyncRead;

/// Metadata of an opened file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Whether the handle refers to a directory
    pub is_dir: bool,
    /// Last modification time, `UNIX_EPOCH` when unknown
    pub modified: SystemTime,
}

/// An open handle into a store
///
/// Content is read through [`AsyncRead`]. The handle is released when dropped.
#[async_trait]
pub trait StoreFile: AsyncRead + Send + Unpin {
    /// Query metadata of the opened file
    async fn stat(&mut self) -> io::Result<FileStat>;
}

/// Read-only named file access
///
/// Implementations must allow concurrent independent opens from many requests.
/// A missing name is reported as an error of kind [`io::ErrorKind::NotFound`].
#[async_trait]
pub trait FileStore: Send + Sync + fmt::Debug {
    /// Open a file by its unescaped name
    async fn open(&self, name: &str) -> io::Result<Box<dyn StoreFile>>;
}
