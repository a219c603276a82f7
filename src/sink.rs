// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Output sink for the merged stream.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};

/// Exclusive, append-only writer for one merge output.
///
/// Consumed by [`OutputSink::close`], so it is closed at most once.
pub struct OutputSink<W> {
    path: PathBuf,
    writer: W,
}

impl OutputSink<BufWriter<File>> {
    /// Create (or truncate) the file at `path`, creating parent directories.
    pub async fn create(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = File::create(&path).await?;
        Ok(Self { path, writer: BufWriter::with_capacity(1024 * 1024, file) })
    }
}

impl<W: AsyncWrite + Unpin + Send> OutputSink<W> {
    /// Wrap an arbitrary writer; `path` is reported in the merge result.
    pub fn new(path: impl Into<PathBuf>, writer: W) -> Self {
        Self { path: path.into(), writer }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy all of `body` to the end of the output and flush it through.
    /// Returns the bytes copied.
    pub async fn append<R>(&mut self, body: &mut R) -> std::io::Result<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let n = tokio::io::copy(body, &mut self.writer).await?;
        self.writer.flush().await?;
        Ok(n)
    }

    /// Flush and shut down the writer, returning the output path.
    pub async fn close(mut self) -> std::io::Result<PathBuf> {
        self.writer.flush().await?;
        self.writer.shutdown().await?;
        Ok(self.path)
    }
}
