//! Asynchronous boundary for fetching file content
//!
//! Parsing itself is synchronous; providers only supply bytes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use dv_core::Table;
use tracing::info;

use super::parse_with_config;
use crate::config::ImportConfig;

/// Raw file content plus its name
#[derive(Debug, Clone)]
pub struct FileContent {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Size reported by the storage layer, when it differs from `bytes.len()`
    pub size: Option<u64>,
}

/// Anything that can hand over the bytes of an uploaded file
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Fetch the content identified by `locator`
    async fn fetch(&self, locator: &str) -> anyhow::Result<FileContent>;
}

/// Reads files from the local filesystem, optionally relative to a root
#[derive(Debug, Clone, Default)]
pub struct FsContentProvider {
    root: Option<PathBuf>,
}

impl FsContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(locator),
            None => PathBuf::from(locator),
        }
    }
}

#[async_trait]
impl ContentProvider for FsContentProvider {
    async fn fetch(&self, locator: &str) -> anyhow::Result<FileContent> {
        let path = self.resolve(locator);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let size = tokio::fs::metadata(&path).await.ok().map(|m| m.len());

        Ok(FileContent {
            name: file_name_of(&path),
            bytes,
            size,
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Fetch a file through `provider` and parse it on a blocking task
pub async fn import(provider: &dyn ContentProvider, locator: &str, config: &ImportConfig) -> anyhow::Result<Table> {
    let content = provider.fetch(locator).await?;
    let format = config.resolve_format(&content.name)?;

    info!("Importing {} as {} ({} bytes)", content.name, format, content.bytes.len());

    let config = config.clone();
    let table = tokio::task::spawn_blocking(move || {
        let table = parse_with_config(&content.bytes, format, &content.name, &config)?;
        Ok::<_, crate::DataError>(match content.size {
            Some(size) => table.with_file_size(size),
            None => table,
        })
    })
    .await
    .context("Import task failed")??;

    Ok(table)
}
