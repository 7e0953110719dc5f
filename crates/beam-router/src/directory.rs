use beam_common::{BeamError, NodeDescriptor, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Somewhere the access node directory can be loaded from.
///
/// Sources are consulted on every operation, so a source that reflects
/// external edits (like [`FileSource`]) takes effect without a restart.
pub trait DirectorySource: Send + Sync {
    fn load(&self) -> Result<Vec<NodeDescriptor>>;
}

/// JSON file containing an array of node descriptors, re-read on every load.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DirectorySource for FileSource {
    fn load(&self) -> Result<Vec<NodeDescriptor>> {
        let data = std::fs::read(&self.path).map_err(|e| {
            BeamError::Configuration(format!(
                "failed to read node directory {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let nodes: Vec<NodeDescriptor> = serde_json::from_slice(&data).map_err(|e| {
            BeamError::Configuration(format!(
                "failed to parse node directory {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), nodes = nodes.len(), "loaded node directory");
        Ok(nodes)
    }
}

/// Fixed list of descriptors.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    nodes: Vec<NodeDescriptor>,
}

impl StaticSource {
    pub fn new(nodes: Vec<NodeDescriptor>) -> Self {
        Self { nodes }
    }
}

impl DirectorySource for StaticSource {
    fn load(&self) -> Result<Vec<NodeDescriptor>> {
        Ok(self.nodes.clone())
    }
}

/// Shared handle to the configured directory source.
#[derive(Clone)]
pub struct NodeDirectory {
    source: Arc<dyn DirectorySource>,
}

impl NodeDirectory {
    pub fn new(source: impl DirectorySource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(path))
    }

    pub fn from_nodes(nodes: Vec<NodeDescriptor>) -> Self {
        Self::new(StaticSource::new(nodes))
    }

    /// Loads the current descriptor list, in file order.
    pub fn load(&self) -> Result<Vec<NodeDescriptor>> {
        self.source.load()
    }
}
