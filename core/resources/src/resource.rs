use std::{any::Any, future::Future, sync::{atomic::{AtomicBool, Ordering}, Arc}};

use tracing::Instrument;

use crate::LoadError;

/// List of resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// WGSL shader source.
    Shader,
    /// Elevation raster.
    Heightmap,
}

/// Describe a resource to load.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescription {
    /// Label of the resource.
    pub label: String,
    /// Type of the resource.
    pub resource_type: ResourceType,
    /// URL or path of the resource.
    pub source: String,
}

impl ResourceDescription {
    pub fn new(label: &str, resource_type: ResourceType, source: &str) -> Self {
        Self {
            label: label.to_string(),
            resource_type,
            source: source.to_string(),
        }
    }
}


/// Describe a resource.
pub trait Resource: Any + std::fmt::Debug {
    /// Create a new resource.
    /// This will start the async loading of the resource.
    ///
    /// # Arguments
    ///
    /// * `desc` - The description of the resource.
    fn new(desc: ResourceDescription) -> Self where Self: Sized;

    /// Load the sync part of the resource, once the async part is done.
    ///
    /// # Errors
    ///
    /// The error of the async loading, if it failed.
    fn sync_load(&mut self) -> Result<(), LoadError>;

    /// Check if the async part of the loading is done.
    fn async_loaded(&self) -> bool;

    /// Check if the resource is loaded.
    fn loaded(&self) -> bool;

    /// Label of the resource.
    fn label(&self) -> &str;

    /// Get the type of the resource.
    fn resource_type() -> ResourceType where Self: Sized;

    /// As any.
    fn as_any(&self) -> &dyn Any;
}


/// Result of an async loading task, handed back through a channel.
/// The flag is raised once the result has been sent, successful or not.
pub(crate) struct AsyncLoad<T> {
    label: String,
    done: Arc<AtomicBool>,
    receiver: std::sync::mpsc::Receiver<Result<T, LoadError>>,
}

impl<T: Send + 'static> AsyncLoad<T> {
    /// Spawn the loading task on the tokio runtime.
    pub fn spawn<F>(label: &str, task: F) -> Self
    where
        F: Future<Output = Result<T, LoadError>> + Send + 'static
    {
        let done = Arc::new(AtomicBool::new(false));
        let done_c = Arc::clone(&done);
        let (sender, receiver) = std::sync::mpsc::sync_channel(1);

        let task = async move {
            let result = task.await;
            // Receiver may be gone if the resource was dropped
            let _ = sender.send(result);
            done_c.store(true, Ordering::Release);
        };
        tokio::task::spawn(task.instrument(tracing::info_span!("async_load", label)));

        Self {
            label: label.to_string(),
            done,
            receiver,
        }
    }

    pub fn done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Take the result of the task. Blocks until the task sends it.
    pub fn take(&self) -> Result<T, LoadError> {
        self.receiver.recv().map_err(|_| LoadError::Interrupted { label: self.label.clone() })?
    }
}

impl<T> std::fmt::Debug for AsyncLoad<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncLoad")
            .field("label", &self.label)
            .field("done", &self.done.load(Ordering::Acquire))
            .finish()
    }
}
