use crate::domain::model::{PanelContent, PaperEntity};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// HTTP capability provided by the host. Bodies are returned as raw text;
/// callers decode structured responses themselves.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
    async fn post_json(&self, url: &str, payload: &serde_json::Value) -> Result<String>;
}

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_string(&self, key: &str) -> Option<String>;
}

#[async_trait]
pub trait PanelSink: Send + Sync {
    async fn update_slot(&self, slot: &str, widget_key: &str, content: PanelContent);
}

/// Anything that can produce the current comments API base URL.
#[async_trait]
pub trait EndpointSource: Send + Sync {
    async fn resolve(&self) -> Result<Option<String>>;
}

pub type SelectionFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub type SelectionHandler = Box<dyn Fn(Vec<PaperEntity>) -> SelectionFuture + Send + Sync>;

pub trait SelectionEvents: Send + Sync {
    fn subscribe(&self, handler: SelectionHandler) -> Subscription;
}

/// Handle for a selection subscription. Dropping it unsubscribes.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
