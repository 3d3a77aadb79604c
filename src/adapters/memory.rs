use crate::domain::model::{PanelContent, PaperEntity};
use crate::domain::ports::{PanelSink, PreferenceStore, SelectionEvents, SelectionHandler, Subscription};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Preference store backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferences {
    async fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    pub slot: String,
    pub widget_key: String,
    pub content: PanelContent,
}

/// Panel sink that keeps every update in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingPanel {
    updates: Arc<Mutex<Vec<SlotUpdate>>>,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<SlotUpdate> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<SlotUpdate> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl PanelSink for RecordingPanel {
    async fn update_slot(&self, slot: &str, widget_key: &str, content: PanelContent) {
        tracing::debug!("Slot {} / {} updated: {}", slot, widget_key, content.title);
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(SlotUpdate {
                slot: slot.to_string(),
                widget_key: widget_key.to_string(),
                content,
            });
    }
}

type HandlerMap = HashMap<u64, SelectionHandler>;

/// In-process selection event bus. Handlers run sequentially on `emit`.
#[derive(Clone, Default)]
pub struct LocalSelectionBus {
    handlers: Arc<Mutex<HandlerMap>>,
    next_id: Arc<Mutex<u64>>,
}

impl LocalSelectionBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub async fn emit(&self, selection: Vec<PaperEntity>) {
        // 先在鎖內建立 future，釋放鎖後再依序等待
        let pending: Vec<_> = {
            let handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
            handlers
                .values()
                .map(|handler| handler(selection.clone()))
                .collect()
        };

        for future in pending {
            future.await;
        }
    }
}

impl SelectionEvents for LocalSelectionBus {
    fn subscribe(&self, handler: SelectionHandler) -> Subscription {
        let id = {
            let mut next_id = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
            *next_id += 1;
            *next_id
        };
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, handler);

        let handlers = Arc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(handlers) = handlers.upgrade() {
                handlers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&id);
            }
        })
    }
}
