// Adapters layer: concrete implementations of the host collaborators.

pub mod http;
pub mod memory;

pub use http::ReqwestHttpClient;
pub use memory::{LocalSelectionBus, MemoryPreferences, RecordingPanel, SlotUpdate};
