pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{LocalSelectionBus, MemoryPreferences, RecordingPanel, ReqwestHttpClient};
pub use config::CommentsConfig;
pub use crate::core::{
    extension::CommentsExtension, fetcher::CommentFetcher, render::ThreadFormatter,
    resolver::EndpointResolver,
};
pub use utils::error::{CommentsError, Result};
