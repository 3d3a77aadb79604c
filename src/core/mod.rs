pub mod extension;
pub mod fetcher;
pub mod render;
pub mod resolver;

pub use crate::domain::model::{
    Comment, CommentThread, Language, LatestVersion, PanelContent, PaperEntity, PaperIdentifier,
    ResolvedEndpoint,
};
pub use crate::domain::ports::{
    EndpointSource, HttpClient, PanelSink, PreferenceStore, SelectionEvents, Subscription,
};
pub use crate::utils::error::Result;
