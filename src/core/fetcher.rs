use crate::core::render::ThreadFormatter;
use crate::domain::model::{CommentThread, Language, LatestVersion, LatestVersionResponse, PaperIdentifier};
use crate::domain::ports::HttpClient;
use crate::utils::error::Result;
use crate::utils::logger::LOG_TARGET;
use std::sync::Arc;

pub struct CommentFetcher<C: HttpClient> {
    client: Arc<C>,
    formatter: ThreadFormatter,
}

impl<C: HttpClient> CommentFetcher<C> {
    pub fn new(client: Arc<C>, formatter: ThreadFormatter) -> Self {
        Self { client, formatter }
    }

    /// `GET {api_base}/papers/latestversion/{id}`
    pub async fn latest_version(&self, api_base: &str, id: &PaperIdentifier) -> Result<LatestVersion> {
        let url = format!("{}/papers/latestversion/{}", api_base.trim_end_matches('/'), id);
        tracing::debug!(target: LOG_TARGET, "Requesting latest version: {}", url);

        let body = self.client.get(&url).await?;
        let response: LatestVersionResponse = serde_json::from_str(&body)?;
        Ok(response.version)
    }

    /// `POST {api_base}/papers/questions/{version}/true` with `{"tags": null}`.
    pub async fn thread(&self, api_base: &str, version: &LatestVersion) -> Result<CommentThread> {
        let url = format!("{}/papers/questions/{}/true", api_base.trim_end_matches('/'), version);
        tracing::debug!(target: LOG_TARGET, "Requesting comment thread: {}", url);

        let payload = serde_json::json!({ "tags": null });
        let body = self.client.post_json(&url, &payload).await?;
        let thread: CommentThread = serde_json::from_str(&body)?;
        Ok(thread)
    }

    pub async fn fetch_thread(
        &self,
        api_base: &str,
        id: &PaperIdentifier,
    ) -> Result<(LatestVersion, CommentThread)> {
        let version = self.latest_version(api_base, id).await?;
        let thread = self.thread(api_base, &version).await?;
        tracing::debug!(
            target: LOG_TARGET,
            "Fetched {} comments for {}",
            thread.comments.len(),
            version
        );
        Ok((version, thread))
    }

    /// Fetches and renders the thread for the paper's latest version.
    pub async fn fetch_fragment(
        &self,
        api_base: &str,
        id: &PaperIdentifier,
        lang: Language,
    ) -> Result<String> {
        let (version, thread) = self.fetch_thread(api_base, id).await?;
        Ok(self.formatter.format(&thread, &version, lang))
    }
}
