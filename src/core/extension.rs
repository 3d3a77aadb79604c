use crate::config::CommentsConfig;
use crate::core::fetcher::CommentFetcher;
use crate::core::render::ThreadFormatter;
use crate::core::resolver::EndpointResolver;
use crate::domain::model::{Language, PanelContent, PaperEntity};
use crate::domain::ports::{
    EndpointSource, HttpClient, PanelSink, PreferenceStore, SelectionEvents, SelectionFuture,
    SelectionHandler, Subscription,
};
use crate::utils::error::Result;
use crate::utils::logger::LOG_TARGET;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const PANEL_SLOT: &str = "paperDetailsPanelSlot3";
pub const WIDGET_KEY: &str = "paperlib-community-comments";
pub const PLACEHOLDER: &str = "N/A";
pub const LANGUAGE_PREFERENCE: &str = "language";

/// Wires selection changes to endpoint discovery, thread fetching and the
/// details panel. Failures never leave this type; they are logged and the
/// panel keeps the placeholder.
pub struct CommentsExtension<C: HttpClient, P: PreferenceStore, U: PanelSink> {
    endpoints: Box<dyn EndpointSource>,
    fetcher: CommentFetcher<C>,
    preferences: P,
    panel: U,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl<C, P, U> CommentsExtension<C, P, U>
where
    C: HttpClient + 'static,
    P: PreferenceStore + 'static,
    U: PanelSink + 'static,
{
    pub fn new(
        endpoints: Box<dyn EndpointSource>,
        fetcher: CommentFetcher<C>,
        preferences: P,
        panel: U,
    ) -> Self {
        Self {
            endpoints,
            fetcher,
            preferences,
            panel,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &CommentsConfig, client: Arc<C>, preferences: P, panel: U) -> Result<Self> {
        let resolver = EndpointResolver::new(client.clone(), &config.discovery)?;
        let fetcher = CommentFetcher::new(client, ThreadFormatter::from_config(&config.render));
        Ok(Self::new(Box::new(resolver), fetcher, preferences, panel))
    }

    /// Subscribes to selection changes. The handler only holds a weak
    /// reference, so dropping the extension also stops lookups.
    pub async fn initialize(self: &Arc<Self>, events: &dyn SelectionEvents) {
        let weak = Arc::downgrade(self);
        let handler: SelectionHandler = Box::new(move |papers: Vec<PaperEntity>| {
            let weak = weak.clone();
            Box::pin(async move {
                if let Some(extension) = weak.upgrade() {
                    extension.on_selection_changed(&papers).await;
                }
            }) as SelectionFuture
        });

        self.subscriptions.lock().await.push(events.subscribe(handler));
        tracing::debug!(target: LOG_TARGET, "Subscribed to selection changes");
    }

    pub async fn dispose(&self) {
        let released: Vec<Subscription> = self.subscriptions.lock().await.drain(..).collect();
        tracing::debug!(target: LOG_TARGET, "Releasing {} subscriptions", released.len());
        drop(released);
    }

    /// Only a single selected paper triggers a lookup.
    pub async fn on_selection_changed(&self, papers: &[PaperEntity]) -> Option<PanelContent> {
        match papers {
            [paper] => Some(self.show_comments(paper).await),
            _ => None,
        }
    }

    pub async fn show_comments(&self, paper: &PaperEntity) -> PanelContent {
        let preference = self.preferences.get_string(LANGUAGE_PREFERENCE).await;
        let lang = Language::from_preference(preference.as_deref());
        let title = lang.panel_title().to_string();

        self.update_panel(&title, PLACEHOLDER).await;

        match self.lookup(paper, lang).await {
            Ok(fragment) => {
                let trimmed = fragment.trim();
                let content = if trimmed.is_empty() { PLACEHOLDER } else { trimmed };
                self.update_panel(&title, content).await
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(target: LOG_TARGET, "Failed to get community comments: {}", e);
                PanelContent {
                    title,
                    content: PLACEHOLDER.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(
                    target: LOG_TARGET,
                    "❌ Failed to get community comments: {} (Category: {:?})",
                    e,
                    e.category()
                );
                PanelContent {
                    title,
                    content: PLACEHOLDER.to_string(),
                }
            }
        }
    }

    /// Empty string when the paper has no arXiv id or no endpoint is found.
    pub async fn lookup(&self, paper: &PaperEntity, lang: Language) -> Result<String> {
        let Some(id) = paper.identifier() else {
            tracing::debug!(target: LOG_TARGET, "No arXiv identifier for '{}'", paper.title);
            return Ok(String::new());
        };

        let Some(api_base) = self.endpoints.resolve().await? else {
            return Ok(String::new());
        };

        self.fetcher.fetch_fragment(&api_base, &id, lang).await
    }

    async fn update_panel(&self, title: &str, content: &str) -> PanelContent {
        let panel_content = PanelContent {
            title: title.to_string(),
            content: content.to_string(),
        };
        self.panel
            .update_slot(PANEL_SLOT, WIDGET_KEY, panel_content.clone())
            .await;
        panel_content
    }
}
