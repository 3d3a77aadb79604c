use crate::config::DiscoveryConfig;
use crate::domain::model::ResolvedEndpoint;
use crate::domain::ports::{EndpointSource, HttpClient};
use crate::utils::error::Result;
use crate::utils::logger::LOG_TARGET;
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

static HTML_COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?s)<!--.*?-->"));
static SCRIPT_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r#"(?i)<script\b((?:"[^"]*"|'[^']*'|[^>"'])*)>"#));
static ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r#"([^\s"'=<>/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
});

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Exercised by the `script_sources` tests.
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

fn src_attribute(attrs: &str) -> Option<String> {
    ATTR_REGEX
        .captures_iter(attrs)
        .find(|attr| attr[1].eq_ignore_ascii_case("src"))
        .and_then(|attr| {
            attr.get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map(|m| m.as_str().to_string())
        })
}

/// `src` values of every `<script>` element that start with `prefix`, in
/// document order. Commented-out markup is ignored.
pub fn script_sources(html: &str, prefix: &str) -> Vec<String> {
    let visible = HTML_COMMENT_REGEX.replace_all(html, "");
    SCRIPT_TAG_REGEX
        .captures_iter(&visible)
        .filter_map(|tag| src_attribute(tag.get(1)?.as_str()))
        .filter(|src| src.starts_with(prefix))
        .collect()
}

/// First substring of `text` matching the endpoint pattern.
pub fn find_endpoint(pattern: &Regex, text: &str) -> Option<String> {
    pattern.find(text).map(|m| m.as_str().to_string())
}

/// Discovers the comments API base URL from the site's script bundles and
/// keeps it for the staleness window.
pub struct EndpointResolver<C: HttpClient> {
    client: Arc<C>,
    site_url: Url,
    script_prefix: String,
    pattern: Regex,
    max_scripts: usize,
    staleness: Duration,
    cached: RwLock<Option<ResolvedEndpoint>>,
}

impl<C: HttpClient> EndpointResolver<C> {
    pub fn new(client: Arc<C>, config: &DiscoveryConfig) -> Result<Self> {
        Ok(Self {
            client,
            site_url: Url::parse(&config.site_url)?,
            script_prefix: config.script_prefix.clone(),
            pattern: Regex::new(&config.endpoint_pattern)?,
            max_scripts: config.max_scripts.max(1),
            staleness: config.staleness(),
            cached: RwLock::new(None),
        })
    }

    pub async fn cached(&self) -> Option<ResolvedEndpoint> {
        self.cached.read().await.clone()
    }

    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    /// Returns the cached endpoint while fresh, otherwise runs discovery.
    /// `Ok(None)` means no script carried an endpoint; nothing is cached then.
    pub async fn resolve(&self) -> Result<Option<String>> {
        let now = Utc::now().timestamp_millis();
        if let Some(endpoint) = self.cached.read().await.as_ref() {
            if endpoint.is_fresh(now, self.staleness) {
                tracing::debug!(
                    target: LOG_TARGET,
                    "Reusing API endpoint {} (age {} ms)",
                    endpoint.url_base,
                    endpoint.age_ms(now)
                );
                return Ok(Some(endpoint.url_base.clone()));
            }
        }

        let Some(url_base) = self.discover().await? else {
            tracing::debug!(target: LOG_TARGET, "No API endpoint found in {}", self.site_url);
            return Ok(None);
        };

        tracing::info!(target: LOG_TARGET, "🔍 Discovered API endpoint {}", url_base);
        *self.cached.write().await = Some(ResolvedEndpoint::new(
            url_base.clone(),
            Utc::now().timestamp_millis(),
        ));
        Ok(Some(url_base))
    }

    async fn discover(&self) -> Result<Option<String>> {
        let html = self.client.get(self.site_url.as_str()).await?;
        let sources = script_sources(&html, &self.script_prefix);

        if sources.len() > self.max_scripts {
            tracing::warn!(
                target: LOG_TARGET,
                "{} candidate scripts on {}, only the first {} are inspected",
                sources.len(),
                self.site_url,
                self.max_scripts
            );
        }

        for src in sources.iter().take(self.max_scripts) {
            let script_url = self.site_url.join(src)?;
            let content = self.client.get(script_url.as_str()).await?;
            if let Some(found) = find_endpoint(&self.pattern, &content) {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }
}

#[async_trait]
impl<C: HttpClient> EndpointSource for EndpointResolver<C> {
    async fn resolve(&self) -> Result<Option<String>> {
        EndpointResolver::resolve(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ENDPOINT_PATTERN, DEFAULT_SCRIPT_PREFIX};

    const PAGE: &str = r#"<!DOCTYPE html><html><head>
<script src="/_next/static/chunks/webpack-1.js" defer></script>
<script>self.__next_f = [];</script>
<SCRIPT type="text/javascript" SRC='/_next/static/chunks/main-2.js'></SCRIPT>
<script src="https://cdn.example.com/analytics.js"></script>
<script data-src="/_next/static/chunks/ignored.js"></script>
<script async src=/_next/static/chunks/pages/app-3.js></script>
</head></html>"#;

    #[test]
    fn test_script_sources_in_document_order() {
        let sources = script_sources(PAGE, DEFAULT_SCRIPT_PREFIX);
        assert_eq!(
            sources,
            vec![
                "/_next/static/chunks/webpack-1.js",
                "/_next/static/chunks/main-2.js",
                "/_next/static/chunks/pages/app-3.js",
            ]
        );
        assert!(script_sources("<html><body>no scripts</body></html>", DEFAULT_SCRIPT_PREFIX).is_empty());
    }

    #[test]
    fn test_script_sources_skip_commented_markup() {
        let html = r#"<!-- <script src="/_next/static/chunks/old.js"></script> -->
<script src="/_next/static/chunks/live.js"></script>
<!--
<script src="/_next/static/chunks/older.js"></script>
-->"#;
        assert_eq!(script_sources(html, DEFAULT_SCRIPT_PREFIX), vec!["/_next/static/chunks/live.js"]);
    }

    #[test]
    fn test_script_sources_quoted_angle_brackets() {
        let html = r#"<script data-x="a>b" src="/_next/static/chunks/live.js"></script><script data-src='/_next/static/chunks/no.js' onload='x > 1' SRC=/_next/static/chunks/bare.js></script>"#;
        assert_eq!(
            script_sources(html, DEFAULT_SCRIPT_PREFIX),
            vec!["/_next/static/chunks/live.js", "/_next/static/chunks/bare.js"]
        );
    }

    #[test]
    fn test_find_endpoint_first_match() {
        let pattern = Regex::new(DEFAULT_ENDPOINT_PATTERN).unwrap();
        let bundle = r#"var a="https://9lb0a7uylk.execute-api.us-west-2.amazonaws.com/default",b="https://zzz.execute-api.eu-west-1.amazonaws.com/default";"#;

        assert_eq!(
            find_endpoint(&pattern, bundle).as_deref(),
            Some("https://9lb0a7uylk.execute-api.us-west-2.amazonaws.com/default")
        );
        assert!(find_endpoint(&pattern, "https://api.example.com/default").is_none());
        // 大小寫敏感
        assert!(find_endpoint(&pattern, "https://abc.EXECUTE-API.us-west-2.amazonaws.com/default").is_none());
    }
}
