use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;

/// API base URL discovered from the site's script bundles, with the time it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url_base: String,
    pub resolved_at_epoch_ms: i64,
}

impl ResolvedEndpoint {
    pub fn new(url_base: String, resolved_at_epoch_ms: i64) -> Self {
        Self {
            url_base,
            resolved_at_epoch_ms,
        }
    }

    pub fn age_ms(&self, now_epoch_ms: i64) -> i64 {
        now_epoch_ms - self.resolved_at_epoch_ms
    }

    pub fn is_fresh(&self, now_epoch_ms: i64, staleness: Duration) -> bool {
        !self.url_base.is_empty()
            && i128::from(self.age_ms(now_epoch_ms)) < staleness.as_millis() as i128
    }
}

/// arXiv identifier with its namespace tag removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaperIdentifier(String);

impl PaperIdentifier {
    pub const NAMESPACE_PREFIX: &'static str = "arxiv:";

    /// Returns `None` for an empty identifier.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let prefix_len = Self::NAMESPACE_PREFIX.len();
        let id = match trimmed.get(..prefix_len) {
            Some(head) if head.eq_ignore_ascii_case(Self::NAMESPACE_PREFIX) => {
                trimmed[prefix_len..].trim()
            }
            _ => trimmed,
        };

        if id.is_empty() {
            None
        } else {
            Some(Self(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LatestVersion(pub String);

impl LatestVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LatestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `GET /papers/latestversion/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersionResponse {
    pub version: LatestVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<DateTime<Utc>>,
    pub body: String,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub responses: Vec<Comment>,
}

impl Comment {
    /// `author@institution`, or just the author when no institution is set.
    pub fn display_author(&self) -> String {
        match self.institution.as_deref().map(str::trim) {
            Some(institution) if !institution.is_empty() => {
                format!("{}@{}", self.author, institution)
            }
            _ => self.author.clone(),
        }
    }
}

/// Parses a comment timestamp without failing the whole thread: RFC 3339,
/// naive date-times (taken as UTC), plain dates and epoch milliseconds.
/// Anything else becomes `None`.
pub fn parse_comment_date(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
                return Some(date.with_timezone(&Utc));
            }
            for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                    return Some(naive.and_utc());
                }
            }
            if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                return day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
            raw.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)
        }
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|millis| millis as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_comment_date))
}

/// Body of `POST /papers/questions/{version}/true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(rename = "bodyarr")]
    pub comments: Vec<Comment>,
}

impl CommentThread {
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Display language, read from the host's `language` preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Chinese,
    #[default]
    English,
}

impl Language {
    pub fn from_preference(value: Option<&str>) -> Self {
        match value {
            Some("zh-CN") => Language::Chinese,
            _ => Language::English,
        }
    }

    pub fn panel_title(self) -> &'static str {
        match self {
            Language::Chinese => "社区评论",
            Language::English => "Community Comments",
        }
    }

    pub fn post_label(self) -> &'static str {
        match self {
            Language::Chinese => "评论",
            Language::English => "Post",
        }
    }

    pub fn format_date(self, date: &DateTime<Utc>) -> String {
        match self {
            Language::Chinese => date.format("%Y/%-m/%-d").to_string(),
            Language::English => date.format("%-m/%-d/%Y").to_string(),
        }
    }
}

/// A paper as selected in the host library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperEntity {
    pub title: String,
    pub arxiv: Option<String>,
}

impl PaperEntity {
    pub fn new(title: impl Into<String>, arxiv: Option<String>) -> Self {
        Self {
            title: title.into(),
            arxiv,
        }
    }

    pub fn identifier(&self) -> Option<PaperIdentifier> {
        self.arxiv.as_deref().and_then(PaperIdentifier::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelContent {
    pub title: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_identifier_strips_namespace() {
        let id = PaperIdentifier::parse("arxiv:2406.07394").unwrap();
        assert_eq!(id.as_str(), "2406.07394");

        let id = PaperIdentifier::parse("  ArXiv:2406.07394 ").unwrap();
        assert_eq!(id.to_string(), "2406.07394");

        assert_eq!(PaperIdentifier::parse("2406.07394").unwrap().as_str(), "2406.07394");
        assert!(PaperIdentifier::parse("").is_none());
        assert!(PaperIdentifier::parse("arxiv:").is_none());
    }

    #[test]
    fn test_endpoint_freshness() {
        let endpoint = ResolvedEndpoint::new("https://a.example/default".to_string(), 1_000);
        let hour = Duration::from_secs(3600);

        assert!(endpoint.is_fresh(1_000, hour));
        assert!(endpoint.is_fresh(1_000 + 3_599_999, hour));
        assert!(!endpoint.is_fresh(1_000 + 3_600_000, hour));

        let empty = ResolvedEndpoint::new(String::new(), 1_000);
        assert!(!empty.is_fresh(1_000, hour));
    }

    #[test]
    fn test_language_switch() {
        assert_eq!(Language::from_preference(Some("zh-CN")), Language::Chinese);
        assert_eq!(Language::from_preference(Some("en")), Language::English);
        assert_eq!(Language::from_preference(Some("zh-TW")), Language::English);
        assert_eq!(Language::from_preference(None), Language::English);
        assert_eq!(Language::Chinese.post_label(), "评论");
        assert_eq!(Language::English.panel_title(), "Community Comments");
    }

    #[test]
    fn test_date_format_per_language() {
        let date = Utc.with_ymd_and_hms(2024, 6, 12, 8, 30, 0).unwrap();
        assert_eq!(Language::English.format_date(&date), "6/12/2024");
        assert_eq!(Language::Chinese.format_date(&date), "2024/6/12");
    }

    #[test]
    fn test_thread_schema() {
        let thread: CommentThread = serde_json::from_value(serde_json::json!({
            "bodyarr": [{
                "author": "Ada",
                "institution": "MIT",
                "date": "2024-06-12T08:30:00.000Z",
                "body": "<p>Nice</p>",
                "upvotes": 2,
                "responses": [{ "author": "Bob", "body": "<p>Thanks</p>" }]
            }]
        }))
        .unwrap();

        assert_eq!(thread.comments.len(), 1);
        let comment = &thread.comments[0];
        assert_eq!(comment.display_author(), "Ada@MIT");
        assert_eq!(comment.responses[0].upvotes, 0);
        assert!(comment.responses[0].date.is_none());

        let missing = serde_json::from_value::<CommentThread>(serde_json::json!({}));
        assert!(missing.is_err());
    }

    #[test]
    fn test_comment_dates_are_lenient() {
        let thread: CommentThread = serde_json::from_value(serde_json::json!({
            "bodyarr": [
                { "author": "A", "body": "a", "date": "2024-06-12" },
                { "author": "B", "body": "b", "date": "2024-06-12T08:30:00" },
                { "author": "C", "body": "c", "date": 1718181000000_i64 },
                { "author": "D", "body": "d", "date": "last tuesday" },
                { "author": "E", "body": "e", "date": null }
            ]
        }))
        .unwrap();

        let dates: Vec<_> = thread.comments.iter().map(|c| c.date).collect();
        assert_eq!(dates[0], Some(Utc.with_ymd_and_hms(2024, 6, 12, 0, 0, 0).unwrap()));
        assert_eq!(dates[1], Some(Utc.with_ymd_and_hms(2024, 6, 12, 8, 30, 0).unwrap()));
        assert_eq!(dates[2], Some(Utc.with_ymd_and_hms(2024, 6, 12, 8, 30, 0).unwrap()));
        assert_eq!(dates[3], None);
        assert_eq!(dates[4], None);
    }
}
