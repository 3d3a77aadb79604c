use crate::domain::model::{Comment, CommentThread, Language, LatestVersion};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static STYLE_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| compile_regex(r#"style=".*?""#));

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Covered by `strip_inline_styles` tests.
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

const THUMBS_UP_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="12" height="12" fill="currentColor" class="bi bi-hand-thumbs-up my-auto" viewBox="0 0 16 16"><path d="M8.864.046C7.908-.193 7.02.53 6.956 1.466c-.072 1.051-.23 2.016-.428 2.59-.125.36-.479 1.013-1.04 1.639-.557.623-1.282 1.178-2.131 1.41C2.685 7.288 2 7.87 2 8.72v4.001c0 .845.682 1.464 1.448 1.545 1.07.114 1.564.415 2.068.723l.048.03c.272.165.578.348.97.484.397.136.861.217 1.466.217h3.5c.937 0 1.599-.477 1.934-1.064a1.86 1.86 0 0 0 .254-.912c0-.152-.023-.312-.077-.464.201-.263.38-.578.488-.901.11-.33.172-.762.004-1.149.069-.13.12-.269.159-.403.077-.27.113-.568.113-.857 0-.288-.036-.585-.113-.856a2 2 0 0 0-.138-.362 1.9 1.9 0 0 0 .234-1.734c-.206-.592-.682-1.1-1.2-1.272-.847-.282-1.803-.276-2.516-.211a10 10 0 0 0-.443.05 9.4 9.4 0 0 0-.062-4.509A1.38 1.38 0 0 0 9.125.111zM11.5 14.721H8c-.51 0-.863-.069-1.14-.164-.281-.097-.506-.228-.776-.393l-.04-.024c-.555-.339-1.198-.731-2.49-.868-.333-.036-.554-.29-.554-.55V8.72c0-.254.226-.543.62-.65 1.095-.3 1.977-.996 2.614-1.708.635-.71 1.064-1.475 1.238-1.978.243-.7.407-1.768.482-2.85.025-.362.36-.594.667-.518l.262.066c.16.04.258.143.288.255a8.34 8.34 0 0 1-.145 4.725.5.5 0 0 0 .595.644l.003-.001.014-.003.058-.014a9 9 0 0 1 1.036-.157c.663-.06 1.457-.054 2.11.164.175.058.45.3.57.65.107.308.087.67-.266 1.022l-.353.353.353.354c.043.043.105.141.154.315.048.167.075.37.075.581 0 .212-.027.414-.075.582-.05.174-.111.272-.154.315l-.353.353.353.354c.047.047.109.177.005.488a2.2 2.2 0 0 1-.505.805l-.353.353.353.354c.006.005.041.05.041.17a.9.9 0 0 1-.121.416c-.165.288-.503.56-1.066.56z"/></svg>"#;

pub const COMMENT_DIVIDER: &str =
    "<div class='dark:bg-neutral-700 bg-neutral-300 h-[1px] w-full'></div>";
pub const RESPONSE_DIVIDER: &str =
    "<div class='dark:bg-neutral-700 bg-neutral-300 h-[1px] w-full my-2'></div>";
pub const SOURCE_LABEL: &str = "alphaxiv.org";

/// Which body a nested response block shows.
///
/// The upstream panel has always shown the parent comment's body under each
/// response, so that stays the default. `Own` renders the response's own text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestedResponseBody {
    #[default]
    Parent,
    Own,
}

/// Removes inline `style="..."` attributes from comment HTML.
pub fn strip_inline_styles(body: &str) -> String {
    STYLE_ATTR_REGEX.replace_all(body, "").into_owned()
}

fn upvote_badge(upvotes: u64) -> String {
    if upvotes > 0 {
        format!("{THUMBS_UP_ICON}<span>{upvotes}</span>")
    } else {
        String::new()
    }
}

#[derive(Debug, Clone)]
pub struct ThreadFormatter {
    paper_page_base: String,
    nested_body: NestedResponseBody,
}

impl Default for ThreadFormatter {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_PAPER_PAGE_BASE,
            NestedResponseBody::default(),
        )
    }
}

impl ThreadFormatter {
    pub fn new(paper_page_base: impl Into<String>, nested_body: NestedResponseBody) -> Self {
        Self {
            paper_page_base: paper_page_base.into().trim_end_matches('/').to_string(),
            nested_body,
        }
    }

    pub fn from_config(config: &crate::config::RenderConfig) -> Self {
        Self::new(config.paper_page_base.clone(), config.nested_response_body)
    }

    pub fn paper_url(&self, version: &LatestVersion) -> String {
        format!("{}/{}", self.paper_page_base, version)
    }

    /// Renders the thread with a call-to-action link on top. An empty thread
    /// yields the call-to-action alone.
    pub fn format(&self, thread: &CommentThread, version: &LatestVersion, lang: Language) -> String {
        let paper_url = self.paper_url(version);
        let call_to_action = format!(
            "<div class='flex space-x-1 bg-neutral-200 dark:bg-neutral-700 rounded-md p-1 hover:bg-neutral-300 hover:dark:bg-neutral-600 hover:shadow-sm select-none cursor-pointer'><a href='{}'>{}</a></div>",
            paper_url,
            lang.post_label()
        );

        if thread.is_empty() {
            return format!("<div class='flex mt-1'>{call_to_action}</div>");
        }

        let comments = thread
            .comments
            .iter()
            .map(|comment| self.comment_block(comment, &paper_url, lang))
            .collect::<Vec<_>>()
            .join(COMMENT_DIVIDER);

        format!(
            "<div class='flex flex-col mt-1'><div class='flex'>{call_to_action}</div><div class='flex flex-col space-y-2'>{comments}</div></div>"
        )
    }

    fn comment_block(&self, comment: &Comment, paper_url: &str, lang: Language) -> String {
        let date = comment
            .date
            .as_ref()
            .map(|date| lang.format_date(date))
            .unwrap_or_default();

        let responses = comment
            .responses
            .iter()
            .map(|response| {
                let body = match self.nested_body {
                    NestedResponseBody::Parent => &comment.body,
                    NestedResponseBody::Own => &response.body,
                };
                format!(
                    "<div class='flex flex-col text-justify comment-response'><div class='flex justify-between'><div class='my-auto font-semibold'>{}</div><div class='my-auto flex space-x-1'>{}</div></div><div class='dark:text-neutral-300'><a href='{}'>{}</a></div></div>",
                    html_escape::encode_text(&response.author),
                    upvote_badge(response.upvotes),
                    paper_url,
                    strip_inline_styles(body)
                )
            })
            .collect::<Vec<_>>()
            .join(RESPONSE_DIVIDER);

        let responses_padding = if comment.responses.is_empty() { "" } else { " pt-2" };

        format!(
            "<div class='flex flex-col text-justify pr-2 py-2 comment'><div class='flex flex-col'><div class='flex justify-between'><div class='font-semibold my-auto'>{}</div><div class='my-auto flex space-x-1'>{}</div></div><div class='flex space-x-2 text-neutral-400'><div>{}</div><div>{}</div></div></div><div class='dark:text-neutral-300'><a href='{}'>{}</a></div><div class='flex flex-col pl-6{}'>{}</div></div>",
            html_escape::encode_text(&comment.display_author()),
            upvote_badge(comment.upvotes),
            SOURCE_LABEL,
            date,
            paper_url,
            strip_inline_styles(&comment.body),
            responses_padding,
            responses
        )
    }
}
