#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use paper_comments::config::CommentsConfig;

pub const PAPER_ID: &str = "2406.07394";
pub const VERSION: &str = "2406.07394v3";

/// Config pointing discovery at the mock server, with the endpoint pattern
/// matching the mock server's own `/default` base.
pub fn config_for(server: &MockServer) -> CommentsConfig {
    let mut config = CommentsConfig::default();
    config.discovery.site_url = format!("{}/", server.base_url());
    config.discovery.endpoint_pattern = format!("{}/default", regex::escape(&server.base_url()));
    config
}

pub fn api_base(server: &MockServer) -> String {
    format!("{}/default", server.base_url())
}

pub struct SiteMocks<'a> {
    pub root: Mock<'a>,
    pub vendor_script: Mock<'a>,
    pub app_script: Mock<'a>,
}

/// Root page with an unrelated script, a bundle without the endpoint and a
/// bundle that embeds it.
pub async fn mock_site(server: &MockServer) -> SiteMocks<'_> {
    let html = r#"<html><head>
<script src="https://cdn.example.com/analytics.js"></script>
<script src="/_next/static/chunks/vendor-aaa.js" async></script>
<script src="/_next/static/chunks/app-bbb.js" async></script>
</head><body></body></html>"#;

    let root = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).header("content-type", "text/html").body(html);
        })
        .await;

    let vendor_script = server
        .mock_async(|when, then| {
            when.method(GET).path("/_next/static/chunks/vendor-aaa.js");
            then.status(200).body("(()=>{console.log('vendor')})();");
        })
        .await;

    let bundle = format!(
        "const e={{api:\"{}/default\",fallback:\"{}/default\"}};",
        server.base_url(),
        "https://stale.example.com"
    );
    let app_script = server
        .mock_async(|when, then| {
            when.method(GET).path("/_next/static/chunks/app-bbb.js");
            then.status(200).body(bundle);
        })
        .await;

    SiteMocks {
        root,
        vendor_script,
        app_script,
    }
}

pub async fn mock_latest_version<'a>(server: &'a MockServer, id: &str, version: &str) -> Mock<'a> {
    let path = format!("/default/papers/latestversion/{}", id);
    let version = version.to_string();
    server
        .mock_async(|when, then| {
            when.method(GET).path(path);
            then.status(200).json_body(serde_json::json!({ "version": version }));
        })
        .await
}

pub async fn mock_questions<'a>(
    server: &'a MockServer,
    version: &str,
    bodyarr: serde_json::Value,
) -> Mock<'a> {
    let path = format!("/default/papers/questions/{}/true", version);
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(path)
                .json_body(serde_json::json!({ "tags": null }));
            then.status(200).json_body(serde_json::json!({ "bodyarr": bodyarr }));
        })
        .await
}
