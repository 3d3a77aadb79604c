use crate::config::HttpConfig;
use crate::domain::ports::HttpClient;
use crate::utils::error::{CommentsError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

/// reqwest-backed HTTP collaborator: fixed timeout, no response cache, a
/// bounded number of attempts on transport failures.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    attempts: u32,
}

impl ReqwestHttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            attempts: config.attempts.max(1),
        })
    }

    async fn send(&self, url: &str, build: impl Fn() -> RequestBuilder) -> Result<String> {
        let mut attempt = 1;
        loop {
            match build().send().await {
                Ok(response) => return Self::read_body(url, response).await,
                Err(e) if attempt < self.attempts => {
                    tracing::warn!("Request to {} failed (attempt {}/{}): {}", url, attempt, self.attempts, e);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn read_body(url: &str, response: Response) -> Result<String> {
        let status = response.status();
        tracing::debug!("HTTP {} from {}", status, url);

        if status == StatusCode::NOT_FOUND {
            return Err(CommentsError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CommentsError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<String> {
        self.send(url, || self.client.get(url)).await
    }

    async fn post_json(&self, url: &str, payload: &serde_json::Value) -> Result<String> {
        self.send(url, || self.client.post(url).json(payload)).await
    }
}
