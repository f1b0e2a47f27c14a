//! HTTP transport seam for the vendor client.

use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Response};
use serde::Serialize;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Plain `reqwest` transport. Carries no request timeout: a hung call stalls
/// its batch rather than being silently retried or dropped.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: Request) -> reqwest::Result<Response> {
        self.0.execute(req).await
    }
}

/// POSTs `body` as JSON to `url` and decodes the JSON reply.
///
/// Non-2xx replies become errors carrying the status and response text.
pub async fn post_json<C: HttpClient>(
    client: &C,
    url: &str,
    body: &impl Serialize,
) -> Result<serde_json::Value> {
    let mut req = Request::new(Method::POST, url.parse()?);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        bail!("request to {url} returned status {status}: {text}");
    }

    Ok(resp.json().await?)
}
