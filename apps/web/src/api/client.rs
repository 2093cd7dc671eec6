//! HTTP API Client

use async_trait::async_trait;
use browser_ui_core::{ApiPaths, BrowserApi, Error, Result, SessionSummary, VncSettings};
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

/// API client for backend communication
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    paths: ApiPaths,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(paths: ApiPaths) -> Self {
        // Get base URL from window location or use default
        let base_url = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        Self { base_url, paths }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        if !response.ok() {
            return Err(Error::Status {
                path: path.to_string(),
                status: response.status(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl BrowserApi for ApiClient {
    async fn list_browsers(&self) -> Result<Vec<SessionSummary>> {
        self.get(&self.paths.browsers()).await
    }

    async fn get_browser(&self, browser_id: &str) -> Result<SessionSummary> {
        self.get(&self.paths.browser(browser_id)).await
    }

    async fn vnc_settings(&self, browser_id: &str) -> Result<VncSettings> {
        self.get(&self.paths.vnc_settings(browser_id)).await
    }
}
