//! Client for the synchronous request/response endpoint.
//!
//! The backend exposes `POST /query` next to the streaming channel: one
//! `{"query": ...}` body in, one `{"query", "response", "status"}` body
//! out, no intermediate transcript. Useful for scripting and for callers
//! that do not want to hold a channel open.

use crate::error::ClientError;
use hunter_core::event::{QueryRequest, QueryResponse};
use reqwest::header::HeaderMap;
use reqwest::{Client as HttpClient, Url};

pub struct QueryClient {
    http_client: HttpClient,
    base_url: Url,
    header_map: HeaderMap,
}

impl QueryClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_headers(base_url, HeaderMap::new())
    }

    pub fn with_headers(base_url: Url, header_map: impl Into<HeaderMap>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
            header_map: header_map.into(),
        }
    }

    /// Run one query to completion and return the final response body.
    pub async fn query(&self, query: impl Into<String>) -> Result<QueryResponse, ClientError> {
        let request = QueryRequest::new(query);
        let response = self
            .http_client
            .post(self.base_url.clone())
            .headers(self.header_map.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<QueryResponse>()
            .await?;
        Ok(response)
    }
}
