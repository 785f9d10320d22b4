//! HTTP client for the query/ingest service.

use std::path::Path;
use std::time::Instant;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::{Error, Result, extract_detail, status_text},
    file_type::FileType,
    types::*,
};

const REQUEST_FALLBACK: &str = "API request failed";
const UPLOAD_FALLBACK: &str = "Upload failed";

/// HTTP client for the API.
///
/// Each call is one independent round trip. The client holds no mutable
/// state, so clones can be used from concurrent tasks freely.
///
/// # Example
///
/// ```rust,no_run
/// use insight_hub_sdk::Client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("http://localhost:8000")?;
///
/// let answer = client.query_with_top_k("What is the revenue?", 3).await?;
/// for citation in &answer.citations {
///     println!("{} ({:.2})", citation.source, citation.score);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    default_headers: HeaderMap,
    strict: bool,
}

impl Client {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:8000")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Create a new client with a custom reqwest client.
    ///
    /// Use this to configure timeouts, proxies or TLS; the SDK sets none.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        Self::builder(base_url).http_client(http).build()
    }

    /// Start building a client.
    pub fn builder(base_url: impl AsRef<str>) -> ClientBuilder {
        ClientBuilder {
            base_url: base_url.as_ref().to_string(),
            http: None,
            default_headers: HeaderMap::new(),
            strict: false,
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether query responses are range- and order-checked.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Health API
    // ─────────────────────────────────────────────────────────────────────────

    /// `GET /health`: indexed-content counts and service status.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.request("/health", RequestOptions::get()).await
    }

    /// `GET /status`: implementation-defined status object.
    pub async fn status(&self) -> Result<serde_json::Value> {
        self.request("/status", RequestOptions::get()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Ask a question with the default citation bound.
    pub async fn query(&self, question: impl Into<String>) -> Result<QueryResponse> {
        self.send_query(QueryRequest::new(question)).await
    }

    /// Ask a question, returning at most `top_k` citations.
    pub async fn query_with_top_k(
        &self,
        question: impl Into<String>,
        top_k: u32,
    ) -> Result<QueryResponse> {
        self.send_query(QueryRequest::new(question).with_top_k(top_k))
            .await
    }

    /// `POST /query` with a prepared request.
    ///
    /// Blank questions and a zero `top_k` fail with
    /// [`Error::InvalidRequest`] without touching the network.
    pub async fn send_query(&self, req: QueryRequest) -> Result<QueryResponse> {
        req.validate()?;
        let body = serde_json::to_value(&req)?;
        let response: QueryResponse = self
            .request("/query", RequestOptions::post(Body::Json(body)))
            .await?;

        if self.strict {
            response.verify().map_err(Error::InvalidResponse)?;
        }

        tracing::debug!(
            citations = response.citations.len(),
            confidence = response.confidence,
            "Query answered"
        );
        Ok(response)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ingest API
    // ─────────────────────────────────────────────────────────────────────────

    /// `POST /ingest`: upload a file for extraction and indexing.
    ///
    /// Partial uploads are never retried.
    pub async fn ingest(&self, req: IngestRequest) -> Result<IngestResponse> {
        req.validate()?;

        let mime = mime_guess::from_path(&req.filename).first_or_octet_stream();
        let size = req.bytes.len();
        let part = Part::bytes(req.bytes)
            .file_name(req.filename.clone())
            .mime_str(mime.as_ref())
            .map_err(|e| Error::invalid_request(format!("invalid content type {mime}: {e}")))?;

        let mut form = Form::new().part("file", part);
        if let Some(file_type) = req.file_type {
            form = form.text("file_type", file_type.as_str());
        }

        tracing::debug!(
            filename = %req.filename,
            size,
            file_type = req.file_type.map(FileType::as_str),
            "Uploading file"
        );

        self.execute(
            "/ingest",
            RequestOptions::post(Body::Multipart(form)),
            UPLOAD_FALLBACK,
        )
        .await
    }

    /// Read `path` from disk and ingest it.
    pub async fn ingest_path(
        &self,
        path: impl AsRef<Path>,
        file_type: Option<FileType>,
    ) -> Result<IngestResponse> {
        let mut req = IngestRequest::from_path(path).await?;
        req.file_type = file_type;
        self.ingest(req).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────────────────────

    /// Perform one round trip against `path` and decode the JSON body.
    ///
    /// Non-2xx responses become [`Error::Server`] carrying the body's
    /// `detail` field, or the status text when the body has none.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.execute(path, options, REQUEST_FALLBACK).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
        fallback: &str,
    ) -> Result<T> {
        let url = self.url(path)?;
        let RequestOptions {
            method,
            body,
            headers,
        } = options;
        let headers = self.merged_headers(&body, headers);

        tracing::debug!(%method, %url, "Sending request");
        let started = Instant::now();

        let mut rb = self.http.request(method.clone(), url.clone()).headers(headers);
        rb = match body {
            Body::Empty => rb,
            Body::Json(value) => rb.json(&value),
            Body::Multipart(form) => rb.multipart(form),
        };

        let response = rb.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::debug!(
            %method,
            %url,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Received response"
        );

        if !status.is_success() {
            let detail = extract_detail(&bytes)
                .unwrap_or_else(|| format!("{fallback}: {}", status_text(status)));
            tracing::warn!(status = status.as_u16(), %detail, "Request rejected");
            return Err(Error::Server {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// JSON content type, then client defaults, then per-call headers.
    fn merged_headers(&self, body: &Body, overrides: HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.default_headers {
            headers.insert(name.clone(), value.clone());
        }
        for (name, value) in &overrides {
            headers.insert(name.clone(), value.clone());
        }
        // reqwest supplies the boundary-bearing content type for forms.
        if matches!(body, Body::Multipart(_)) {
            headers.remove(CONTENT_TYPE);
        }
        headers
    }
}

/// Builder for [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    http: Option<reqwest::Client>,
    default_headers: HeaderMap,
    strict: bool,
}

impl ClientBuilder {
    /// Use a preconfigured reqwest client.
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Send `name: value` on every request unless a call overrides it.
    #[must_use]
    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Reject query responses with out-of-range scores or unsorted citations.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = Url::parse(&self.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::invalid_request(format!(
                "base URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }
        Ok(Client {
            base_url,
            http: self.http.unwrap_or_default(),
            default_headers: self.default_headers,
            strict: self.strict,
        })
    }
}

/// Body of a single request.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

/// Per-call options for [`Client::request`].
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Body,
    /// Headers that win over the client defaults.
    ///
    /// `Content-Type` is ignored for [`Body::Multipart`], where reqwest
    /// sets it with the form boundary.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Body) -> Self {
        Self {
            method: Method::POST,
            body,
            headers: HeaderMap::new(),
        }
    }

    /// Add or replace a header for this call.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, AUTHORIZATION};

    #[test]
    fn test_client_creation() {
        let client = Client::new("http://localhost:8000").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
        assert!(!client.is_strict());
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(Client::new("not a url"), Err(Error::InvalidUrl(_))));
        assert!(Client::new("ftp://example.com").unwrap_err().is_invalid_request());
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = Client::new("http://example.com/api/v1/").unwrap();
        assert_eq!(
            client.url("/query").unwrap().as_str(),
            "http://example.com/api/v1/query"
        );
        let client = Client::new("http://example.com:8000").unwrap();
        assert_eq!(
            client.url("health").unwrap().as_str(),
            "http://example.com:8000/health"
        );
    }

    #[test]
    fn test_caller_headers_win() {
        let client = Client::builder("http://localhost:8000")
            .default_header(AUTHORIZATION, HeaderValue::from_static("Bearer default"))
            .build()
            .unwrap();

        let mut overrides = HeaderMap::new();
        overrides.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        overrides.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let headers = client.merged_headers(&Body::Empty, overrides);
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers[AUTHORIZATION], "Bearer default");
        assert_eq!(headers[ACCEPT], "application/json");
    }

    #[test]
    fn test_default_json_content_type() {
        let client = Client::new("http://localhost:8000").unwrap();
        let headers = client.merged_headers(&Body::Empty, HeaderMap::new());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_multipart_drops_content_type() {
        let client = Client::new("http://localhost:8000").unwrap();
        let mut overrides = HeaderMap::new();
        overrides.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        overrides.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let headers = client.merged_headers(&Body::Multipart(Form::new()), overrides);
        assert!(!headers.contains_key(CONTENT_TYPE));
        assert_eq!(headers[ACCEPT], "application/json");
    }
}
