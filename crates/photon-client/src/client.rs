//! Main client implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use photon_session::{Cookie, SessionManager};
use photon_types::GenerationItem;

use crate::error::{Error, Result};

/// Vendor API base used when neither the builder nor `LUMA_API_BASE` says
/// otherwise.
pub const DEFAULT_API_BASE: &str = "https://internal-api.virginia.labs.lumalabs.ai";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent matching the browser profile the vendor expects.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Client for the vendor's generation endpoints.
///
/// Cheap to clone; all clones share the HTTP connection pool and session.
#[derive(Clone)]
pub struct LumaClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    /// HTTP client carrying the fixed browser-like header set.
    http: reqwest::Client,
    /// Vendor API base URL.
    base_url: Url,
    /// Cookie session, consulted and updated on every call.
    session: Arc<SessionManager>,
    /// Request timeout.
    timeout: Duration,
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/response payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters for submitting a generation.
#[derive(Debug, Clone)]
pub struct GenerateParams {
    /// The user prompt.
    pub prompt: String,
    /// Optional image the video should start from.
    pub start_image: Option<PathBuf>,
    /// Optional image the video should end on.
    pub end_image: Option<PathBuf>,
    /// Aspect ratio, vendor format (e.g. "16:9").
    pub aspect_ratio: String,
    /// Let the vendor rewrite/expand the prompt.
    pub expand_prompt: bool,
}

impl GenerateParams {
    /// Create params with the vendor's defaults (16:9, no expansion).
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            start_image: None,
            end_image: None,
            aspect_ratio: "16:9".to_string(),
            expand_prompt: false,
        }
    }

    /// Set the starting image.
    pub fn with_start_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.start_image = Some(path.into());
        self
    }

    /// Set the ending image.
    pub fn with_end_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.end_image = Some(path.into());
        self
    }

    /// Set the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = ratio.into();
        self
    }

    /// Enable or disable prompt expansion.
    pub fn with_expand_prompt(mut self, expand: bool) -> Self {
        self.expand_prompt = expand;
        self
    }
}

/// Wire payload for the generation POST.
#[derive(Debug, Serialize)]
struct GeneratePayload<'a> {
    user_prompt: &'a str,
    aspect_ratio: &'a str,
    expand_prompt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_end_url: Option<String>,
}

/// Response to a generation POST: an array of created jobs.
#[derive(Debug, Deserialize)]
struct CreatedGeneration {
    id: String,
}

/// Response to a signed-upload request.
#[derive(Debug, Deserialize)]
struct SignedUpload {
    presigned_url: String,
    public_url: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

impl LumaClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The vendor API base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.inner.session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List the user's generations in vendor order.
    pub async fn list_generations(&self, offset: u32, limit: u32) -> Result<Vec<GenerationItem>> {
        let mut url = self.url("api/photon/v1/user/generations/")?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());

        debug!(url = %url, "Listing generations");
        let response = self.dispatch(self.inner.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Submit a generation job; returns the vendor-assigned job id.
    ///
    /// Start/end images, if given, are uploaded first and referenced by
    /// their public URLs in the job payload.
    pub async fn generate(&self, params: &GenerateParams) -> Result<String> {
        let image_url = match &params.start_image {
            Some(path) => Some(self.upload_image(path).await?),
            None => None,
        };
        let image_end_url = match &params.end_image {
            Some(path) => Some(self.upload_image(path).await?),
            None => None,
        };

        let payload = GeneratePayload {
            user_prompt: &params.prompt,
            aspect_ratio: &params.aspect_ratio,
            expand_prompt: params.expand_prompt,
            image_url,
            image_end_url,
        };

        let url = self.url("api/photon/v1/generations/")?;
        info!(url = %url, prompt = %params.prompt, "Submitting generation");
        let response = self
            .dispatch(self.inner.http.post(url).json(&payload))
            .await?;

        let created: Vec<CreatedGeneration> = response.json().await?;
        let first = created.into_iter().next().ok_or_else(|| {
            Error::UnexpectedResponse("generation response contained no jobs".to_string())
        })?;
        Ok(first.id)
    }

    /// Upload a local image and return its public URL.
    ///
    /// The vendor hands out a presigned URL; the file bytes go there with a
    /// raw PUT that carries no session state.
    pub async fn upload_image(&self, path: &Path) -> Result<String> {
        let filename = upload_filename(path);
        let mut url = self.url("api/photon/v1/generations/file_upload")?;
        url.query_pairs_mut()
            .append_pair("file_type", "image")
            .append_pair("filename", &filename);

        debug!(url = %url, filename = %filename, "Requesting signed upload");
        let response = self.dispatch(self.inner.http.post(url)).await?;
        let signed: SignedUpload = response.json().await?;

        let bytes = tokio::fs::read(path).await?;
        let put = self
            .inner
            .http
            .put(&signed.presigned_url)
            .header(CONTENT_TYPE, guess_image_content_type(path))
            .body(bytes)
            .timeout(self.inner.timeout)
            .send()
            .await?;

        if put.status() != reqwest::StatusCode::OK {
            return Err(Error::Upload {
                status: put.status().as_u16(),
            });
        }

        Ok(signed.public_url)
    }

    /// Fetch the subscription usage summary.
    ///
    /// The vendor's schema here is undocumented and shifts; returned raw.
    pub async fn usage(&self) -> Result<serde_json::Value> {
        let url = self.url("api/photon/v1/subscription/usage")?;
        let response = self.dispatch(self.inner.http.get(url)).await?;
        Ok(response.json().await?)
    }

    /// Probe whether the session is accepted by the vendor.
    ///
    /// An auth failure maps to `false`; any other failure propagates.
    pub async fn is_logged_in(&self) -> Result<bool> {
        match self.list_generations(0, 1).await {
            Ok(_) => Ok(true),
            Err(Error::AuthRequired) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP plumbing
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for a vendor API path.
    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Attach the session cookie header, send, absorb response cookies,
    /// then interpret the status.
    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .header(COOKIE, self.inner.session.cookie_header())
            .timeout(self.inner.timeout)
            .send()
            .await?;

        // Cookies rotate on every response, including failures, and must be
        // kept or the session goes stale.
        self.absorb_cookies(&response)?;
        self.interpret_status(response).await
    }

    /// Merge Set-Cookie values from a response into the session.
    fn absorb_cookies(&self, response: &reqwest::Response) -> Result<()> {
        let default_domain = self.inner.base_url.host_str().unwrap_or_default();
        let observed: Vec<Cookie> = response
            .cookies()
            .map(|c| {
                let mut cookie = Cookie::new(
                    c.name(),
                    c.value(),
                    c.domain().unwrap_or(default_domain),
                    c.path().unwrap_or("/"),
                );
                cookie.secure = c.secure();
                cookie.http_only = c.http_only();
                cookie
            })
            .collect();

        if observed.is_empty() {
            return Ok(());
        }
        Ok(self.inner.session.merge(observed)?)
    }

    /// Map a non-2xx response to a domain error.
    async fn interpret_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => {
                info!(body = %truncate(&body, 256), "Vendor rejected session");
                Err(Error::AuthRequired)
            }
            429 => {
                info!(body = %truncate(&body, 256), "Rate limited, dropping access token");
                self.inner.session.remove_access_token()?;
                Err(Error::RateLimited)
            }
            code => {
                info!(status = code, body = %truncate(&body, 1024), "Vendor API error");
                Err(Error::Api { status: code, body })
            }
        }
    }
}

impl std::fmt::Debug for LumaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LumaClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating a [`LumaClient`].
pub struct ClientBuilder {
    base_url: Option<String>,
    session: Option<Arc<SessionManager>>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            session: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the vendor API base URL (otherwise `LUMA_API_BASE` or the
    /// built-in default).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session the client authenticates with.
    pub fn session(mut self, session: Arc<SessionManager>) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<LumaClient> {
        let base = self
            .base_url
            .or_else(|| std::env::var("LUMA_API_BASE").ok())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        // Normalize so Url::join keeps the full path.
        let mut base_url = Url::parse(&base)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let session = self
            .session
            .unwrap_or_else(|| Arc::new(SessionManager::in_memory()));

        let http = reqwest::Client::builder()
            .default_headers(browser_headers())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(LumaClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                session,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// The fixed header set the vendor's web app sends.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let pairs: &[(&str, &str)] = &[
        ("accept", "*/*"),
        ("accept-language", "en-US,en;q=0.9"),
        (
            "sec-ch-ua",
            "\"Not A(Brand\";v=\"99\", \"Google Chrome\";v=\"121\", \"Chromium\";v=\"121\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Windows\""),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-origin"),
        ("origin", "https://lumalabs.ai"),
        ("referer", "https://lumalabs.ai"),
    ];
    for (name, value) in pairs {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

/// Filename to report for an upload: basename with spaces flattened.
fn upload_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().replace(' ', "_"))
        .unwrap_or_else(|| "upload".to_string())
}

/// Guess an image content type from the file extension.
fn guess_image_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("https://api.example.com")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "https://api.example.com/");
    }

    #[test]
    fn test_url_building_keeps_vendor_path() {
        let client = ClientBuilder::new()
            .base_url("https://api.example.com")
            .build()
            .unwrap();

        let url = client.url("api/photon/v1/user/generations/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/api/photon/v1/user/generations/"
        );
    }

    #[test]
    fn test_upload_filename_flattens_spaces() {
        assert_eq!(
            upload_filename(Path::new("/tmp/my cat photo.jpg")),
            "my_cat_photo.jpg"
        );
    }

    #[test]
    fn test_guess_content_type_defaults_to_jpeg() {
        assert_eq!(guess_image_content_type(Path::new("a.png")), "image/png");
        assert_eq!(guess_image_content_type(Path::new("a.bin")), "image/jpeg");
        assert_eq!(guess_image_content_type(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_generate_payload_skips_absent_images() {
        let payload = GeneratePayload {
            user_prompt: "a cat",
            aspect_ratio: "16:9",
            expand_prompt: false,
            image_url: None,
            image_end_url: None,
        };
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("image_url").is_none());
        assert!(json.get("image_end_url").is_none());
        assert_eq!(json["user_prompt"], "a cat");
    }
}
