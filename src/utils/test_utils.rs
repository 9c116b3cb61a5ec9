//! Test doubles: an in-process HTTP stub and a scriptable catalog source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::api::{
    ApiError, CatalogItem, DiscoveryResponse, HttpValidationError, PromptDetail, PromptFile,
};
use crate::core::catalog::CatalogSource;
use crate::core::config::BackendConfig;

#[derive(Clone, Debug)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Serves each `path -> response` route; unknown paths answer 404.
    pub async fn start<I, P>(routes: I) -> Self
    where
        I: IntoIterator<Item = (P, StubResponse)>,
        P: Into<String>,
    {
        let routes: Arc<HashMap<String, StubResponse>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, response)| (path.into(), response))
                .collect(),
        );
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&requests);

        let task = tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                let captured = Arc::clone(&captured);
                tokio::spawn(async move {
                    let _ = serve_connection(stream, &routes, &captured).await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            task,
        }
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig::new(self.base_url.clone())
    }

    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn hits(&self, path: &str) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|request| request.path == path)
            .count()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    routes: &HashMap<String, StubResponse>,
    captured: &Mutex<Vec<CapturedRequest>>,
) -> Result<(), String> {
    let request = read_request_head(&mut stream).await?;
    let path = request.path.clone();
    captured.lock().await.push(request);

    let response = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| StubResponse::status(404, r#"{"detail":"Not Found"}"#));
    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let reason = reqwest::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("Unknown");
    let payload = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        reason,
        response.body.len(),
        response.body
    );
    stream
        .write_all(payload.as_bytes())
        .await
        .map_err(|err| err.to_string())?;
    stream.shutdown().await.map_err(|err| err.to_string())
}

async fn read_request_head(stream: &mut TcpStream) -> Result<CapturedRequest, String> {
    let mut buffer = Vec::new();
    loop {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        if buffer.windows(4).any(|window| window == b"\r\n\r\n") {
            break;
        }
    }

    let text = String::from_utf8_lossy(&buffer);
    let mut lines = text.split("\r\n").filter(|line| !line.is_empty());
    let request_line = lines
        .next()
        .ok_or_else(|| "Missing HTTP request line".to_string())?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let headers = lines
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect();

    Ok(CapturedRequest {
        method,
        path,
        headers,
    })
}

/// Failure modes a [`FakeSource`] can be told to produce.
#[derive(Clone, Copy, Debug)]
pub enum FakeFailure {
    ServerError,
    Validation,
}

impl FakeFailure {
    fn to_error(self, endpoint: &str) -> ApiError {
        let url = format!("http://fake.test/{endpoint}");
        match self {
            FakeFailure::ServerError => ApiError::Status {
                url,
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "internal error".to_string(),
            },
            FakeFailure::Validation => ApiError::Validation {
                url,
                detail: HttpValidationError::default(),
            },
        }
    }
}

/// Scriptable in-memory [`CatalogSource`] with call counters.
pub struct FakeSource {
    prompt_files: StdMutex<Result<Vec<PromptFile>, FakeFailure>>,
    discovery: StdMutex<Result<DiscoveryResponse, FakeFailure>>,
    details: StdMutex<HashMap<String, String>>,
    detail_delay: Option<Duration>,
    pub prompt_file_calls: AtomicUsize,
    pub discovery_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            prompt_files: StdMutex::new(Ok(Vec::new())),
            discovery: StdMutex::new(Ok(DiscoveryResponse::default())),
            details: StdMutex::new(HashMap::new()),
            detail_delay: None,
            prompt_file_calls: AtomicUsize::new(0),
            discovery_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_prompt_files(self, files: Vec<PromptFile>) -> Self {
        self.set_prompt_files(Ok(files));
        self
    }

    pub fn with_discovery(
        self,
        prompts: Option<Vec<CatalogItem>>,
        tools: Option<Vec<CatalogItem>>,
    ) -> Self {
        self.set_discovery(Ok(DiscoveryResponse { prompts, tools }));
        self
    }

    pub fn with_detail(self, name: &str, content: &str) -> Self {
        self.details
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_string());
        self
    }

    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = Some(delay);
        self
    }

    pub fn set_prompt_files(&self, files: Result<Vec<PromptFile>, FakeFailure>) {
        *self.prompt_files.lock().unwrap() = files;
    }

    pub fn set_discovery(&self, discovery: Result<DiscoveryResponse, FakeFailure>) {
        *self.discovery.lock().unwrap() = discovery;
    }

    pub fn refresh_calls(&self) -> usize {
        self.discovery_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn prompt_files(&self) -> Result<Vec<PromptFile>, ApiError> {
        self.prompt_file_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.prompt_files.lock().unwrap().clone();
        reply.map_err(|failure| failure.to_error("api/prompts"))
    }

    async fn discovery(&self) -> Result<DiscoveryResponse, ApiError> {
        self.discovery_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.discovery.lock().unwrap().clone();
        reply.map_err(|failure| failure.to_error("api/mcp_info/discovery"))
    }

    async fn prompt_detail(&self, name: &str) -> Result<PromptDetail, ApiError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.detail_delay {
            tokio::time::sleep(delay).await;
        }
        let content = self.details.lock().unwrap().get(name).cloned();
        match content {
            Some(content) => Ok(PromptDetail {
                name: name.to_string(),
                content,
            }),
            None => Err(ApiError::Status {
                url: format!("http://fake.test/api/prompts/{name}"),
                status: reqwest::StatusCode::NOT_FOUND,
                body: r#"{"detail":"Prompt not found"}"#.to_string(),
            }),
        }
    }
}

pub fn catalog_item(name: &str, description: &str) -> CatalogItem {
    CatalogItem {
        name: name.to_string(),
        description: description.to_string(),
    }
}

pub fn prompt_file(name: &str, description: &str) -> PromptFile {
    PromptFile {
        name: name.to_string(),
        description: description.to_string(),
        filename: format!("{name}.md"),
    }
}
