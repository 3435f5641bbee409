//! {{APP_NAME}}: a small chat relay in front of the Anthropic Messages API.
//!
//! `GET /` serves the chat page, `POST /api/chat` relays one turn. Each
//! conversation keeps its last [`MAX_HISTORY`] messages in process memory.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use dashmap::DashMap;
use envconfig::Envconfig;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

const APP_NAME: &str = "{{APP_NAME}}";
const MAX_HISTORY: usize = 20;
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Envconfig, Clone, Debug)]
pub struct ChatConfig {
    #[envconfig(from = "PORT", default = "3000")]
    pub port: u16,

    #[envconfig(from = "ANTHROPIC_API_KEY")]
    pub api_key: Option<String>,

    #[envconfig(from = "ANTHROPIC_BASE_URL", default = "https://api.anthropic.com/v1")]
    pub base_url: String,

    #[envconfig(from = "ANTHROPIC_MODEL", default = "claude-sonnet-4-20250514")]
    pub model: String,

    #[envconfig(from = "ANTHROPIC_MAX_TOKENS", default = "4096")]
    pub max_tokens: u32,

    #[envconfig(from = "ANTHROPIC_TIMEOUT", default = "120")]
    pub timeout_seconds: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum ChatError {
    #[error("message is required")]
    EmptyMessage,

    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("completion returned no text")]
    EmptyReply,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Keeps only the newest `MAX_HISTORY` entries, oldest first.
pub fn truncate_history(history: &mut Vec<ChatMessage>) {
    if history.len() > MAX_HISTORY {
        let excess = history.len() - MAX_HISTORY;
        history.drain(..excess);
    }
}

/// Millisecond timestamp; two conversations started in the same
/// millisecond share an id.
pub fn new_conversation_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// In-memory conversation histories. Nothing is evicted or persisted.
#[derive(Default)]
pub struct ConversationStore {
    conversations: DashMap<String, Vec<ChatMessage>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self, id: &str) -> Vec<ChatMessage> {
        self.conversations
            .get(id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn save(&self, id: &str, mut history: Vec<ChatMessage>) {
        truncate_history(&mut history);
        self.conversations.insert(id.to_string(), history);
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl Completion for AnthropicClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages,
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "Request failed".to_string());
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or(ChatError::EmptyReply)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConversationStore>,
    pub completion: Arc<dyn Completion>,
}

impl AppState {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self {
            store: Arc::new(ConversationStore::new()),
            completion,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": APP_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatError> {
    let message = request.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    let conversation_id = request
        .conversation_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(new_conversation_id);

    // The stored history is not locked across the upstream call; concurrent
    // turns on one conversation can overwrite each other.
    let mut history = state.store.history(&conversation_id);
    history.push(ChatMessage::user(message));

    let reply = state.completion.complete(&history).await.map_err(|e| {
        error!(conversation = %conversation_id, "completion failed: {}", e);
        e
    })?;

    history.push(ChatMessage::assistant(reply.clone()));
    state.store.save(&conversation_id, history);
    info!(conversation = %conversation_id, "chat turn completed");

    Ok(Json(ChatResponse {
        response: reply,
        conversation_id,
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ChatConfig::init_from_env()?;
    if config.api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; chat requests will fail");
    }

    let completion = Arc::new(AnthropicClient::new(&config)?);
    let app = build_router(AppState::new(completion));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("{} running on port {}", APP_NAME, config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{APP_NAME}}</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: -apple-system, BlinkMacSystemFont, sans-serif; background: #0f172a; color: #f1f5f9; height: 100vh; overflow: hidden; }
        .app { display: flex; flex-direction: column; height: 100vh; }
        .header { background: #1e293b; border-bottom: 1px solid #334155; padding: 12px 16px; }
        .header h1 { font-size: 18px; font-weight: 600; }
        .chat { flex: 1; overflow-y: auto; padding: 16px; }
        .welcome { background: #1e293b; border-radius: 12px; padding: 24px; border: 1px solid #334155; }
        .message { margin-bottom: 16px; display: flex; }
        .message-user { justify-content: flex-end; }
        .message-assistant { justify-content: flex-start; }
        .message-content { max-width: 85%; padding: 12px 16px; border-radius: 16px; white-space: pre-wrap; word-wrap: break-word; }
        .message-user .message-content { background: #6366f1; color: white; }
        .message-assistant .message-content { background: #1e293b; border: 1px solid #334155; }
        .input-area { background: #1e293b; border-top: 1px solid #334155; padding: 12px 16px; }
        .input-row { display: flex; gap: 8px; }
        #msg { flex: 1; background: #334155; border: 1px solid #334155; color: #f1f5f9; padding: 10px 12px; border-radius: 12px; font-size: 16px; resize: none; font-family: inherit; }
        #send { background: #6366f1; color: white; border: none; padding: 10px 16px; border-radius: 12px; cursor: pointer; }
        #send:disabled { background: #334155; }
    </style>
</head>
<body>
    <div class="app">
        <div class="header"><h1>🤖 {{APP_NAME}}</h1></div>
        <div id="chat" class="chat">
            <div class="welcome"><h2>👋 Welcome!</h2><p>I'm Claude, here to help!</p></div>
        </div>
        <div class="input-area">
            <div class="input-row">
                <textarea id="msg" placeholder="Ask me anything..." rows="1"></textarea>
                <button id="send">➤</button>
            </div>
        </div>
    </div>
    <script>
        let convId = null;
        const chat = document.getElementById('chat');
        const msg = document.getElementById('msg');
        const send = document.getElementById('send');

        function addMsg(role, content) {
            const row = document.createElement('div');
            row.className = 'message message-' + role;
            const bubble = document.createElement('div');
            bubble.className = 'message-content';
            bubble.textContent = content;
            row.appendChild(bubble);
            chat.appendChild(row);
            chat.scrollTop = chat.scrollHeight;
        }

        send.onclick = async () => {
            const text = msg.value.trim();
            if (!text) return;
            addMsg('user', text);
            msg.value = '';
            send.disabled = true;
            try {
                const res = await fetch('/api/chat', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ message: text, conversationId: convId })
                });
                const data = await res.json();
                if (!res.ok) throw new Error(data.error || res.statusText);
                convId = data.conversationId;
                addMsg('assistant', data.response);
            } catch (e) {
                addMsg('assistant', '❌ Error: ' + e.message);
            } finally {
                send.disabled = false;
            }
        };

        msg.onkeydown = (e) => {
            if (e.key === 'Enter' && !e.shiftKey) {
                e.preventDefault();
                send.click();
            }
        };
    </script>
</body>
</html>
"##;
