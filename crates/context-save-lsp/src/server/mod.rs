//! The main Language Server implementation.
//!
//! # LSP Lifecycle
//!
//! 1. Editor starts our binary and sends `initialize` request
//! 2. We respond with our capabilities (text sync + one command)
//! 3. Editor sends `initialized` notification (handshake complete)
//! 4. Normal operation: document sync, configuration changes, command runs
//! 5. Editor sends `shutdown` request, we respond, then `exit` notification

mod command;
mod notify;
mod state;
mod workspace;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use context_extractor::{save_context, SaveConfig, SaveError, SavedSnapshot, CONFIG_SECTION};
use lsp_types::*;
use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::{Client, LanguageServer};

use command::{SaveRequest, SAVE_COMMAND};
use state::{lock, DocumentStore};

/// The context-save language server.
///
/// This struct holds all the state needed by the server:
/// - `client`: Used to send messages TO the editor
/// - `documents`: Open files and the active one
/// - `config`: Current `cursorContextSave` settings
pub struct ContextSaveServer {
    /// The LSP client - used to send messages TO the editor.
    client: Client,

    /// Open documents, keyed by their URI.
    documents: DocumentStore,

    /// Workspace root (captured from initialize params).
    workspace_root: Mutex<Option<PathBuf>>,

    /// Current settings.
    config: Mutex<SaveConfig>,

    /// Whether the client answers `workspace/configuration` requests.
    can_pull_configuration: AtomicBool,
}

impl ContextSaveServer {
    /// Create a new language server instance.
    pub fn new(client: Client) -> Self {
        let config = SaveConfig::from_env();
        tracing::info!(
            "Initial settings: filePath={}, contextLines={}",
            config.file_path,
            config.context_lines
        );

        Self {
            client,
            documents: DocumentStore::new(),
            workspace_root: Mutex::new(None),
            config: Mutex::new(config),
            can_pull_configuration: AtomicBool::new(false),
        }
    }

    /// Merge editor settings into the current config. Bad settings are
    /// logged and leave the config untouched.
    fn apply_settings(&self, settings: &Value, origin: &str) {
        let mut config = lock(&self.config);
        match config.apply_settings(settings) {
            Ok(true) => tracing::info!(
                "Settings updated from {}: filePath={}, contextLines={}",
                origin,
                config.file_path,
                config.context_lines
            ),
            Ok(false) => tracing::debug!("Settings from {} changed nothing", origin),
            Err(e) => tracing::warn!("Ignoring settings from {}: {}", origin, e),
        }
    }

    /// Pull the latest settings from the client, if it supports that.
    async fn refresh_config(&self) {
        if !self.can_pull_configuration.load(Ordering::Relaxed) {
            return;
        }

        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(CONFIG_SECTION.to_string()),
        }];

        match self.client.configuration(items).await {
            Ok(values) => {
                if let Some(settings) = values.first() {
                    self.apply_settings(settings, "workspace/configuration");
                }
            }
            Err(e) => tracing::warn!("workspace/configuration failed: {}", e),
        }
    }

    /// Handle `cursorContextSave.save`.
    async fn run_save(&self, arguments: &[Value]) -> Result<Option<Value>> {
        let (uri, content, selection) = match command::prepare_save(&self.documents, arguments)? {
            SaveRequest::Ready {
                uri,
                content,
                selection,
            } => (uri, content, selection),
            SaveRequest::NoActiveDocument => {
                tracing::warn!("{} with no active document", SAVE_COMMAND);
                self.report(&Err(SaveError::NoActiveDocument)).await;
                return Ok(None);
            }
        };

        self.refresh_config().await;
        let config = lock(&self.config).clone();
        let root = lock(&self.workspace_root).clone();

        tracing::debug!(
            "Saving context of {} (selection empty: {}, radius {})",
            uri,
            selection.is_empty(),
            config.context_lines
        );

        let outcome = save_context(&content, &selection, &config, root.as_deref()).await;
        self.report(&outcome).await;

        match outcome {
            Ok(saved) => Ok(Some(notify::save_result(&saved))),
            Err(e) => {
                tracing::error!("Save failed: {}", e);
                Ok(None)
            }
        }
    }

    async fn report(&self, outcome: &std::result::Result<SavedSnapshot, SaveError>) {
        let (kind, message) = notify::save_message(outcome);
        self.client.show_message(kind, message).await;
    }
}

/// Implementation of the Language Server Protocol.
impl LanguageServer for ContextSaveServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("Received initialize request");

        match workspace::workspace_root(&params) {
            Some(root) => {
                tracing::info!("Workspace root: {}", root.display());
                *lock(&self.workspace_root) = Some(root);
            }
            None => tracing::warn!("No workspace root provided by client"),
        }

        let can_pull = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|w| w.configuration)
            .unwrap_or(false);
        self.can_pull_configuration.store(can_pull, Ordering::Relaxed);

        if let Some(options) = &params.initialization_options {
            self.apply_settings(options, "initializationOptions");
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::INCREMENTAL),
                        ..Default::default()
                    },
                )),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![SAVE_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "context-save-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        tracing::info!("Server initialized - handshake complete");
        self.client
            .log_message(MessageType::INFO, "Context save server ready")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutdown requested");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        tracing::debug!("Document opened: {}", uri);

        self.documents.open(uri, &params.text_document.text, params.text_document.version);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();

        let version = params.text_document.version;
        if !self.documents.change(&uri, version, params.content_changes) {
            tracing::warn!("Change for unknown document: {}", uri);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        tracing::debug!("Document closed: {}", uri);

        self.documents.close(&uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.apply_settings(&params.settings, "didChangeConfiguration");
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        tracing::info!("Execute command: {}", params.command);

        command::ensure_known_command(&params.command)?;
        self.run_save(&params.arguments).await
    }
}
