//! Context Save LSP - saves the selection or the lines around the cursor
//!
//! # How this works
//!
//! 1. This binary is started by the editor (e.g., VS Code, Neovim, Helix)
//! 2. Communication happens over stdin/stdout using JSON-RPC
//! 3. The editor keeps us in sync with open documents (didOpen/didChange)
//! 4. The user runs `cursorContextSave.save`; the editor forwards it as
//!    `workspace/executeCommand` with the cursor/selection as argument
//! 5. We write the text to the configured file and report back with
//!    `window/showMessage`
//!
//! # Why we use stderr for logging
//!
//! Since stdin/stdout are used for the LSP protocol, we CANNOT use
//! println!() for debugging. Instead, we use the `tracing` crate
//! which writes to stderr.

mod server;

use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug to see debug messages
    // Example: RUST_LOG=context_save_lsp=debug,context_extractor=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr) // stdout carries the protocol
        .with_ansi(false)
        .init();

    tracing::info!("Starting context-save-lsp server");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    // The Client handed to the closure is how we talk back to the editor
    let (service, socket) = LspService::build(server::ContextSaveServer::new).finish();

    Server::new(stdin, stdout, socket).serve(service).await;

    tracing::info!("context-save-lsp server stopped");
}
