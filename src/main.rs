use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use doc_assistant::agents::{FileUploadAgent, ReplyAgent};
use doc_assistant::chunker::Chunker;
use doc_assistant::llm::create_adapter;
use doc_assistant::utils::init_logger;
use doc_assistant::{config::Config, create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "doc-assistant", version, about = "Chat with your PDFs and spreadsheets through a local Ollama model")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web chat server (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Answer one question, optionally about a local PDF or spreadsheet
    Ask {
        #[arg(short, long)]
        file: Option<PathBuf>,
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::from_env()?;
    let _log_guard = init_logger(&config.logging)?;

    match cli.command.unwrap_or(Command::Serve { host: None, port: None }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Ask { file, question } => ask(config, file, question).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!(
        host = %config.server.host,
        port = config.server.port,
        model = %config.llm.model,
        ollama_url = %config.llm.generate_url,
        max_chunk_chars = config.chunking.max_chunk_chars,
        "Configuration loaded"
    );

    let llm = create_adapter(&config.llm)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let session_idle_secs = config.server.session_idle_secs;

    // Create shared state
    let state = AppState::new(config, llm)?;

    let reaper = (session_idle_secs > 0).then(|| {
        info!(session_idle_secs, "Idle sessions will be ended");
        state
            .sessions
            .spawn_idle_reaper(Duration::from_secs(session_idle_secs))
    });

    // Create router
    let app = create_router(state);

    // Start server
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    if let Some(reaper) = reaper {
        reaper.abort();
    }
    info!("Server stopped");
    Ok(())
}

async fn ask(config: Config, file: Option<PathBuf>, question: String) -> anyhow::Result<()> {
    let llm = create_adapter(&config.llm)?;
    let chunker = Chunker::new(config.chunking.max_chunk_chars)?;

    let context = match file {
        Some(path) => FileUploadAgent::process_path(&path).await?.text,
        None => String::new(),
    };

    let reply = ReplyAgent::answer(llm.as_ref(), &chunker, &question, &context).await?;
    println!("{}", reply.text);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
