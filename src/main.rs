//! Legal LLM observability demo
//!
//! Runs the canned question batch, a single question, or the HTTP surface

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use legal_llmobs::demo::{render_header, render_result, run_demo};
use legal_llmobs::utils::logging::init_logging;
use legal_llmobs::{router_with_state, AppState, ConsultaPipeline, Query, Settings};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How long the CLI waits for annotation delivery before exiting
const SINK_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "legal-llmobs", version, about = "Legal Q&A with LLM self-evaluation and observability annotations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the four demo questions in order
    Demo,
    /// Ask a single question
    Ask {
        /// The legal question
        question: String,
        #[arg(long, default_value = legal_llmobs::models::DEFAULT_USER_TYPE)]
        user_type: String,
        #[arg(long, default_value = legal_llmobs::models::DEFAULT_SESSION_ID)]
        session_id: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve POST /v1/consultas over HTTP
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::new().context("Failed to load settings")?;
    init_logging(&settings.logging)?;
    info!("{}", legal_llmobs::version_info());

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => {
            let pipeline = ConsultaPipeline::from_settings(&settings)?;
            let outcome = run_demo(&pipeline, |i, query, result| {
                println!("{}", render_header(i, &query.text));
                println!("{}", render_result(result));
            })
            .await;

            // Annotations of the queries that completed still go out
            pipeline.flush(SINK_FLUSH_TIMEOUT).await;
            outcome?;
        }
        Command::Ask {
            question,
            user_type,
            session_id,
            json,
        } => {
            let pipeline = ConsultaPipeline::from_settings(&settings)?;
            let query = Query::new(question)
                .with_user_type(user_type)
                .with_session_id(session_id);
            let outcome = pipeline.consulta_legal(&query).await;
            pipeline.flush(SINK_FLUSH_TIMEOUT).await;
            let result = outcome?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render_header(1, &query.text));
                println!("{}", render_result(&result));
            }
        }
        Command::Serve => {
            let addr = settings.listen_addr();
            let pipeline = Arc::new(ConsultaPipeline::from_settings(&settings)?);
            let app = router_with_state(AppState::new(settings, pipeline.clone()));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            info!("🚀 legal-llmobs server started!");
            info!("📝 Health check: http://{}/health", addr);
            info!("⚖️  Consultations: http://{}/v1/consultas", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

            pipeline.flush(SINK_FLUSH_TIMEOUT).await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down, draining annotations");
}
