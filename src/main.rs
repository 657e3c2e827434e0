//! AgentForge - command-line LLM assistant.
//!
//! Main entry point for the AgentForge CLI.

mod cli;
mod cmd_chat;
mod cmd_history;
mod cmd_translate;
mod ui;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use agentforge_config::{Config, ConfigLoader};
use agentforge_core::{PromptRenderer, ProviderKind, create_provider};
use agentforge_history_sqlite::SqliteHistoryStore;
use agentforge_protocols::{HistoryStore, LlmProvider};
use agentforge_transport::HttpTransport;

use cli::{Cli, Commands};
use cmd_chat::{ChatAction, ChatSession, handle_chat_query};
use cmd_history::{HistoryAction, handle_history_command};
use cmd_translate::handle_translate_command;
use ui::{ChatInput, ChatStyle, INPUT_HISTORY_FILE, InputHistory, TerminalInput};

/// Get the .agentforge directory path.
fn agentforge_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".agentforge"))
        .unwrap_or_else(|| PathBuf::from(".agentforge"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.agentforge/logs/ with daily rotation. The
/// console only shows warnings unless `RUST_LOG` says otherwise, so that
/// streamed answers on stdout stay readable.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = agentforge_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("agentforge")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the whole process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Services shared by the subcommands, built on demand.
struct App {
    config: Config,
    provider_kind: Option<ProviderKind>,
}

impl App {
    fn provider(&self) -> Result<Arc<dyn LlmProvider>, Box<dyn std::error::Error>> {
        let transport = HttpTransport::from_config(&self.config.http)?;
        Ok(create_provider(&self.config, self.provider_kind, transport)?)
    }

    async fn store(&self) -> Result<Arc<SqliteHistoryStore>, Box<dyn std::error::Error>> {
        let path = self.config.history.resolved_path();
        debug!("History database: {}", path.display());
        Ok(Arc::new(SqliteHistoryStore::open(path).await?))
    }

    fn prompts(&self) -> PromptRenderer {
        let dir = self
            .config
            .prompts
            .dir
            .as_ref()
            .map(|d| PathBuf::from(ConfigLoader::expand_path(&d.to_string_lossy())));
        PromptRenderer::new(dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(ConfigLoader::default_path);
    let config = ConfigLoader::load_or_default(&config_path)?;
    info!("Configuration loaded from {}", config_path.display());

    let app = App {
        config,
        provider_kind: cli.provider,
    };

    match cli.command {
        Commands::Chat {
            system,
            list,
            date,
            summary,
        } => {
            let store = app.store().await?;
            match ChatAction::from_flags(list, date, summary) {
                ChatAction::Interactive => {
                    let provider = app.provider()?;
                    let interactive =
                        std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
                    let style = if interactive {
                        ChatStyle::ansi()
                    } else {
                        ChatStyle::plain()
                    };
                    let input = if interactive {
                        let history = InputHistory::load(agentforge_dir().join(INPUT_HISTORY_FILE));
                        ChatInput::Terminal(TerminalInput::new(style, history))
                    } else {
                        ChatInput::lines(tokio::io::BufReader::new(tokio::io::stdin()))
                    };
                    let mut session =
                        ChatSession::start(provider.as_ref(), store.as_ref(), system)
                            .await?
                            .with_style(style);
                    session.run(input, &mut std::io::stdout()).await
                }
                action => handle_chat_query(action, store.as_ref()).await,
            }
        }
        Commands::History {
            list: _,
            date,
            count,
            summary,
            all_summaries,
        } => {
            let store: Arc<dyn HistoryStore> = app.store().await?;
            let action = HistoryAction::from_flags(date, count, summary, all_summaries);
            handle_history_command(action, store, || app.provider()).await
        }
        Commands::Translate { target, text } => {
            let provider = app.provider()?;
            handle_translate_command(
                provider.as_ref(),
                &app.prompts(),
                target,
                &text,
                &mut std::io::stdout(),
            )
            .await
            .map(|_| ())
        }
    }
}
