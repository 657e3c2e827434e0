//! CLI definitions for AgentForge.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use agentforge_core::ProviderKind;

pub(crate) const DEFAULT_CHAT_SYSTEM: &str =
    "你是一个知识问答助手，请根据用户的问题提供准确、有用的回答。";

/// AgentForge CLI.
#[derive(Parser)]
#[command(name = "agentforge")]
#[command(about = "Command-line LLM assistant")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.agentforge/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// LLM provider (claude, openai); overrides llm.provider
    #[arg(short, long, global = true)]
    pub provider: Option<ProviderKind>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Interactive chat
    Chat {
        /// System prompt
        #[arg(long, default_value = DEFAULT_CHAT_SYSTEM)]
        system: String,

        /// Show the 20 most recent messages
        #[arg(long)]
        list: bool,

        /// Show messages of a day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Show today's summary
        #[arg(long)]
        summary: bool,
    },

    /// Chat history management
    History {
        /// Show the 50 most recent messages (default)
        #[arg(long)]
        list: bool,

        /// Show messages of a day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Show message counts
        #[arg(long)]
        count: bool,

        /// Generate today's summary
        #[arg(long)]
        summary: bool,

        /// Show all daily summaries
        #[arg(long)]
        all_summaries: bool,
    },

    /// Translate text
    Translate {
        /// Target language
        #[arg(short, long, value_enum, default_value_t = TargetLang::En)]
        target: TargetLang,

        /// Text to translate
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TargetLang {
    /// English
    En,
    /// Chinese
    Zh,
}

impl TargetLang {
    /// `(role, lang)` values for the translator prompt.
    pub fn prompt_vars(&self) -> (&'static str, &'static str) {
        match self {
            TargetLang::En => ("英语翻译专家", "英文"),
            TargetLang::Zh => ("中文翻译专家", "中文"),
        }
    }
}
