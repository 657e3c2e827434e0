//! Translate subcommand handler for AgentForge.

use std::collections::HashMap;
use std::io::Write;

use futures::StreamExt;
use tracing::debug;

use agentforge_core::PromptRenderer;
use agentforge_protocols::{ChatMessage, ChatRequest, LlmProvider};

use crate::cli::TargetLang;

const TEMPLATE_ID: &str = "translator.md";

/// Build the translation request for `text`.
pub(crate) fn build_request(
    prompts: &PromptRenderer,
    target: TargetLang,
    text: &str,
) -> Result<ChatRequest, Box<dyn std::error::Error>> {
    let (role, lang) = target.prompt_vars();
    let vars = HashMap::from([("role", role), ("lang", lang)]);
    let system = prompts.render(TEMPLATE_ID, &vars)?;
    debug!("System prompt: {}", system);

    Ok(ChatRequest::builder()
        .system(system)
        .message(ChatMessage::user(text))
        .build()?)
}

/// Stream the translation of `text` to `out`.
pub(crate) async fn handle_translate_command<W: Write>(
    provider: &dyn LlmProvider,
    prompts: &PromptRenderer,
    target: TargetLang,
    text: &str,
    out: &mut W,
) -> Result<String, Box<dyn std::error::Error>> {
    let request = build_request(prompts, target, text)?;

    let mut stream = provider.chat_stream(request);
    let mut result = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        write!(out, "{}", chunk)?;
        out.flush()?;
        result.push_str(&chunk);
    }
    writeln!(out)?;

    debug!("Translation complete: {}", result);
    Ok(result)
}
