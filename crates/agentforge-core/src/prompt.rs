//! Prompt templates with `{{ name }}` placeholders.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use regex::{Captures, Regex};
use thiserror::Error;
use tracing::debug;

/// Templates compiled into the binary.
const EMBEDDED: &[(&str, &str)] = &[("translator.md", include_str!("../prompts/translator.md"))];

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt template not found: {0}")]
    NotFound(String),

    #[error("Invalid prompt template: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Looks templates up in an optional directory, then among embedded ones.
#[derive(Debug, Clone, Default)]
pub struct PromptRenderer {
    dir: Option<PathBuf>,
}

impl PromptRenderer {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    /// Load the raw template text.
    ///
    /// Ids must be a single plain file name.
    pub fn load(&self, template_id: &str) -> Result<String, PromptError> {
        if !is_plain_file_name(template_id) {
            return Err(PromptError::Invalid(format!(
                "template id must be a file name: {template_id}"
            )));
        }

        if let Some(dir) = &self.dir {
            let path = dir.join(template_id);
            if path.is_file() {
                debug!("Loading prompt template from {}", path.display());
                return Ok(fs::read_to_string(path)?);
            }
        }

        EMBEDDED
            .iter()
            .find(|(id, _)| *id == template_id)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| PromptError::NotFound(template_id.to_string()))
    }

    /// Render a template; variables without a value become empty.
    pub fn render(
        &self,
        template_id: &str,
        vars: &HashMap<&str, &str>,
    ) -> Result<String, PromptError> {
        let template = self.load(template_id)?;
        render_str(&template, vars)
    }
}

fn is_plain_file_name(id: &str) -> bool {
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !id.contains(['/', '\\'])
}

/// Substitute `{{ name }}` placeholders in `template`.
pub fn render_str(template: &str, vars: &HashMap<&str, &str>) -> Result<String, PromptError> {
    let re = Regex::new(r"\{\{\s*(\w+)\s*\}\}").map_err(|e| PromptError::Invalid(e.to_string()))?;
    let rendered = re.replace_all(template, |caps: &Captures<'_>| {
        vars.get(&caps[1]).copied().unwrap_or_default().to_string()
    });
    Ok(rendered.into_owned())
}
