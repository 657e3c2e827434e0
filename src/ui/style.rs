//! Colours and status line for the interactive chat.

use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Print, StyledContent, Stylize, style};
use crossterm::terminal::{Clear, ClearType};

/// Input prompt shown before every line.
pub(crate) const PROMPT: &str = "> ";

/// Shown while a reply is pending.
pub(crate) const THINKING: &str = "思考中...";

/// Decoration for chat output.
///
/// Plain output carries no escape codes and no status line, so it stays
/// readable when piped.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChatStyle {
    ansi: bool,
}

impl ChatStyle {
    pub fn plain() -> Self {
        Self { ansi: false }
    }

    pub fn ansi() -> Self {
        Self { ansi: true }
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |s| s.cyan().bold())
    }

    pub fn hint(&self, text: &str) -> String {
        self.paint(text, |s| s.dark_grey())
    }

    pub fn prompt(&self) -> String {
        self.paint(PROMPT, |s| s.green().bold())
    }

    /// Label written before a streamed reply; empty in plain mode.
    pub fn assistant_label(&self) -> String {
        if self.ansi {
            format!("{}: ", style("助手").magenta())
        } else {
            String::new()
        }
    }

    pub fn farewell(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |s| s.red())
    }

    /// Write the pending status line.
    pub fn show_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.ansi {
            queue!(out, Print(style(THINKING).dark_grey()))?;
            out.flush()?;
        }
        Ok(())
    }

    /// Erase the current line, removing the status line.
    pub fn clear_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.ansi {
            queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        }
        Ok(())
    }

    fn paint<'a>(
        &self,
        text: &'a str,
        colour: impl FnOnce(StyledContent<&'a str>) -> StyledContent<&'a str>,
    ) -> String {
        if self.ansi {
            colour(style(text)).to_string()
        } else {
            text.to_string()
        }
    }
}
