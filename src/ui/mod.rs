//! Terminal presentation for the interactive chat.

mod editor;
mod input_history;
mod style;

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

pub(crate) use editor::TerminalInput;
pub(crate) use input_history::{INPUT_HISTORY_FILE, InputHistory};
pub(crate) use style::ChatStyle;

/// Where chat input lines come from.
pub(crate) enum ChatInput<R> {
    /// Piped or scripted input; the terminal, if any, does the echoing.
    Lines(Lines<R>),
    /// A raw-mode editor on the controlling terminal.
    Terminal(TerminalInput),
}

impl<R: AsyncBufRead + Unpin> ChatInput<R> {
    pub fn lines(reader: R) -> Self {
        ChatInput::Lines(reader.lines())
    }

    /// Next input line, or `None` once input ends.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        match self {
            ChatInput::Lines(lines) => lines.next_line().await,
            ChatInput::Terminal(terminal) => terminal.read_line().await,
        }
    }
}
