//! Raw-mode line editor with history recall.

use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};

use super::input_history::InputHistory;
use super::style::{ChatStyle, PROMPT};

/// Result of feeding one key to an [`EditBuffer`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum EditOutcome {
    Continue,
    Submit(String),
    Eof,
}

/// The line being edited.
///
/// `recall` indexes the history entry on screen; the text typed before
/// recall started is kept in `draft`.
#[derive(Debug, Default)]
pub(crate) struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
    recall: Option<usize>,
    draft: Vec<char>,
}

impl EditBuffer {
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Display columns left of the cursor.
    pub fn cursor_width(&self) -> usize {
        self.chars[..self.cursor].iter().map(|c| char_width(*c)).sum()
    }

    pub fn apply(&mut self, key: KeyEvent, history: &[String]) -> EditOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => return EditOutcome::Submit(self.text()),
            KeyCode::Char('c') if ctrl => return EditOutcome::Eof,
            KeyCode::Char('d') if ctrl && self.chars.is_empty() => return EditOutcome::Eof,
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.chars.len(),
            KeyCode::Char('u') if ctrl => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => {
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.chars.len() => {
                self.chars.remove(self.cursor);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.chars.len(),
            KeyCode::Up => self.recall_older(history),
            KeyCode::Down => self.recall_newer(history),
            _ => {}
        }
        EditOutcome::Continue
    }

    fn recall_older(&mut self, history: &[String]) {
        let index = match self.recall {
            None if history.is_empty() => return,
            None => {
                self.draft = self.chars.clone();
                history.len() - 1
            }
            Some(0) => return,
            Some(i) => i - 1,
        };
        self.recall = Some(index);
        self.replace(history[index].chars().collect());
    }

    fn recall_newer(&mut self, history: &[String]) {
        match self.recall {
            None => {}
            Some(i) if i + 1 < history.len() => {
                self.recall = Some(i + 1);
                self.replace(history[i + 1].chars().collect());
            }
            Some(_) => {
                self.recall = None;
                let draft = std::mem::take(&mut self.draft);
                self.replace(draft);
            }
        }
    }

    fn replace(&mut self, chars: Vec<char>) {
        self.cursor = chars.len();
        self.chars = chars;
    }
}

/// Terminal columns taken by `c`; CJK and full-width forms take two.
fn char_width(c: char) -> usize {
    match c as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x1F300..=0x1F64F
        | 0x20000..=0x3FFFD => 2,
        _ => 1,
    }
}

/// Interactive input from a terminal, with persistent history.
pub(crate) struct TerminalInput {
    style: ChatStyle,
    history: InputHistory,
}

impl TerminalInput {
    pub fn new(style: ChatStyle, history: InputHistory) -> Self {
        Self { style, history }
    }

    /// Read one line; `None` on Ctrl-C or Ctrl-D at an empty prompt.
    pub async fn read_line(&mut self) -> io::Result<Option<String>> {
        let prompt = self.style.prompt();
        let entries = self.history.entries().to_vec();
        let line = tokio::task::spawn_blocking(move || read_line_raw(&prompt, &entries))
            .await
            .map_err(io::Error::other)??;

        if let Some(line) = &line {
            self.history.push(line);
        }
        Ok(line)
    }
}

fn read_line_raw(prompt: &str, history: &[String]) -> io::Result<Option<String>> {
    terminal::enable_raw_mode()?;
    let result = edit(prompt, history);
    terminal::disable_raw_mode()?;
    result
}

fn edit(prompt: &str, history: &[String]) -> io::Result<Option<String>> {
    let mut out = io::stdout();
    let mut buffer = EditBuffer::default();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match buffer.apply(key, history) {
            EditOutcome::Continue => redraw(&mut out, prompt, &buffer)?,
            EditOutcome::Submit(line) => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Ok(Some(line));
            }
            EditOutcome::Eof => {
                write!(out, "\r\n")?;
                out.flush()?;
                return Ok(None);
            }
        }
    }
}

fn redraw<W: Write>(out: &mut W, prompt: &str, buffer: &EditBuffer) -> io::Result<()> {
    let column = u16::try_from(PROMPT.len() + buffer.cursor_width()).unwrap_or(u16::MAX);
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(prompt),
        Print(buffer.text()),
        MoveToColumn(column)
    )?;
    out.flush()
}
