//! Line-oriented operator surface for the headless session.
//!
//! Modals and toasts are written as tagged lines; confirmations read a `y`/`n`
//! answer from the same input the session reads intents from.
use crate::notify::{Icon, Modal, ModalChoice, Navigator, Notifier, Toast};
use crate::workflow::{ExportFormat, Intent};
use anyhow::{anyhow, Context, Result};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Intent(Intent),
    Quit,
}

/// Parse one intent line; blank lines yield `None`.
pub fn parse_intent(line: &str) -> Result<Option<SessionCommand>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let intent = match head {
        "quit" | "exit" => return Ok(Some(SessionCommand::Quit)),
        "save" => Intent::Save,
        "clear" => Intent::ClearAll,
        "add-row" => Intent::AddRow,
        "remove-selected" => Intent::RemoveSelected,
        "undo" => Intent::Undo,
        "redo" => Intent::Redo,
        "ai-fill" => Intent::AiFill,
        "import" => {
            let path = (!rest.is_empty()).then(|| PathBuf::from(rest.join(" ")));
            Intent::Import(path)
        }
        "export" => match rest.as_slice() {
            ["excel"] => Intent::Export(ExportFormat::Excel),
            ["csv"] => Intent::Export(ExportFormat::Csv),
            _ => return Err(anyhow!("usage: export excel|csv")),
        },
        "continue" => Intent::Continue,
        "review" => Intent::ReviewTab,
        "theme" => Intent::ToggleTheme,
        "offline" => Intent::ConnectionLost,
        other => return Err(anyhow!("unknown command `{other}`")),
    };
    Ok(Some(SessionCommand::Intent(intent)))
}

fn icon_tag(icon: Icon) -> &'static str {
    match icon {
        Icon::Success => "[ok]",
        Icon::Info => "[info]",
        Icon::Warning => "[warn]",
        Icon::Error => "[error]",
        Icon::Question => "[?]",
    }
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next trimmed input line, or `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("read operator input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn emit(&mut self, text: &str) {
        let written = writeln!(self.output, "{text}").and_then(|_| self.output.flush());
        if let Err(err) = written {
            tracing::warn!(error = %err, "write to console");
        }
    }

    fn prompt(&mut self, confirm: &str, cancel: &str) -> ModalChoice {
        self.emit(&format!("  y) {confirm}  n) {cancel}"));
        match self.read_line() {
            Ok(Some(answer)) => match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => ModalChoice::Confirmed,
                "n" | "no" => ModalChoice::Cancelled,
                _ => ModalChoice::Dismissed,
            },
            Ok(None) => ModalChoice::Dismissed,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "modal answer unreadable");
                ModalChoice::Dismissed
            }
        }
    }
}

/// Console shared between the notifier, the navigator, and the intent loop.
pub struct SharedConsole<R, W>(Rc<RefCell<Console<R, W>>>);

impl<R, W> Clone for SharedConsole<R, W> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<R: BufRead, W: Write> SharedConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self(Rc::new(RefCell::new(Console::new(input, output))))
    }

    pub fn read_line(&self) -> Result<Option<String>> {
        self.0.borrow_mut().read_line()
    }

    pub fn emit(&self, text: &str) {
        self.0.borrow_mut().emit(text);
    }
}

impl<R: BufRead, W: Write> Notifier for SharedConsole<R, W> {
    fn modal(&mut self, modal: Modal) -> ModalChoice {
        let mut console = self.0.borrow_mut();
        console.emit(&format!("{} {}", icon_tag(modal.icon), modal.title));
        for line in modal.body.lines() {
            console.emit(&format!("  {line}"));
        }
        match &modal.cancel_label {
            Some(cancel) => console.prompt(&modal.confirm_label, cancel),
            None => ModalChoice::Confirmed,
        }
    }

    fn toast(&mut self, toast: Toast) {
        self.emit(&format!(
            "{} {}: {}",
            icon_tag(toast.icon),
            toast.title,
            toast.text
        ));
    }

    fn start_loading(&mut self, title: &str, text: &str) {
        self.emit(&format!("[...] {title}: {text}"));
    }

    fn stop_loading(&mut self) {}
}

impl<R: BufRead, W: Write> Navigator for SharedConsole<R, W> {
    fn navigate(&mut self, target: &str) {
        self.emit(&format!("[->] {target}"));
    }
}
