//! Controls, operator intents, and handler outcomes.
use std::path::PathBuf;

/// An interactive control a handler can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    Save,
    ClearAll,
    AddRow,
    RemoveSelected,
    Undo,
    Redo,
    AiFill,
    Import,
    ExportExcel,
    ExportCsv,
    Continue,
    ReviewTab,
    ThemeSwitcher,
}

impl Control {
    pub const ALL: [Control; 13] = [
        Control::Save,
        Control::ClearAll,
        Control::AddRow,
        Control::RemoveSelected,
        Control::Undo,
        Control::Redo,
        Control::AiFill,
        Control::Import,
        Control::ExportExcel,
        Control::ExportCsv,
        Control::Continue,
        Control::ReviewTab,
        Control::ThemeSwitcher,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Excel => "Excel",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// One discrete operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Save,
    ClearAll,
    AddRow,
    RemoveSelected,
    Undo,
    Redo,
    AiFill,
    /// File chosen for import; `None` when the picker closed without a file.
    Import(Option<PathBuf>),
    Export(ExportFormat),
    Continue,
    ReviewTab,
    ToggleTheme,
    /// Network connectivity was lost.
    ConnectionLost,
}

impl Intent {
    /// Control that must be attached for the intent to be handled. Connection
    /// loss is session-wide and needs none.
    pub fn control(&self) -> Option<Control> {
        let control = match self {
            Intent::Save => Control::Save,
            Intent::ClearAll => Control::ClearAll,
            Intent::AddRow => Control::AddRow,
            Intent::RemoveSelected => Control::RemoveSelected,
            Intent::Undo => Control::Undo,
            Intent::Redo => Control::Redo,
            Intent::AiFill => Control::AiFill,
            Intent::Import(_) => Control::Import,
            Intent::Export(ExportFormat::Excel) => Control::ExportExcel,
            Intent::Export(ExportFormat::Csv) => Control::ExportCsv,
            Intent::Continue => Control::Continue,
            Intent::ReviewTab => Control::ReviewTab,
            Intent::ToggleTheme => Control::ThemeSwitcher,
            Intent::ConnectionLost => return None,
        };
        Some(control)
    }
}

/// What dispatching an intent did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No handler is attached for the intent.
    Ignored,
    Handled,
    /// The session moved to the named stage.
    Navigated(String),
}
