//! Window-title display sink.

use std::io::{self, IsTerminal, Write};

use cronos_core::DisplaySink;

/// Writes each label as the terminal window title (OSC 0). Does nothing when
/// stdout is not a terminal.
pub struct TerminalTitleSink {
    enabled: bool,
}

impl TerminalTitleSink {
    pub fn new() -> Self {
        Self {
            enabled: io::stdout().is_terminal(),
        }
    }
}

impl Default for TerminalTitleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for TerminalTitleSink {
    fn show(&self, label: &str) {
        if !self.enabled {
            return;
        }
        let mut stdout = io::stdout().lock();
        if let Err(err) = write!(stdout, "{}", title_sequence(label)).and_then(|_| stdout.flush()) {
            tracing::debug!(error = %err, "Failed to set terminal title");
        }
    }
}

/// OSC 0 escape for `label`, with control characters stripped.
fn title_sequence(label: &str) -> String {
    let clean: String = label.chars().filter(|c| !c.is_control()).collect();
    format!("\x1b]0;{}\x07", clean)
}
