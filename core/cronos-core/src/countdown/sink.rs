//! Display sinks receive the countdown label once per tick.

use std::sync::Mutex;

pub trait DisplaySink: Send + Sync {
    fn show(&self, label: &str);
}

/// Records every label it is shown. Useful for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    labels: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<String> {
        self.labels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }
}

impl DisplaySink for MemorySink {
    fn show(&self, label: &str) {
        self.labels
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(label.to_string());
    }
}
