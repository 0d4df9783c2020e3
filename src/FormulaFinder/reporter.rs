//! Message, warning and error notifications raised while the finder works
//! (invalid candidate keys, percentages not summing to 100 %, clamped settings...).
use log::{error, info, warn};
use std::sync::Mutex;

pub trait EventReporter: Send + Sync {
    fn message(&self, text: &str) {
        info!("{}", text);
    }
    fn warning(&self, text: &str) {
        warn!("{}", text);
    }
    fn error(&self, text: &str) {
        error!("{}", text);
    }
}

/// forwards every event to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl EventReporter for LogReporter {}

#[derive(Debug, Clone, PartialEq)]
pub enum FinderEvent {
    Message(String),
    Warning(String),
    Error(String),
}

/// keeps the events for later inspection and still logs them
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<FinderEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FinderEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FinderEvent::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FinderEvent::Warning(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    fn push(&self, event: FinderEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl EventReporter for RecordingReporter {
    fn message(&self, text: &str) {
        info!("{}", text);
        self.push(FinderEvent::Message(text.to_string()));
    }
    fn warning(&self, text: &str) {
        warn!("{}", text);
        self.push(FinderEvent::Warning(text.to_string()));
    }
    fn error(&self, text: &str) {
        error!("{}", text);
        self.push(FinderEvent::Error(text.to_string()));
    }
}
