//! # Console Channel
//!
//! A single-operator messaging channel on stdin/stdout. Menu options are
//! printed with their values; typing `@<value>` selects one, anything else
//! is sent as text.

use async_trait::async_trait;
use parking_lot::Mutex;
use ps_01_conversation::{InboundEvent, MessageSink, OutboundMessage};
use shared_types::Identity;
use std::io::Write;
use tracing::warn;

pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

/// Text block shown for one message.
pub fn render(message: &OutboundMessage) -> String {
    let mut text = format!("[{}] {}", message.identity, message.text);
    for row in &message.options {
        let cells: Vec<String> = row
            .iter()
            .map(|option| format!("{} (@{})", option.label, option.value))
            .collect();
        text.push_str("\n    ");
        text.push_str(&cells.join("   "));
    }
    text
}

/// Event for one typed line, or `None` for a blank line.
pub fn parse_line(identity: &Identity, line: &str) -> Option<InboundEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.strip_prefix('@') {
        Some(value) if !value.is_empty() => Some(InboundEvent::selection(identity.clone(), value)),
        _ => Some(InboundEvent::text(identity.clone(), line)),
    }
}

#[async_trait]
impl MessageSink for ConsoleSink {
    async fn emit(&self, message: OutboundMessage) {
        let text = render(&message);
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}\n", text).and_then(|_| out.flush()) {
            warn!(error = %e, "Console write failed");
        }
    }
}
