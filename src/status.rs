use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Clone, Copy)]
pub enum MessageType {
    Error,
    Warning,
    Info,
    Priority,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message_type_str = match self {
            MessageType::Error => "Error",
            MessageType::Warning => "Warning",
            MessageType::Info => "Info",
            MessageType::Priority => "Priority",
        };
        write!(f, "{}", message_type_str)
    }
}

#[derive(Clone)]
pub struct StatusMessage {
    pub timestamp: DateTime<Utc>,
    pub message_type: MessageType,
    pub content: String,
}

impl StatusMessage {
    pub fn new(message_type: MessageType, content: String) -> Self {
        StatusMessage {
            timestamp: Utc::now(),
            message_type,
            content,
        }
    }
}

/// Console sink for pipeline status. Messages go straight to stdout with a
/// timestamp and a colored level tag.
#[derive(Default)]
pub struct MessageLog;

impl MessageLog {
    pub fn new() -> Self {
        MessageLog
    }

    pub fn add_message(&mut self, message: StatusMessage) {
        let color = match message.message_type {
            MessageType::Error => "\x1b[31m",
            MessageType::Warning => "\x1b[33m",
            MessageType::Info => "\x1b[0m",
            MessageType::Priority => "\x1b[32m",
        };
        let white = "\x1b[0m";
        println!(
            "{}{} | {:^8} | {}{}",
            color,
            message.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            message.message_type,
            message.content,
            white,
        )
    }
}
