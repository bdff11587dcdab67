//! Message types passed between a connection and the relay.

use chrono::{DateTime, Local};

use crate::string::FormattedString;

/// A line received by a connection, already decoded.
#[derive(Debug, Clone)]
pub struct RelayMessage {
    /// Name of the connection the line came from.
    pub connection: String,
    /// Sender's name.
    pub user: String,
    pub channel: String,
    /// Decoded message content.
    pub content: FormattedString,
    pub received: DateTime<Local>,
}

impl RelayMessage {
    pub fn new(
        connection: impl Into<String>,
        user: impl Into<String>,
        channel: impl Into<String>,
        content: FormattedString,
    ) -> Self {
        Self {
            connection: connection.into(),
            user: user.into(),
            channel: channel.into(),
            content,
            received: Local::now(),
        }
    }

    /// Time of arrival as `HH:MM:SS`.
    pub fn time(&self) -> String {
        self.received.format("%H:%M:%S").to_string()
    }
}

/// Encoded text ready for one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    /// Name of the configured output.
    pub output: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_format() {
        let message = RelayMessage::new("stdin", "bob", "#lobby", FormattedString::from("hi"));
        let time = message.time();
        assert_eq!(time.len(), 8);
        assert_eq!(time.matches(':').count(), 2);
        assert_eq!(message.content.to_plain(), "hi");
    }
}
