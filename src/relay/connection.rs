//! The stdin connection: reads lines, decodes them and hands them to the relay.

use std::sync::Arc;

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::{mpsc, watch};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info};

use crate::common::error::RelayResult;
use crate::common::RelayMessage;
use crate::config::RelayConfig;
use crate::string::{Formatter, FormattedString, FormatterRegistry, MethodResolver};

/// What templates can ask about a connection through `$($relay.method)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub name: String,
    pub protocol: String,
    /// Name of the formatter decoding this connection's input.
    pub formatter: String,
    pub channel: String,
}

impl MethodResolver for ConnectionInfo {
    fn call(
        &self,
        target: &str,
        method: &str,
        _arguments: &[FormattedString],
    ) -> Option<FormattedString> {
        if target != "relay" {
            return None;
        }
        let value = match method {
            "name" => &self.name,
            "protocol" => &self.protocol,
            "formatter" => &self.formatter,
            "channel" => &self.channel,
            _ => return None,
        };
        Some(FormattedString::from(value.as_str()))
    }
}

pub struct StdinConnection {
    info: ConnectionInfo,
    user: String,
    formatter: Arc<dyn Formatter>,
}

impl StdinConnection {
    pub fn new(config: &RelayConfig, formatters: &FormatterRegistry) -> Self {
        let formatter = formatters.get(&config.input_format);
        Self {
            info: ConnectionInfo {
                name: config.name.clone(),
                protocol: "stdin".to_string(),
                formatter: formatter.name().to_string(),
                channel: config.channel.clone(),
            },
            user: config.user.clone(),
            formatter,
        }
    }

    pub fn info(&self) -> &ConnectionInfo {
        &self.info
    }

    /// Decode one raw input line.
    pub fn decode(&self, line: &str) -> RelayMessage {
        RelayMessage::new(
            self.info.name.as_str(),
            self.user.as_str(),
            self.info.channel.as_str(),
            self.formatter.decode(line),
        )
    }

    /// Read lines until the input ends, the relay goes away or shutdown is signalled.
    pub async fn run<R>(
        &self,
        reader: R,
        tx: mpsc::UnboundedSender<RelayMessage>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> RelayResult<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new());
        info!(connection = %self.info.name, formatter = %self.info.formatter, "Reading input");

        loop {
            tokio::select! {
                line = lines.next() => match line {
                    Some(Ok(line)) => {
                        if line.is_empty() {
                            continue;
                        }
                        if tx.send(self.decode(&line)).is_err() {
                            debug!(connection = %self.info.name, "Relay closed, stopping input");
                            break;
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        info!(connection = %self.info.name, "Input closed");
                        break;
                    }
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!(connection = %self.info.name, "Shutdown signal received");
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatters::default_registry;

    fn connection(input_format: &str) -> StdinConnection {
        let config = RelayConfig {
            input_format: input_format.to_string(),
            ..RelayConfig::default()
        };
        StdinConnection::new(&config, &default_registry())
    }

    #[test]
    fn test_methods() {
        let info = connection("irc").info().clone();
        let call = |target: &str, method: &str| info.call(target, method, &[]).map(|s| s.to_plain());
        assert_eq!(call("relay", "name").as_deref(), Some("stdin"));
        assert_eq!(call("relay", "protocol").as_deref(), Some("stdin"));
        assert_eq!(call("relay", "formatter").as_deref(), Some("irc"));
        assert_eq!(call("relay", "nope"), None);
        assert_eq!(call("other", "name"), None);
    }

    #[test]
    fn test_unknown_input_format_falls_back() {
        assert_eq!(connection("morse").info().formatter, "utf8");
    }

    #[test]
    fn test_decode_uses_input_formatter() {
        let message = connection("irc").decode("\x02bold\x02 text");
        assert_eq!(message.content.to_plain(), "bold text");
        assert_eq!(message.user, "stdin");
        assert!(message.content[0].as_format().is_ok());
    }

    #[tokio::test]
    async fn test_run_reads_lines() {
        let reader = tokio_test::io::Builder::new()
            .read(b"first\r\n\nsec")
            .read(b"ond\n")
            .build();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        connection("utf8").run(reader, tx, shutdown_rx).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().content.to_plain(), "first");
        assert_eq!(rx.recv().await.unwrap().content.to_plain(), "second");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (_writer, reader) = tokio::io::duplex(64);
        let (tx, _rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let conn = connection("utf8");
        let task = conn.run(reader, tx, shutdown_rx);
        shutdown_tx.send(true).unwrap();
        task.await.unwrap();
    }
}
