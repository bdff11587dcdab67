//! Relay orchestrator: renders every received message for every output.
//!
//! Each output owns a parsed template. A message is rendered by binding
//! `$message`, `$user`, `$channel` and `$time` on a copy of the template,
//! resolving `$($relay.*)` calls and encoding with the output's formatter.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::common::error::RelayResult;
use crate::common::{OutputLine, RelayMessage};
use crate::config::Config;
use crate::string::{FilterRegistry, FormattedString, Formatter, FormatterRegistry};
use crate::template::ConfigFormatter;

use super::connection::ConnectionInfo;
use super::filter::MessageFilter;

/// A configured output with its template already parsed.
struct Output {
    name: String,
    formatter: Arc<dyn Formatter>,
    template: FormattedString,
}

pub struct Relay {
    connection: ConnectionInfo,
    outputs: Vec<Output>,
    filter: MessageFilter,
    filters: FilterRegistry,
}

impl Relay {
    pub fn new(config: &Config, formatters: &FormatterRegistry, connection: ConnectionInfo) -> Self {
        let outputs = config
            .relay
            .outputs
            .iter()
            .map(|output| Output {
                name: output.name.clone(),
                formatter: formatters.get(&output.format),
                template: ConfigFormatter.decode(&output.template),
            })
            .collect();

        let filter = MessageFilter::new(config.filters.as_ref().and_then(|f| f.patterns.clone()));

        Self {
            connection,
            outputs,
            filter,
            filters: FilterRegistry::with_builtins(),
        }
    }

    /// Filters available to output templates.
    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        &mut self.filters
    }

    /// Render `message` for every output, or nothing if it is filtered.
    pub fn render(&self, message: &RelayMessage) -> Vec<OutputLine> {
        let plain = message.content.to_plain();
        if self.filter.should_filter(&plain) {
            debug!(connection = %message.connection, "FILTERED: {}", plain);
            return Vec::new();
        }

        let values: HashMap<String, FormattedString> = [
            ("message", message.content.clone()),
            ("user", FormattedString::from(message.user.as_str())),
            ("channel", FormattedString::from(message.channel.as_str())),
            ("time", FormattedString::from(message.time())),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        self.outputs
            .iter()
            .map(|output| {
                let mut text = output.template.clone();
                text.replace_all(&values).bind_methods(&self.connection);
                OutputLine {
                    output: output.name.clone(),
                    text: text.encode(output.formatter.as_ref(), &self.filters),
                }
            })
            .collect()
    }

    /// Write every rendered line until the connection side closes.
    pub async fn run<W>(
        &self,
        mut rx: mpsc::UnboundedReceiver<RelayMessage>,
        mut writer: W,
    ) -> RelayResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        while let Some(message) = rx.recv().await {
            for line in self.render(&message) {
                debug!(output = %line.output, "{} -> {}", message.connection, line.output);
                writer.write_all(line.text.as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
            writer.flush().await?;
        }

        info!("Relay finished");
        Ok(())
    }
}
