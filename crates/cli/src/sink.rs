//! Event sink writing envelopes as JSON lines.

use async_trait::async_trait;
use event_sink::{EventEnvelope, EventSink, Result, validate_events_for_publish};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Writes each published envelope as one JSON object per line.
///
/// A batch is serialized in full before anything is written, so a
/// serialization failure writes nothing.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesSink<W> {
    /// Creates a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> EventSink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn publish(&self, events: Vec<EventEnvelope>) -> Result<()> {
        validate_events_for_publish(&events)?;

        let mut buffer = Vec::new();
        for envelope in &events {
            serde_json::to_writer(&mut buffer, envelope)?;
            buffer.push(b'\n');
        }

        let mut writer = self.writer.lock().await;
        writer.write_all(&buffer).await?;
        writer.flush().await?;

        tracing::debug!(events = events.len(), bytes = buffer.len(), "wrote events");
        Ok(())
    }
}
