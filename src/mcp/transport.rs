//! Transport wrapper that delivers tool text verbatim.
//!
//! pmcp renders a tool's returned value into the response text content with
//! `Value::to_string`, so a string payload reaches the client JSON-quoted.
//! The comments tool always returns its rendered text as a string; this
//! wrapper restores that text before the response is written.

use async_trait::async_trait;
use pmcp::shared::{Transport, TransportMessage};
use pmcp::types::jsonrpc::ResponsePayload;
use serde_json::Value;

/// Wraps a transport and unquotes string tool payloads in outgoing
/// responses.
#[derive(Debug)]
pub struct TextContentTransport<T> {
    inner: T,
}

impl<T> TextContentTransport<T> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for TextContentTransport<T> {
    async fn send(&mut self, message: TransportMessage) -> pmcp::Result<()> {
        self.inner.send(unquote_tool_text(message)).await
    }

    async fn receive(&mut self) -> pmcp::Result<TransportMessage> {
        self.inner.receive().await
    }

    async fn close(&mut self) -> pmcp::Result<()> {
        self.inner.close().await
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn transport_type(&self) -> &'static str {
        self.inner.transport_type()
    }
}

/// Replaces JSON string literals in a response's text content with the
/// string they encode. Requests, notifications, and errors pass through.
#[must_use]
pub(crate) fn unquote_tool_text(message: TransportMessage) -> TransportMessage {
    match message {
        TransportMessage::Response(mut response) => {
            if let ResponsePayload::Result(result) = &mut response.payload {
                unquote_text_content(result);
            }
            TransportMessage::Response(response)
        }
        other => other,
    }
}

fn unquote_text_content(result: &mut Value) {
    let Some(content) = result.get_mut("content").and_then(Value::as_array_mut) else {
        return;
    };

    for item in content
        .iter_mut()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("text"))
    {
        let decoded = item
            .get("text")
            .and_then(Value::as_str)
            .and_then(|quoted| serde_json::from_str::<Value>(quoted).ok());
        if let (Some(Value::String(raw)), Some(text)) = (decoded, item.get_mut("text")) {
            *text = Value::String(raw);
        }
    }
}
