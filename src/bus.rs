//! Executor message bus client
//!
//! The sandbox executor is a separate process reached over NATS
//! request/reply. The dispatcher splices user code into a language
//! template and sends `{"code", "language"}`; the reply carries an
//! `output` field that is either an execution-stats JSON document or
//! free-form compiler output.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Payload sent to the executor
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    pub code: String,
    pub language: String,
}

/// Reply envelope from the executor; extra fields are tolerated
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteReply {
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub execution_time: Option<String>,
}

/// Failure modes of one executor round trip
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("executor request timed out")]
    Timeout,

    #[error("executor transport error: {0}")]
    Transport(String),

    #[error("executor reply was not parseable: {0}")]
    BadReply(String),
}

/// Thin NATS client owning the executor request/reply
#[derive(Clone)]
pub struct ExecutorClient {
    client: async_nats::Client,
}

impl ExecutorClient {
    /// Connect to the NATS server
    pub async fn connect(url: &str) -> Result<Self, async_nats::ConnectError> {
        let client = async_nats::connect(url).await?;
        tracing::info!("connected to NATS at {}", url);
        Ok(Self { client })
    }

    /// One request/reply round trip with a hard timeout.
    ///
    /// The dispatcher issues at most one of these per run request.
    pub async fn execute(
        &self,
        subject: &str,
        request: &ExecuteRequest,
        timeout: Duration,
    ) -> Result<ExecuteReply, BusError> {
        let payload =
            serde_json::to_vec(request).map_err(|e| BusError::Transport(e.to_string()))?;

        let message = tokio::time::timeout(
            timeout,
            self.client.request(subject.to_string(), payload.into()),
        )
        .await
        .map_err(|_| BusError::Timeout)?
        .map_err(|e| BusError::Transport(e.to_string()))?;

        serde_json::from_slice(&message.payload).map_err(|e| BusError::BadReply(e.to_string()))
    }
}

impl ExecuteReply {
    /// The executor's `output` field as a string, when present and string-typed
    pub fn output_str(&self) -> Option<&str> {
        match &self.output {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_output_extraction() {
        let reply: ExecuteReply =
            serde_json::from_str(r#"{"output":"hello","execution_time":"12ms"}"#).unwrap();
        assert_eq!(reply.output_str(), Some("hello"));
    }

    #[test]
    fn test_reply_missing_output() {
        let reply: ExecuteReply = serde_json::from_str(r#"{"execution_time":"1ms"}"#).unwrap();
        assert_eq!(reply.output_str(), None);
    }

    #[test]
    fn test_reply_wrong_typed_output() {
        let reply: ExecuteReply = serde_json::from_str(r#"{"output":{"nested":true}}"#).unwrap();
        assert_eq!(reply.output_str(), None);
    }

    #[test]
    fn test_request_payload_shape() {
        let request = ExecuteRequest {
            code: "print(1)".to_string(),
            language: "python".to_string(),
        };
        let raw = serde_json::to_value(&request).unwrap();
        assert_eq!(raw["code"], "print(1)");
        assert_eq!(raw["language"], "python");
    }
}
