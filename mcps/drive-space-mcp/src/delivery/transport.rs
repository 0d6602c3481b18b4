//! Transports for inter-app calls

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ReporterError, ReporterResult};
use crate::types::InterAppCall;

/// Hands a call to the consumer
///
/// Implementations send once and do not retry; reliability beyond a single
/// attempt belongs to whatever sits behind the transport.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, call: &InterAppCall) -> ReporterResult<()>;
}

/// POSTs calls as JSON to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> ReporterResult<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http_client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MessageTransport for HttpTransport {
    async fn send(&self, call: &InterAppCall) -> ReporterResult<()> {
        let response = self.http_client.post(&self.url).json(call).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReporterError::Transport(format!(
                "consumer returned {}: {}",
                status, error_text
            )));
        }

        tracing::debug!(url = %self.url, %status, "call accepted");
        Ok(())
    }
}

/// Writes each call as one JSON line, on stdout unless another writer is given
pub struct StdoutTransport {
    output: Mutex<Box<dyn Write + Send>>,
}

impl StdoutTransport {
    pub fn new() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(output: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(output),
        }
    }
}

impl Default for StdoutTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageTransport for StdoutTransport {
    async fn send(&self, call: &InterAppCall) -> ReporterResult<()> {
        let line = serde_json::to_string(call).map_err(ReporterError::Serialize)?;
        let mut output = self
            .output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(output, "{}", line)?;
        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Destination, DiskInfoMessage, Message, DEFAULT_RECEIVER_PID, DEFAULT_SOURCE,
    };
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn call() -> InterAppCall {
        InterAppCall::new(
            DEFAULT_SOURCE,
            Destination {
                agent_id: 3,
                element_id: 31,
                receiver_pid: DEFAULT_RECEIVER_PID,
            },
        )
    }

    /// Accept one request, reply with `status_line`, and return the request body
    async fn serve_once(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/interapp", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];

            let body_start = loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break request.len();
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let headers = String::from_utf8_lossy(&request[..body_start]).to_lowercase();
            let content_length: usize = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map(|v| v.trim().parse().unwrap())
                .unwrap_or(0);

            while request.len() < body_start + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!("{}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status_line);
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            String::from_utf8_lossy(&request[body_start..]).to_string()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_http_posts_call_as_json() {
        let (url, server) = serve_once("HTTP/1.1 200 OK").await;
        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

        transport.send(&call()).await.unwrap();

        let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(body["source"], "C Drive Free Space");
        assert_eq!(body["destination"]["elementId"], 31);
    }

    #[tokio::test]
    async fn test_http_error_status_fails() {
        let (url, server) = serve_once("HTTP/1.1 503 Service Unavailable").await;
        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

        let err = transport.send(&call()).await.unwrap_err();
        server.await.unwrap();

        match err {
            ReporterError::Transport(message) => assert!(message.contains("503")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_http_unreachable_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/interapp", listener.local_addr().unwrap());
        drop(listener);

        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();
        let err = transport.send(&call()).await.unwrap_err();
        assert!(matches!(err, ReporterError::Transport(_)));
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stdout_writes_one_json_line() {
        let output = SharedBuffer::default();
        let transport = StdoutTransport::with_writer(Box::new(output.clone()));
        let call = call().with_message(Message::DiskInfo(DiskInfoMessage {
            name: vec!["dma-01".into()],
            free_disk: vec![250],
            size: vec![1000],
            result_percentage: vec![75.0],
        }));

        transport.send(&call).await.unwrap();

        let text = String::from_utf8(output.0.lock().unwrap().clone()).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let parsed: InterAppCall = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(parsed, call);
    }

    #[tokio::test]
    async fn test_stdout_appends_a_line_per_call() {
        let output = SharedBuffer::default();
        let transport = StdoutTransport::with_writer(Box::new(output.clone()));

        transport.send(&call()).await.unwrap();
        transport.send(&call()).await.unwrap();

        let text = String::from_utf8(output.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
