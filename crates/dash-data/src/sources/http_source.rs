//! HTTP dashboard source backed by the dashboards API

use std::time::Duration;

use async_trait::async_trait;
use dash_core::{DashboardPayload, DashboardScope};
use reqwest::Client;
use url::Url;

use super::DashboardSource;
use crate::DataError;

/// Fetches payloads from `{base_url}/api/.../dashboards/{id}`
pub struct HttpDashboardSource {
    client: Client,
    base_url: Url,
    timeout: Duration,
    name: String,
}

impl HttpDashboardSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DataError> {
        // A base without a trailing slash would lose its last path segment on join
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        if base_url.cannot_be_a_base() {
            return Err(DataError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            name: base_url.to_string(),
            base_url,
            timeout,
        })
    }

    /// Absolute URL for a dashboard in the given scope.
    ///
    /// Ids are percent-encoded as single path segments.
    pub fn dashboard_url(&self, scope: &DashboardScope, dashboard_id: &str) -> Result<Url, DataError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DataError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(scope.api_segments(dashboard_id));
        Ok(url)
    }
}

#[async_trait]
impl DashboardSource for HttpDashboardSource {
    async fn fetch(&self, scope: &DashboardScope, dashboard_id: &str) -> Result<DashboardPayload, DataError> {
        let url = self.dashboard_url(scope, dashboard_id)?;
        tracing::debug!("GET {}", url);

        let resp = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                DataError::Timeout(self.timeout)
            } else {
                DataError::Http(e)
            }
        })?;

        if !resp.status().is_success() {
            return Err(DataError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        let payload: DashboardPayload = serde_json::from_slice(&bytes)?;
        Ok(payload)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response; the receiver gets the request line
    async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = String::from_utf8_lossy(&request);
            let _ = tx.send(head.lines().next().unwrap_or_default().to_string());
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        (format!("http://{}", addr), rx)
    }

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[test]
    fn test_dashboard_urls() {
        let source = HttpDashboardSource::new("http://localhost:8765/app", Duration::from_secs(5)).unwrap();

        let ws = DashboardScope::Workspace("ws1".to_string());
        assert_eq!(
            source.dashboard_url(&ws, "extraction").unwrap().as_str(),
            "http://localhost:8765/app/api/browse/workspace/ws1/dashboards/extraction"
        );
        assert_eq!(
            source.dashboard_url(&DashboardScope::System, "overview").unwrap().as_str(),
            "http://localhost:8765/app/api/system/dashboards/overview"
        );
    }

    #[test]
    fn test_ids_are_escaped_in_urls() {
        let source = HttpDashboardSource::new("http://localhost:8765", Duration::from_secs(5)).unwrap();

        let ws = DashboardScope::Workspace("a/b".to_string());
        let url = source.dashboard_url(&ws, "x?y#z").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8765/api/browse/workspace/a%2Fb/dashboards/x%3Fy%23z"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpDashboardSource::new("not a url", Duration::from_secs(1));
        assert!(matches!(result, Err(DataError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_network_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let source = HttpDashboardSource::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = source.fetch(&DashboardScope::System, "overview").await.unwrap_err();
        assert!(err.is_network(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (base, request) = serve_once(response("500 Internal Server Error", "{}")).await;
        let source = HttpDashboardSource::new(&base, Duration::from_secs(5)).unwrap();

        let err = source.fetch(&DashboardScope::System, "overview").await.unwrap_err();
        match err {
            DataError::Status { status, url } => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/api/system/dashboards/overview"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!DataError::Status { status: 500, url: String::new() }.is_network());
        assert_eq!(request.await.unwrap(), "GET /api/system/dashboards/overview HTTP/1.1");
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_json_error() {
        let (base, _request) = serve_once(response("200 OK", "<html>not json</html>")).await;
        let source = HttpDashboardSource::new(&base, Duration::from_secs(5)).unwrap();

        let err = source.fetch(&DashboardScope::System, "overview").await.unwrap_err();
        assert!(matches!(err, DataError::Json(_)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_payload_is_parsed() {
        let body = r#"{"is_available": false, "message": "Not ready"}"#;
        let (base, request) = serve_once(response("200 OK", body)).await;
        let source = HttpDashboardSource::new(&base, Duration::from_secs(5)).unwrap();

        let payload = source
            .fetch(&DashboardScope::Workspace("ws 1".to_string()), "extraction")
            .await
            .unwrap();
        assert!(!payload.is_available);
        assert_eq!(payload.message.as_deref(), Some("Not ready"));
        assert_eq!(
            request.await.unwrap(),
            "GET /api/browse/workspace/ws%201/dashboards/extraction HTTP/1.1"
        );
    }
}
