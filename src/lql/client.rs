//! Remote compilation service
//!
//! [CompilerService] is the seam between the run controller and the transport. The
//! production implementation is [HttpCompilerService], which posts the source to
//! `{endpoint}/run` and decodes the pipeline response. Tests substitute their own
//! implementations.

use super::response::{MalformedResponse, PipelineResponse, RunRequest};
use log::debug;
use reqwest::StatusCode;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// Failure to obtain a readable pipeline response
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The service could not be reached or the exchange broke off
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// Non-success status whose body is not a pipeline response
    #[error("service answered {status}")]
    Status { status: StatusCode },

    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
}

/// Anything that can run LQL source through the compilation pipeline
pub trait CompilerService: Send + Sync {
    fn run(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<PipelineResponse, TransportError>> + Send;
}

/// Compilation service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpCompilerService {
    client: reqwest::Client,
    run_url: String,
    timeout: Duration,
}

impl HttpCompilerService {
    /// Service at `endpoint` (base address, with or without trailing slash)
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TransportError> {
        let run_url = run_url(endpoint);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Request {
                url: run_url.clone(),
                source,
            })?;
        Ok(HttpCompilerService {
            client,
            run_url,
            timeout,
        })
    }

    /// The full `/run` URL requests are posted to
    pub fn run_url(&self) -> &str {
        &self.run_url
    }

    fn request_error(&self, source: reqwest::Error) -> TransportError {
        if source.is_timeout() {
            TransportError::Timeout {
                url: self.run_url.clone(),
                timeout: self.timeout,
            }
        } else {
            TransportError::Request {
                url: self.run_url.clone(),
                source,
            }
        }
    }
}

fn run_url(endpoint: &str) -> String {
    format!("{}/run", endpoint.trim_end_matches('/'))
}

impl CompilerService for HttpCompilerService {
    async fn run(&self, code: &str) -> Result<PipelineResponse, TransportError> {
        debug!("POST {} ({} bytes of source)", self.run_url, code.len());

        let response = self
            .client
            .post(&self.run_url)
            .json(&RunRequest::new(code))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        debug!("{} answered {} ({} bytes)", self.run_url, status, body.len());

        // The service reports compilation errors in the body, so an error status
        // is only fatal when the body is not a pipeline response.
        let value: Value = match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => return Err(TransportError::Status { status }),
            Err(e) => return Err(TransportError::Decode(e.to_string())),
        };
        match PipelineResponse::from_value(&value) {
            Ok(decoded) => Ok(decoded),
            Err(_) if !status.is_success() => Err(TransportError::Status { status }),
            Err(malformed) => Err(malformed.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_url_joining() {
        assert_eq!(run_url("http://localhost:8000"), "http://localhost:8000/run");
        assert_eq!(run_url("http://localhost:8000/"), "http://localhost:8000/run");
        assert_eq!(
            run_url("https://lql.example.com/api"),
            "https://lql.example.com/api/run"
        );
    }

    #[test]
    fn test_service_construction() {
        let service =
            HttpCompilerService::new("http://127.0.0.1:9/", Duration::from_secs(1)).unwrap();
        assert_eq!(service.run_url(), "http://127.0.0.1:9/run");
    }

    #[test]
    fn test_error_messages() {
        let err = TransportError::Status {
            status: StatusCode::BAD_GATEWAY,
        };
        assert_eq!(err.to_string(), "service answered 502 Bad Gateway");

        let err = TransportError::Timeout {
            url: "http://x/run".to_string(),
            timeout: Duration::from_secs(2),
        };
        assert_eq!(err.to_string(), "request to http://x/run timed out after 2s");
    }
}
