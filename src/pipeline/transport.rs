//! HTTP transport seam.
//!
//! The pipeline never talks to the network directly; it hands fully formed
//! requests to a [`Transport`]. Production code uses [`UreqTransport`], tests
//! substitute a scripted fake.
use super::TransportError;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

/// A single outgoing request with a borrowed body.
#[derive(Debug, Clone)]
pub struct HttpRequest<'a> {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: &'a [u8],
}

#[cfg(test)]
impl HttpRequest<'_> {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received response. The body is read eagerly; when reading failed the
/// reason is kept so callers can decide how to degrade.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    headers: Vec<(String, String)>,
    body: Result<Vec<u8>, String>,
}

#[cfg(test)]
impl HttpResponse {
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: Vec::new(),
            body: Ok(Vec::new()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Ok(body.into());
        self
    }

    pub fn with_body_error(mut self, reason: impl Into<String>) -> Self {
        self.body = Err(reason.into());
        self
    }
}

impl HttpResponse {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn bytes(&self) -> Result<&[u8], TransportError> {
        self.body
            .as_deref()
            .map_err(|reason| TransportError::Body(reason.clone()))
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Result<String, TransportError> {
        Ok(String::from_utf8_lossy(self.bytes()?).into_owned())
    }

    pub fn json(&self) -> Result<serde_json::Value, TransportError> {
        Ok(serde_json::from_slice(self.bytes()?)?)
    }
}

/// Issues one request and returns the response, whatever its status.
///
/// Implementations must not retry and must not treat non-2xx statuses as
/// errors; only failures to obtain a response at all are `Err`.
pub trait Transport {
    fn send(&self, request: HttpRequest<'_>) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a shared `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: config.into(),
        }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest<'_>) -> Result<HttpResponse, TransportError> {
        let request_error = |err: ureq::Error| TransportError::Request {
            url: redact_query(&request.url),
            reason: err.to_string(),
        };

        let mut builder = match request.method {
            Method::Post => self.agent.post(request.url.as_str()),
            Method::Put => self.agent.put(request.url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        let mut response = builder.send(request.body).map_err(request_error)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|err| err.to_string());

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

/// Drop the query string so presigned signatures never reach logs or errors.
pub(crate) fn redact_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?..."),
        None => url.to_string(),
    }
}
