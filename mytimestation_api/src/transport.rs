//! Authenticating transport: headers, Basic auth, debug dumps and error mapping.

use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Request, Response, StatusCode, Version};
use url::Position;
use uuid::Uuid;

use crate::config::{Config, Settings};
use crate::errors::{Error, ServiceError};
use crate::logging::Logger;

/// Executes a single HTTP request.
///
/// Implementations must be safe to call concurrently; the client shares one
/// transport across every request it issues.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: Request) -> Result<Response, Error>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn round_trip(&self, request: Request) -> Result<Response, Error> {
        Ok(self.execute(request).await?)
    }
}

/// Transport for MyTimeStation API requests.
///
/// Sets `User-Agent`, `Accept` and Basic auth on every request, dumps the
/// request and response when debug is enabled, then hands the request to the
/// wrapped transport. Non-2xx responses come back as [`Error::Service`].
///
/// Debug dumps contain the `Authorization` header verbatim; treat debug
/// logs as secrets.
pub struct AuthTransport {
    settings: Arc<Settings>,
    inner: Arc<dyn Transport>,
    logger: Logger,
}

impl AuthTransport {
    /// Builds the transport from `config`, reading `$MTS_AUTH_TOKEN` if needed.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::with_settings(config.resolve(), config)
    }

    /// Builds the transport from already resolved `settings`. The wrapped
    /// transport and log dispatch are taken from `config`.
    pub fn with_settings(settings: Settings, config: &Config) -> Result<Self, Error> {
        let logger = Logger::new(config.log_dispatch.clone(), settings.debug());
        Self::new(Arc::new(settings), config.transport.clone(), logger)
    }

    pub(crate) fn new(
        settings: Arc<Settings>,
        inner: Option<Arc<dyn Transport>>,
        logger: Logger,
    ) -> Result<Self, Error> {
        let inner: Arc<dyn Transport> = match inner {
            Some(inner) => inner,
            None => Arc::new(reqwest::Client::builder().build()?),
        };
        Ok(Self {
            settings,
            inner,
            logger,
        })
    }

    fn log_request(&self, request: &Request, correlation_id: &str) {
        self.logger.scope(|| match dump_request(request) {
            Ok(dump) => tracing::debug!(
                correlation_id = %correlation_id,
                request = %dump,
                "outbound request"
            ),
            Err(reason) => tracing::error!(
                correlation_id = %correlation_id,
                error = %reason,
                "failed to dump request"
            ),
        });
    }

    /// Buffers the response body, dumps it, and rebuilds an equivalent response.
    async fn log_response(
        &self,
        response: Response,
        correlation_id: &str,
    ) -> Result<Response, Error> {
        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                self.logger.scope(|| {
                    tracing::error!(
                        correlation_id = %correlation_id,
                        error = %e,
                        "failed to dump response"
                    )
                });
                // same outcome as without debug: unreadable error bodies map
                // like empty ones, unreadable success bodies fail the decode
                if !status.is_success() {
                    return Err(ServiceError::from_response(status, &[]).into());
                }
                return Err(e.into());
            }
        };

        let dump = dump_response(status, version, &headers, &body);
        self.logger.scope(|| {
            tracing::debug!(
                correlation_id = %correlation_id,
                response = %dump,
                "received response"
            )
        });

        let mut rebuilt = http::Response::new(body);
        *rebuilt.status_mut() = status;
        *rebuilt.version_mut() = version;
        *rebuilt.headers_mut() = headers;
        Ok(Response::from(rebuilt))
    }
}

#[async_trait]
impl Transport for AuthTransport {
    async fn round_trip(&self, mut request: Request) -> Result<Response, Error> {
        let token = self.settings.auth_token();
        if token.is_empty() {
            return Err(Error::MissingToken);
        }

        let correlation_id = Uuid::new_v4().to_string();

        let headers = request.headers_mut();
        headers.insert(USER_AGENT, header_value(self.settings.user_agent())?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, basic_auth(token)?);

        if self.settings.debug() {
            self.log_request(&request, &correlation_id);
        }

        let response = self
            .inner
            .round_trip(request)
            .await
            .map_err(|e| Error::Transport(Box::new(e)))?;

        let response = if self.settings.debug() {
            self.log_response(response, &correlation_id).await?
        } else {
            response
        };

        let status = response.status();
        if !status.is_success() {
            // a body we cannot read maps the same as an empty one
            let body = response.bytes().await.unwrap_or_default();
            return Err(ServiceError::from_response(status, &body).into());
        }

        Ok(response)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::InvalidRequest(format!("invalid header value: {}", e)))
}

/// Basic auth with the token as username and an empty password.
fn basic_auth(token: &str) -> Result<HeaderValue, Error> {
    let encoded = STANDARD.encode(format!("{}:", token));
    let mut value = header_value(&format!("Basic {}", encoded))?;
    value.set_sensitive(true);
    Ok(value)
}

fn dump_request(request: &Request) -> Result<String, &'static str> {
    let body = match request.body() {
        Some(body) => body.as_bytes().ok_or("request body is a stream")?,
        None => &[],
    };

    let url = request.url();
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut out = format!("{} {} {:?}\r\n", request.method(), target, request.version());
    out.push_str(&format!(
        "host: {}\r\n",
        &url[Position::BeforeHost..Position::AfterPort]
    ));
    write_headers(&mut out, request.headers());
    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(body));
    Ok(out)
}

fn dump_response(status: StatusCode, version: Version, headers: &HeaderMap, body: &[u8]) -> String {
    let mut out = format!("{:?} {}\r\n", version, status);
    write_headers(&mut out, headers);
    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(body));
    out
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        out.push_str(name.as_str());
        out.push_str(": ");
        out.push_str(&String::from_utf8_lossy(value.as_bytes()));
        out.push_str("\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::Method;

    #[test]
    fn basic_auth_uses_empty_password() {
        let value = basic_auth("token").unwrap();
        assert_eq!(value.to_str().unwrap(), "Basic dG9rZW46");
        assert!(value.is_sensitive());
    }

    #[test]
    fn header_value_rejects_control_characters() {
        let err = header_value("bad\nagent").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn request_dump_has_request_line_headers_and_body() {
        let url = "http://localhost:8080/v1.2/departments?x=1".parse().unwrap();
        let mut request = Request::new(Method::POST, url);
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
        *request.body_mut() = Some("name=Engineering".into());

        let dump = dump_request(&request).unwrap();
        assert_eq!(
            dump,
            "POST /v1.2/departments?x=1 HTTP/1.1\r\n\
             host: localhost:8080\r\n\
             content-type: application/x-www-form-urlencoded\r\n\
             \r\n\
             name=Engineering"
        );
    }

    #[test]
    fn response_dump_has_status_line_headers_and_body() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let dump = dump_response(StatusCode::NOT_FOUND, Version::HTTP_11, &headers, b"{}");
        assert_eq!(
            dump,
            "HTTP/1.1 404 Not Found\r\ncontent-type: application/json\r\n\r\n{}"
        );
    }
}
