// src/api/transport.rs
//! Raw HTTP/1.1 over TLS.
//!
//! Every call opens a fresh TLS session to the API host, writes one
//! request with `Connection: close`, reads until the peer closes, and tears
//! the session down. Nothing is pooled and nothing times out: a hung remote
//! blocks the caller.

use super::types::{ApiRequest, ApiResponse};
use crate::constants::{NOTION_API_HOST, NOTION_API_PORT, RESPONSE_BUFFER_CAPACITY};
use once_cell::sync::OnceCell;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

/// The ability to exchange one request for one response.
///
/// Implementations never fail: a call that produced no response comes back
/// as [`ApiResponse::transport_failure`].
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> ApiResponse;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> ApiResponse {
        (**self).send(request)
    }
}

static TLS_CONFIG: OnceCell<Arc<ClientConfig>> = OnceCell::new();

/// Process-wide TLS client configuration, built on first use.
fn tls_config() -> Result<Arc<ClientConfig>, rustls::Error> {
    TLS_CONFIG
        .get_or_try_init(|| {
            let mut roots = RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

            let config = ClientConfig::builder_with_provider(Arc::new(
                rustls::crypto::ring::default_provider(),
            ))
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth();

            log::debug!("TLS client configuration initialized");
            Ok(Arc::new(config))
        })
        .map(Arc::clone)
}

#[derive(Debug)]
enum TransportFailure {
    Session(String),
    Connect(io::Error),
    Send(io::Error),
    Read(io::Error),
}

impl TransportFailure {
    fn description(&self) -> &'static str {
        match self {
            Self::Session(_) => "Failed to create TLS session",
            Self::Connect(_) => "Failed to connect to Notion API",
            Self::Send(_) => "Failed to send request",
            Self::Read(_) => "Failed to read response",
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Session(reason) => reason.clone(),
            Self::Connect(e) | Self::Send(e) | Self::Read(e) => e.to_string(),
        }
    }
}

/// HTTPS transport to a single fixed host.
#[derive(Debug, Clone)]
pub struct TlsTransport {
    host: String,
    port: u16,
}

impl TlsTransport {
    pub fn new() -> Self {
        Self::with_host(NOTION_API_HOST, NOTION_API_PORT)
    }

    pub fn with_host(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn exchange(&self, request: &ApiRequest) -> Result<Vec<u8>, TransportFailure> {
        let config = tls_config().map_err(|e| TransportFailure::Session(e.to_string()))?;
        let server_name = ServerName::try_from(self.host.clone())
            .map_err(|e| TransportFailure::Session(e.to_string()))?;
        let connection = ClientConnection::new(config, server_name)
            .map_err(|e| TransportFailure::Session(e.to_string()))?;

        let socket = TcpStream::connect((self.host.as_str(), self.port))
            .map_err(TransportFailure::Connect)?;
        let mut stream = StreamOwned::new(connection, socket);

        // The handshake runs as part of the first write.
        stream
            .write_all(encode_request(&self.host, request).as_bytes())
            .and_then(|_| stream.flush())
            .map_err(TransportFailure::Send)?;

        let mut raw = Vec::with_capacity(RESPONSE_BUFFER_CAPACITY);
        match stream.read_to_end(&mut raw) {
            Ok(_) => {}
            // Peers may close the socket without a TLS close_notify.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !raw.is_empty() => {}
            Err(e) => return Err(TransportFailure::Read(e)),
        }

        Ok(raw)
    }
}

impl Default for TlsTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for TlsTransport {
    fn send(&self, request: &ApiRequest) -> ApiResponse {
        match self.exchange(request) {
            Ok(raw) => decode_response(&raw),
            Err(failure) => {
                log::warn!(
                    "{} {}: {} ({})",
                    request.method(),
                    request.path(),
                    failure.description(),
                    failure.detail()
                );
                ApiResponse::transport_failure(failure.description())
            }
        }
    }
}

/// Serializes a request as HTTP/1.1 text.
pub fn encode_request(host: &str, request: &ApiRequest) -> String {
    let body = request.body();
    let mut text = String::with_capacity(256 + body.len());

    // Writing into a String cannot fail.
    let _ = write!(text, "{} {} HTTP/1.1\r\n", request.method(), request.path());
    let _ = write!(text, "Host: {}\r\n", host);
    for (name, value) in request.headers() {
        let _ = write!(text, "{}: {}\r\n", name, value);
    }
    text.push_str("Content-Type: application/json\r\n");
    if !body.is_empty() {
        let _ = write!(text, "Content-Length: {}\r\n", body.len());
    }
    text.push_str("Connection: close\r\n\r\n");
    text.push_str(body);
    text
}

/// Splits a raw response into status and body.
///
/// Without a blank line separating headers from body, the whole response is
/// the body and there is no status.
pub fn decode_response(raw: &[u8]) -> ApiResponse {
    let Some(header_end) = find(raw, b"\r\n\r\n") else {
        return ApiResponse::transport_failure(String::from_utf8_lossy(raw));
    };

    let headers = String::from_utf8_lossy(&raw[..header_end]);
    let payload = &raw[header_end + 4..];
    let body = if is_chunked(&headers) {
        decode_chunked(payload).unwrap_or_else(|| payload.to_vec())
    } else {
        payload.to_vec()
    };
    let body = String::from_utf8_lossy(&body).into_owned();

    match parse_status(&headers) {
        Some(status) => ApiResponse::new(status, body),
        None => ApiResponse::transport_failure(body),
    }
}

/// The three characters after the first space of the status line.
fn parse_status(headers: &str) -> Option<u16> {
    let status_line = headers.lines().next()?;
    let space = status_line.find(' ')?;
    status_line.get(space + 1..space + 4)?.parse().ok()
}

fn is_chunked(headers: &str) -> bool {
    headers.lines().skip(1).any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding")
                && value.to_ascii_lowercase().contains("chunked")
        })
    })
}

fn decode_chunked(mut data: &[u8]) -> Option<Vec<u8>> {
    let mut decoded = Vec::with_capacity(data.len());
    loop {
        let line_end = find(data, b"\r\n")?;
        let size_line = std::str::from_utf8(&data[..line_end]).ok()?;
        let size_hex = size_line.split(';').next()?.trim();
        let size = usize::from_str_radix(size_hex, 16).ok()?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Some(decoded);
        }
        decoded.extend_from_slice(data.get(..size)?);
        data = data.get(size..)?.strip_prefix(b"\r\n".as_slice())?;
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
