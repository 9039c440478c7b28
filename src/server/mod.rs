use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};

use thiserror::Error;

use crate::analysis::AnalysisCache;

pub mod api;
pub mod routes;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const ENV_BIND: &str = "BALANCE_LAB_BIND";
/// Upper bound on header block plus body; catalogs are small.
pub const MAX_REQUEST_BYTES: usize = 4 * 1024 * 1024;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

pub fn run_server(bind_addr: &str) -> io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    let cache = AnalysisCache::default();
    tracing::info!("balance_lab server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = serve_connection(stream, &cache) {
                    tracing::warn!(error = %err, "request error");
                }
            }
            Err(err) => tracing::warn!(error = %err, "connection failed"),
        }
    }

    Ok(())
}

/// Request line and body of one HTTP/1.1 request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Why a request could not be read. Everything except `Io` is answered with an error status.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("request exceeds the size limit")]
    TooLarge,

    #[error("malformed request: {0}")]
    Malformed(&'static str),
}

/// Reads headers up to the blank line, then exactly `Content-Length` body bytes, however the
/// peer splits them across reads. `Ok(None)` when the peer closes before sending anything.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Option<HttpRequest>, ReadError> {
    let mut received = Vec::with_capacity(4096);
    let mut chunk = [0_u8; 8192];

    let header_end = loop {
        if let Some(position) = find_terminator(&received) {
            break position;
        }
        if received.len() > MAX_REQUEST_BYTES {
            return Err(ReadError::TooLarge);
        }
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            if received.is_empty() {
                return Ok(None);
            }
            return Err(ReadError::Malformed("connection closed inside headers"));
        }
        received.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&received[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let (Some(method), Some(path)) = (request_line.next(), request_line.next()) else {
        return Err(ReadError::Malformed("missing request line"));
    };

    let content_length = match lines.find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("content-length")
            .then(|| value.trim())
    }) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ReadError::Malformed("invalid content-length"))?,
        None => 0,
    };
    let body_start = header_end + HEADER_TERMINATOR.len();
    if content_length > MAX_REQUEST_BYTES.saturating_sub(body_start) {
        return Err(ReadError::TooLarge);
    }

    while received.len() < body_start + content_length {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            return Err(ReadError::Malformed("connection closed inside body"));
        }
        received.extend_from_slice(&chunk[..read]);
    }

    let body = &received[body_start..body_start + content_length];
    Ok(Some(HttpRequest {
        method: method.to_string(),
        path: path.to_string(),
        body: String::from_utf8_lossy(body).into_owned(),
    }))
}

fn find_terminator(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
}

fn serve_connection(mut stream: TcpStream, cache: &AnalysisCache) -> io::Result<()> {
    let response = match read_request(&mut stream) {
        Ok(Some(request)) => {
            tracing::debug!(method = %request.method, path = %request.path, "request");
            routes::route_request(&request.method, &request.path, &request.body, cache)
        }
        Ok(None) => return Ok(()),
        Err(ReadError::Io(err)) => return Err(err),
        Err(ReadError::TooLarge) => {
            routes::error_response(413, "Payload Too Large", "Request exceeds size limit")
        }
        Err(ReadError::Malformed(reason)) => routes::error_response(400, "Bad Request", reason),
    };
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()
}
