use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::fetcher::transport::{Connector, Target};
use crate::fetcher::{render_body, FetchError, FetchOutcome, Fetcher};

/// Hand-written HTTP/1.0 exchange over a raw tokio (or tokio-rustls) stream.
///
/// HTTP/1.0 lets the server close the connection to delimit the body, so
/// the response is read to EOF and parsed in one go.
#[derive(Clone)]
pub struct SocketFetcher {
    connector: Connector,
}

impl SocketFetcher {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Fetcher for SocketFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let target = Target::parse(url)?;
        let mut stream = self.connector.connect(&target).await?;

        let request = format!(
            "GET {} HTTP/1.0\r\nHost: {}\r\n\r\n",
            target.path,
            target.authority()
        );

        stream
            .write_all(request.as_bytes())
            .await
            .map_err(|e| FetchError::transport(&e))?;
        stream.flush().await.map_err(|e| FetchError::transport(&e))?;

        let mut raw = Vec::new();
        if let Err(e) = stream.read_to_end(&mut raw).await {
            // Servers that skip TLS close_notify still delivered a full body.
            if e.kind() != std::io::ErrorKind::UnexpectedEof || raw.is_empty() {
                return Err(FetchError::transport(&e));
            }
        }

        let response = RawResponse::parse(&raw)?;
        if response.status >= 400 {
            return Err(FetchError::HttpStatus {
                status: response.status,
                reason: response.reason,
            });
        }

        Ok(render_body(&response.body))
    }
}

/// A fully buffered HTTP/1.x response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn parse(raw: &[u8]) -> Result<Self, FetchError> {
        let (head_len, separator_len) = find_head_end(raw)
            .ok_or_else(|| FetchError::Transport("truncated HTTP response head".into()))?;

        let head = String::from_utf8_lossy(&raw[..head_len]);
        let mut lines = head.lines();

        let status_line = lines
            .next()
            .ok_or_else(|| FetchError::Transport("empty HTTP response".into()))?;
        let (status, reason) = parse_status_line(status_line)?;

        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();

        let payload = &raw[head_len + separator_len..];
        let chunked = headers
            .iter()
            .any(|(name, value)| name == "transfer-encoding" && value.eq_ignore_ascii_case("chunked"));

        let body = if chunked {
            decode_chunked(payload)?
        } else {
            payload.to_vec()
        };

        Ok(Self {
            status,
            reason,
            headers,
            body,
        })
    }
}

/// Locates the blank line ending the head, whichever line ending comes first.
fn find_head_end(raw: &[u8]) -> Option<(usize, usize)> {
    let crlf = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| (pos, 4));
    let lf = raw
        .windows(2)
        .position(|w| w == b"\n\n")
        .map(|pos| (pos, 2));

    match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn parse_status_line(line: &str) -> Result<(u16, String), FetchError> {
    let mut parts = line.trim_end().splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(FetchError::Transport(format!(
            "malformed HTTP status line: {}",
            line
        )));
    }

    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| FetchError::Transport(format!("malformed HTTP status line: {}", line)))?;
    let reason = parts.next().unwrap_or_default().to_string();

    Ok((status, reason))
}

fn decode_chunked(mut payload: &[u8]) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();

    loop {
        let line_end = payload
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| FetchError::Transport("truncated chunk header".into()))?;

        let size_text = String::from_utf8_lossy(&payload[..line_end]);
        let size_text = size_text.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_text, 16)
            .map_err(|_| FetchError::Transport(format!("invalid chunk size: {}", size_text)))?;

        payload = &payload[line_end + 2..];
        if size == 0 {
            return Ok(body);
        }
        if payload.len() < size {
            return Err(FetchError::Transport("truncated chunk body".into()));
        }

        body.extend_from_slice(&payload[..size]);
        payload = payload[size..].strip_prefix(b"\r\n").unwrap_or(&payload[size..]);
    }
}
