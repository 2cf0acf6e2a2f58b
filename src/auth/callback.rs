use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use url::Url;

use crate::error::QuesthookError;

pub const CONFIRMATION_BODY: &str = "Token received. You can close this window now.";
const ABORTED_BODY: &str = "No token provided. Return to your terminal and run the deploy again.";

const MAX_REQUEST_HEAD: usize = 8192;

/// Loopback listener that receives exactly one browser redirect.
///
/// The socket is owned by [`CallbackListener::wait_for_token`] and closed when
/// that future finishes, whatever the outcome. Connections that close or stall
/// without sending a request line (browser preconnects) are ignored; once a
/// request has been answered, further connections are refused.
#[derive(Debug)]
pub struct CallbackListener {
    listener: TcpListener,
    port: u16,
}

impl CallbackListener {
    /// Bind to an ephemeral port on 127.0.0.1.
    pub async fn bind() -> Result<Self, QuesthookError> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        tracing::debug!("Callback listener bound on 127.0.0.1:{port}");
        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Redirect target handed to the authorization page.
    pub fn callback_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Wait for the single callback request and return its `token` parameter.
    ///
    /// With `timeout` set to `None` this waits until the request arrives or the
    /// process is terminated.
    pub async fn wait_for_token(self, timeout: Option<Duration>) -> Result<String, QuesthookError> {
        let port = self.port;
        let serve = serve_first_request(self.listener);

        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, serve)
                .await
                .map_err(|_| QuesthookError::AuthTimeout(limit))?,
            None => serve.await,
        };

        tracing::debug!("Callback listener on port {port} closed");
        result
    }
}

async fn serve_first_request(listener: TcpListener) -> Result<String, QuesthookError> {
    // Heads are read concurrently so an idle socket cannot hold up the redirect.
    let mut pending = JoinSet::new();

    let (mut stream, target) = loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (mut stream, peer) = accepted?;
                tracing::debug!("Callback connection from {peer}");
                pending.spawn(async move {
                    let head = read_request_head(&mut stream).await;
                    (stream, peer, head)
                });
            }
            Some(joined) = pending.join_next() => {
                let Ok((stream, peer, head)) = joined else {
                    continue;
                };
                let target = match head {
                    Ok(head) => request_target(&head).map(str::to_string),
                    Err(e) => {
                        tracing::debug!("Failed to read from {peer}: {e}");
                        None
                    }
                };
                match target {
                    Some(target) => break (stream, target),
                    None => tracing::debug!("Ignoring connection from {peer} without a request"),
                }
            }
        }
    };
    drop(listener);
    pending.abort_all();

    match token_from_target(&target) {
        Some(token) => {
            write_response(&mut stream, "200 OK", CONFIRMATION_BODY).await?;
            Ok(token)
        }
        None => {
            if let Err(e) = write_response(&mut stream, "400 Bad Request", ABORTED_BODY).await {
                tracing::debug!("Failed to answer aborted callback: {e}");
            }
            Err(QuesthookError::AuthAborted)
        }
    }
}

/// Read until the end of the request headers, EOF, or the size cap.
async fn read_request_head(stream: &mut TcpStream) -> Result<String, QuesthookError> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.len() >= MAX_REQUEST_HEAD {
            break;
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn write_response(
    stream: &mut TcpStream,
    status: &str,
    body: &str,
) -> Result<(), QuesthookError> {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Request target of an HTTP request line (`GET /?token=... HTTP/1.1`).
fn request_target(head: &str) -> Option<&str> {
    let mut parts = head.lines().next()?.split_whitespace();
    let _method = parts.next()?;
    let target = parts.next()?;
    parts
        .next()
        .filter(|version| version.starts_with("HTTP/"))
        .map(|_| target)
}

/// Non-empty `token` query parameter of a request target.
fn token_from_target(target: &str) -> Option<String> {
    let url = Url::parse("http://localhost").ok()?.join(target).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}
