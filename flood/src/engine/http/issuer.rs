use core::time::Duration;
use std::{io, sync::Arc};

use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::Incoming,
    client::conn::http1::{self, SendRequest},
};
use hyper_util::rt::TokioIo;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpStream,
};
use tokio_rustls::TlsConnector;

use super::{IssueError, RequestSpec};
use crate::engine::Issue;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

type Sender = SendRequest<Full<Bytes>>;

/// Performs HTTP requests built from a shared template.
///
/// Keeps a single HTTP/1.1 connection alive between calls. The connection is
/// only reused after the previous response body has been drained completely,
/// any failure drops it.
///
/// Targets served over "https" require a TLS connector.
pub struct HttpIssuer {
    /// Request template.
    spec: Arc<RequestSpec>,
    /// Currently active connection.
    sender: Option<Sender>,
    /// Limits connection, request transmission and receipt of the response
    /// headers. Body is drained without any limit.
    timeout: Duration,
    /// Enable SOCK_NODELAY socket option.
    tcp_no_delay: bool,
    /// TLS connector, shared between workers.
    tls: Option<TlsConnector>,
}

impl HttpIssuer {
    pub fn new(spec: Arc<RequestSpec>) -> Self {
        Self {
            spec,
            sender: None,
            timeout: DEFAULT_TIMEOUT,
            tcp_no_delay: false,
            tls: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tcp_no_delay(mut self, tcp_no_delay: bool) -> Self {
        self.tcp_no_delay = tcp_no_delay;
        self
    }

    pub fn with_tls(mut self, tls: Option<TlsConnector>) -> Self {
        self.tls = tls;
        self
    }

    /// Performs a single request and drains the response body.
    pub async fn issue(&mut self) -> Result<StatusCode, IssueError> {
        let request = self.spec.build()?;

        let timeout = self.timeout;
        let (sender, response) = match tokio::time::timeout(timeout, self.exchange(request)).await {
            Ok(rc) => rc?,
            Err(..) => return Err(IssueError::Timeout(timeout)),
        };

        let code = response.status();
        let mut body = response.into_body();
        while let Some(frame) = body.frame().await {
            frame.map_err(IssueError::Body)?;
        }

        self.sender = Some(sender);

        Ok(code)
    }

    #[inline]
    async fn exchange(&mut self, request: http::Request<Full<Bytes>>) -> Result<(Sender, Response<Incoming>), IssueError> {
        let mut sender = self.curr_sender().await?;
        let response = sender.send_request(request).await.map_err(IssueError::Exchange)?;

        Ok((sender, response))
    }

    /// Takes the currently active connection, if it is still usable.
    /// Otherwise, establishes a new one.
    #[inline]
    async fn curr_sender(&mut self) -> Result<Sender, IssueError> {
        if let Some(mut sender) = self.sender.take() {
            if sender.ready().await.is_ok() {
                return Ok(sender);
            }
            log::debug!("connection closed by peer, reconnecting");
        }

        let mut sender = self.reconnect().await?;
        sender.ready().await.map_err(IssueError::Exchange)?;

        Ok(sender)
    }

    async fn reconnect(&self) -> Result<Sender, IssueError> {
        let (host, port) = self.spec.endpoint();

        let stream = TcpStream::connect((host, port)).await?;
        if self.tcp_no_delay {
            stream.set_nodelay(true)?;
        }

        let sender = match (&self.tls, self.spec.server_name()) {
            (Some(tls), Some(name)) => {
                let stream = tls.connect(name.clone(), stream).await?;
                handshake(stream).await?
            }
            (None, Some(..)) => return Err(io::Error::other("TLS connector is not configured").into()),
            (.., None) => handshake(stream).await?,
        };
        log::debug!("connected to {host}:{port}");

        Ok(sender)
    }
}

/// Performs HTTP/1.1 handshake over the given stream, spawning the connection
/// task on the current runtime.
async fn handshake<T>(stream: T) -> Result<Sender, IssueError>
where
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (sender, conn) = http1::handshake(TokioIo::new(stream))
        .await
        .map_err(IssueError::Exchange)?;
    tokio::task::spawn(async move {
        if let Err(err) = conn.await {
            log::debug!("connection failed: {err}");
        }
    });

    Ok(sender)
}

impl Issue for HttpIssuer {
    #[inline]
    async fn issue(&mut self) -> Result<StatusCode, IssueError> {
        Self::issue(self).await
    }
}
