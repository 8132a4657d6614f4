use core::time::Duration;
use std::io;

use thiserror::Error;

/// Coarse classification of request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be built from its template.
    RequestBuild,
    /// Connection, handshake, send or timeout failure.
    Transport,
    /// The response body stream was interrupted.
    BodyRead,
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("failed to build request: {0}")]
    Build(#[from] http::Error),
    #[error("failed to connect: {0}")]
    Connect(#[from] io::Error),
    #[error("HTTP exchange failed: {0}")]
    Exchange(#[source] hyper::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to read response body: {0}")]
    Body(#[source] hyper::Error),
}

impl IssueError {
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Build(..) => ErrorKind::RequestBuild,
            Self::Connect(..) | Self::Exchange(..) | Self::Timeout(..) => ErrorKind::Transport,
            Self::Body(..) => ErrorKind::BodyRead,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_kind() {
        let err = http::Request::builder().method("BAD METHOD").body(()).unwrap_err();
        assert_eq!(ErrorKind::RequestBuild, IssueError::from(err).kind());

        let err = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(ErrorKind::Transport, IssueError::from(err).kind());

        assert_eq!(ErrorKind::Transport, IssueError::Timeout(Duration::from_secs(1)).kind());
    }
}
