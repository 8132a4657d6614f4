use core::{error::Error, num::NonZero, time::Duration};
use std::sync::Arc;

use bytes::Bytes;

use crate::{cmd::Cmd, engine::http::RequestSpec};

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of workers.
    pub threads: NonZero<usize>,
    /// Request template shared by all workers.
    pub request: Arc<RequestSpec>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Minimum delay before retrying a failed request.
    ///
    /// If none given (the default) failed requests are retried immediately.
    pub retry_delay: Option<Duration>,
    /// Enable SOCK_NODELAY socket option.
    pub tcp_no_delay: bool,
}

impl TryFrom<Cmd> for Config {
    type Error = Box<dyn Error>;

    fn try_from(cmd: Cmd) -> Result<Self, Self::Error> {
        let Cmd {
            threads,
            url,
            method,
            post_data,
            referer,
            x_forwarded_for,
            timeout_ms,
            retry_delay_ms,
            tcp_no_delay,
            verbose: _,
        } = cmd;

        if timeout_ms == 0 {
            return Err("timeout must be positive".into());
        }

        let request = RequestSpec::new(&method, &url, Bytes::from(post_data), &referer, x_forwarded_for)?;
        let retry_delay = match retry_delay_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        let m = Self {
            threads,
            request: Arc::new(request),
            timeout: Duration::from_millis(timeout_ms),
            retry_delay,
            tcp_no_delay,
        };

        Ok(m)
    }
}

#[cfg(test)]
mod test {
    use clap::{CommandFactory, Parser};

    use super::*;
    use crate::cmd::DEFAULT_URL;

    fn cmd() -> Cmd {
        Cmd {
            threads: NonZero::new(16).unwrap(),
            url: DEFAULT_URL.to_string(),
            method: "GET".to_string(),
            post_data: String::new(),
            referer: String::new(),
            x_forwarded_for: false,
            timeout_ms: 1000,
            retry_delay_ms: 0,
            tcp_no_delay: false,
            verbose: 0,
        }
    }

    #[test]
    fn test_defaults() {
        let command = Cmd::command();
        for (id, expected) in [
            ("threads", "16"),
            ("url", DEFAULT_URL),
            ("method", "GET"),
            ("post_data", ""),
            ("referer", ""),
            ("x_forwarded_for", "false"),
            ("timeout_ms", "1000"),
            ("retry_delay_ms", "0"),
            ("tcp_no_delay", "false"),
        ] {
            let arg = command.get_arguments().find(|v| v.get_id() == id).unwrap();
            let values: Vec<_> = arg.get_default_values().iter().filter_map(|v| v.to_str()).collect();
            assert_eq!(vec![expected], values, "{id}");
        }

        let cfg = Config::try_from(cmd()).unwrap();
        assert_eq!(16, cfg.threads.get());
        assert_eq!("GET", cfg.request.method().as_str());
        assert_eq!(DEFAULT_URL, cfg.request.referer().to_str().unwrap());
        assert_eq!(Duration::from_secs(1), cfg.timeout);
        assert_eq!(None, cfg.retry_delay);
        assert!(!cfg.tcp_no_delay);
    }

    #[test]
    fn test_flags() {
        let cmd = Cmd::try_parse_from([
            "flood",
            "-t",
            "4",
            "--url",
            "http://127.0.0.1:8080/",
            "--method",
            "POST",
            "--post-data",
            "a=b",
            "--referer",
            "http://example.com/",
            "--x-forwarded-for",
            "--retry-delay-ms",
            "10",
        ])
        .unwrap();
        assert!(cmd.x_forwarded_for);

        let cfg = Config::try_from(cmd).unwrap();
        assert_eq!(4, cfg.threads.get());
        assert_eq!("POST", cfg.request.method().as_str());
        assert_eq!("http://127.0.0.1:8080/", cfg.request.url().to_string());
        assert_eq!("http://example.com/", cfg.request.referer().to_str().unwrap());
        assert!(cfg.request.forwarded_for());
        assert_eq!(Some(Duration::from_millis(10)), cfg.retry_delay);
    }

    #[test]
    fn test_forwarded_for_literals() {
        for (v, expected) in [("true", true), ("1", true), ("yes", true), ("false", false), ("0", false)] {
            let arg = format!("--x-forwarded-for={v}");
            let cmd = Cmd::try_parse_from(["flood", arg.as_str()]).unwrap();
            assert_eq!(expected, cmd.x_forwarded_for, "{v}");
        }
    }

    #[test]
    fn test_tcp_no_delay_literals() {
        for (v, expected) in [("true", true), ("1", true), ("yes", true), ("false", false), ("0", false)] {
            let arg = format!("--tcp-no-delay={v}");
            let cmd = Cmd::try_parse_from(["flood", arg.as_str()]).unwrap();
            assert_eq!(expected, cmd.tcp_no_delay, "{v}");
        }

        let cmd = Cmd::try_parse_from(["flood", "--tcp-no-delay"]).unwrap();
        assert!(cmd.tcp_no_delay);
    }

    #[test]
    fn test_https_accepted() {
        let cmd = Cmd {
            url: "https://example.com/".to_string(),
            ..cmd()
        };
        let cfg = Config::try_from(cmd).unwrap();

        assert_eq!(("example.com", 443), cfg.request.endpoint());
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(Cmd::try_parse_from(["flood", "-t", "0"]).is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let cmd = Cmd {
            url: "not a url".to_string(),
            ..cmd()
        };

        assert!(Config::try_from(cmd).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cmd = Cmd { timeout_ms: 0, ..cmd() };

        assert!(Config::try_from(cmd).is_err());
    }
}
