use core::num::NonZero;

use clap::{builder::BoolishValueParser, ArgAction, Parser};

/// Default target, a large static file served over plain HTTP.
pub const DEFAULT_URL: &str = "http://cachefly.cachefly.net/100mb.test";

/// The HTTP flood we deserve.
///
/// Every option can also be set through the environment variable shown in
/// brackets, which is the primary way to configure a containerized run.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cmd {
    /// Number of workers, each hammering the target in a loop.
    #[clap(short, long, env = "THREAD", default_value = "16")]
    pub threads: NonZero<usize>,
    /// Target URL.
    ///
    /// Both "http://" and "https://" URLs are supported.
    #[clap(long, env = "URL", default_value = DEFAULT_URL)]
    pub url: String,
    /// HTTP method.
    #[clap(long, env = "METHOD", default_value = "GET")]
    pub method: String,
    /// Request body, sent with every method except GET and HEAD.
    #[clap(long, env = "POST_DATA", default_value = "")]
    pub post_data: String,
    /// Value of the "Referer" header.
    ///
    /// Falls back to the target URL when empty.
    #[clap(long, env = "referer", default_value = "")]
    pub referer: String,
    /// Attach a random "X-Forwarded-For" address to each request.
    #[clap(
        long,
        env = "X_FORWARDED_FOR",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
    )]
    pub x_forwarded_for: bool,
    /// Per-request timeout in milliseconds.
    ///
    /// Covers connection and receipt of the response headers, but not the
    /// body.
    #[clap(long, env = "TIMEOUT_MS", default_value_t = 1000)]
    pub timeout_ms: u64,
    /// Minimum delay in milliseconds before retrying a failed request.
    ///
    /// Zero (the default) retries immediately.
    #[clap(long, env = "RETRY_DELAY_MS", default_value_t = 0)]
    pub retry_delay_ms: u64,
    /// Enable TCP_NODELAY socket option.
    #[clap(
        long,
        env = "TCP_NO_DELAY",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
    )]
    pub tcp_no_delay: bool,
    /// Be verbose in terms of logging.
    #[clap(short, action = ArgAction::Count)]
    pub verbose: u8,
}
