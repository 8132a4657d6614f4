use std::error::Error;

use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Initializes logging for this crate, with timestamps in UTC.
///
/// Third-party crates only report warnings and errors, such as TLS alerts.
pub fn init(verbose: u8) -> Result<(), Box<dyn Error>> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level(env!("CARGO_CRATE_NAME"), level(verbose))
        .with_utc_timestamps()
        .init()?;

    Ok(())
}

/// Maps the number of "-v" flags to the crate log level.
fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level() {
        assert_eq!(LevelFilter::Info, level(0));
        assert_eq!(LevelFilter::Debug, level(1));
        assert_eq!(LevelFilter::Trace, level(2));
        assert_eq!(LevelFilter::Trace, level(u8::MAX));
    }
}
