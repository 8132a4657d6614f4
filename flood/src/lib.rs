pub mod cfg;
pub mod cmd;
pub mod engine;
mod human;
pub mod logging;
pub mod qps;
mod random;
pub mod runtime;
pub mod sysstat;
