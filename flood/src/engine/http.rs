pub use self::{
    error::{ErrorKind, IssueError},
    issuer::HttpIssuer,
    spec::RequestSpec,
    tls::connector as tls_connector,
};

mod error;
mod issuer;
mod spec;
mod tls;
