use core::{error::Error, net::Ipv4Addr, str::FromStr};

use bytes::Bytes;
use http::{header, uri::Scheme, HeaderName, HeaderValue, Method, Request, Uri};
use http_body_util::Full;
use rustls::pki_types::ServerName;

use crate::random;

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Request template shared by all workers.
///
/// Validated once at startup, so building a request from it is not expected to
/// fail.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    /// Absolute target URL, as configured.
    url: Uri,
    /// Origin-form request target, i.e. path and query.
    path: Uri,
    /// Value of the "Host" header, taken from the URL authority.
    host: HeaderValue,
    /// Port to connect to.
    port: u16,
    /// TLS server name, for "https" targets only.
    server_name: Option<ServerName<'static>>,
    body: Bytes,
    referer: HeaderValue,
    forwarded_for: bool,
}

impl RequestSpec {
    /// Constructs a new [`RequestSpec`].
    ///
    /// An empty `referer` defaults to the target URL.
    pub fn new(method: &str, url: &str, body: Bytes, referer: &str, forwarded_for: bool) -> Result<Self, Box<dyn Error>> {
        let method = Method::from_str(method).map_err(|err| format!("invalid method '{method}': {err}"))?;
        let uri = Uri::from_str(url).map_err(|err| format!("invalid URL '{url}': {err}"))?;

        let tls = match uri.scheme() {
            Some(scheme) if *scheme == Scheme::HTTP => false,
            Some(scheme) if *scheme == Scheme::HTTPS => true,
            Some(scheme) => return Err(format!("unsupported URL scheme '{scheme}'").into()),
            None => return Err(format!("URL '{url}' must be absolute").into()),
        };
        let authority = match uri.authority() {
            Some(authority) if !authority.host().is_empty() => authority,
            _ => return Err(format!("URL '{url}' has no host").into()),
        };

        // Userinfo never goes into the "Host" header.
        let host = match authority.port() {
            Some(port) => HeaderValue::from_str(&format!("{}:{port}", authority.host()))?,
            None => HeaderValue::from_str(authority.host())?,
        };
        let port = authority.port_u16().unwrap_or(if tls { 443 } else { 80 });
        let server_name = if tls {
            let name = trim_brackets(authority.host()).to_string();
            let name = ServerName::try_from(name).map_err(|err| format!("invalid TLS server name: {err}"))?;
            Some(name)
        } else {
            None
        };
        let path = match uri.path_and_query() {
            Some(v) => Uri::from_str(v.as_str())?,
            None => Uri::from_static("/"),
        };

        let referer = match referer {
            "" => url,
            referer => referer,
        };
        let referer = HeaderValue::from_str(referer).map_err(|err| format!("invalid referer '{referer}': {err}"))?;

        let m = Self {
            method,
            url: uri,
            path,
            host,
            port,
            server_name,
            body,
            referer,
            forwarded_for,
        };

        Ok(m)
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn url(&self) -> &Uri {
        &self.url
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    #[inline]
    pub fn referer(&self) -> &HeaderValue {
        &self.referer
    }

    #[inline]
    pub fn forwarded_for(&self) -> bool {
        self.forwarded_for
    }

    /// Returns the host and port to connect to.
    #[inline]
    pub fn endpoint(&self) -> (&str, u16) {
        // Validated in the constructor.
        let host = self.url.host().unwrap_or_default();

        (trim_brackets(host), self.port)
    }

    /// Returns the TLS server name if the target is served over "https".
    #[inline]
    pub fn server_name(&self) -> Option<&ServerName<'static>> {
        self.server_name.as_ref()
    }

    /// Builds a new request from this template.
    ///
    /// A fresh random "X-Forwarded-For" address is generated for each call,
    /// when enabled.
    pub fn build(&self) -> Result<Request<Full<Bytes>>, http::Error> {
        let body = if self.method == Method::GET || self.method == Method::HEAD {
            Bytes::new()
        } else {
            self.body.clone()
        };

        let mut request = Request::builder()
            .method(self.method.clone())
            .uri(self.path.clone())
            .header(header::HOST, self.host.clone())
            .header(header::REFERER, self.referer.clone());

        if self.forwarded_for {
            let addr: Ipv4Addr = random::ipv4();
            request = request.header(X_FORWARDED_FOR, addr.to_string());
        }

        request.body(Full::new(body))
    }
}

/// Brackets are not part of an IPv6 host when resolving.
#[inline]
fn trim_brackets(host: &str) -> &str {
    host.trim_start_matches('[').trim_end_matches(']')
}
