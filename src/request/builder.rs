use std::borrow::Borrow;
use std::convert::TryInto;
use std::time::Duration;

use http::header::{HeaderValue, IntoHeaderName, ACCEPT, CONNECTION, USER_AGENT};
use http::Method;
use url::Url;

use crate::error::{Error, ErrorKind, Result};
use crate::parsing::Response;
use crate::request::{header_append, header_insert, header_insert_if_missing, BaseSettings, PreparedRequest};

const DEFAULT_USER_AGENT: &str = concat!("statfetch/", env!("CARGO_PKG_VERSION"));

/// Configures a request before it is sent.
///
/// Obtained from `statfetch::get`, `statfetch::head` or `RequestBuilder::try_new`. Every setting
/// has a default, so `send` can be called right away.
#[derive(Debug)]
pub struct RequestBuilder {
    url: Url,
    method: Method,
    settings: BaseSettings,
}

impl RequestBuilder {
    /// Start a request with `method` to `url`.
    ///
    /// # Panics
    /// When `url` does not parse or `method` is CONNECT. Use `try_new` to get an error instead.
    pub fn new<U>(method: Method, url: U) -> Self
    where
        U: AsRef<str>,
    {
        Self::try_new(method, url).expect("invalid url or method")
    }

    /// Start a request with `method` to `url`.
    ///
    /// Fails with `InvalidBaseUrl` when `url` does not parse and with `ConnectNotSupported` for
    /// the CONNECT method.
    pub fn try_new<U>(method: Method, url: U) -> Result<Self>
    where
        U: AsRef<str>,
    {
        if method == Method::CONNECT {
            return Err(ErrorKind::ConnectNotSupported.into());
        }
        let url = Url::parse(url.as_ref()).map_err(|_| ErrorKind::InvalidBaseUrl)?;

        Ok(RequestBuilder {
            url,
            method,
            settings: BaseSettings::default(),
        })
    }

    /// Append `key=value` to the query string. Keys may repeat.
    pub fn param<K, V>(mut self, key: K, value: V) -> Self
    where
        K: AsRef<str>,
        V: ToString,
    {
        self.url.query_pairs_mut().append_pair(key.as_ref(), &value.to_string());
        self
    }

    /// Append every pair to the query string, in order. Keys may repeat.
    ///
    /// ```
    /// statfetch::get("http://ec.europa.eu/data").params(&[("geo", "NL"), ("geo", "DE")]);
    /// ```
    pub fn params<P, K, V>(mut self, pairs: P) -> Self
    where
        P: IntoIterator,
        P::Item: Borrow<(K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        {
            let mut query = self.url.query_pairs_mut();
            for pair in pairs {
                let (key, value) = pair.borrow();
                query.append_pair(key.as_ref(), &value.to_string());
            }
        }
        self
    }

    /// Set a header, replacing any value it had.
    ///
    /// # Panics
    /// When `value` is not a valid header value.
    pub fn header<H, V>(self, header: H, value: V) -> Self
    where
        H: IntoHeaderName,
        V: TryInto<HeaderValue>,
        Error: From<V::Error>,
    {
        self.try_header(header, value).expect("invalid header value")
    }

    /// Set a header, replacing any value it had.
    pub fn try_header<H, V>(mut self, header: H, value: V) -> Result<Self>
    where
        H: IntoHeaderName,
        V: TryInto<HeaderValue>,
        Error: From<V::Error>,
    {
        header_insert(&mut self.settings.headers, header, value)?;
        Ok(self)
    }

    /// Add one more value to a header.
    ///
    /// # Panics
    /// When `value` is not a valid header value.
    pub fn header_append<H, V>(mut self, header: H, value: V) -> Self
    where
        H: IntoHeaderName,
        V: TryInto<HeaderValue>,
        Error: From<V::Error>,
    {
        header_append(&mut self.settings.headers, header, value).expect("invalid header value");
        self
    }

    /// Responses with more headers than this are rejected. Defaults to 100.
    pub fn max_headers(mut self, max_headers: usize) -> Self {
        self.settings.max_headers = max_headers;
        self
    }

    /// Number of redirections followed before giving up with `TooManyRedirections`. Defaults to 5.
    pub fn max_redirections(mut self, max_redirections: u32) -> Self {
        self.settings.max_redirections = max_redirections;
        self
    }

    /// When false, a 3xx response is returned as is. Defaults to true.
    pub fn follow_redirects(mut self, follow_redirects: bool) -> Self {
        self.settings.follow_redirects = follow_redirects;
        self
    }

    /// Time allowed for each connection attempt. Defaults to 30 seconds.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.settings.connect_timeout = duration;
        self
    }

    /// Time allowed for each read on the socket. Defaults to 30 seconds.
    pub fn read_timeout(mut self, duration: Duration) -> Self {
        self.settings.read_timeout = duration;
        self
    }

    /// Time allowed for the whole exchange once connected. Unlimited by default.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.settings.timeout = Some(duration);
        self
    }

    /// Whether to send `accept-encoding: gzip, deflate`. Defaults to true.
    #[cfg(feature = "flate2")]
    pub fn allow_compression(mut self, allow_compression: bool) -> Self {
        self.settings.allow_compression = allow_compression;
        self
    }

    /// Freeze the settings and fill in the default headers.
    pub fn try_prepare(self) -> Result<PreparedRequest> {
        let mut prepped = PreparedRequest {
            url: self.url,
            method: self.method,
            base_settings: self.settings,
        };

        let headers = &mut prepped.base_settings.headers;
        header_insert(headers, CONNECTION, "close")?;
        header_insert_if_missing(headers, ACCEPT, "*/*")?;
        header_insert_if_missing(headers, USER_AGENT, DEFAULT_USER_AGENT)?;
        prepped.set_compression()?;

        Ok(prepped)
    }

    /// Prepare and send in one step.
    pub fn send(self) -> Result<Response> {
        self.try_prepare()?.send()
    }
}
