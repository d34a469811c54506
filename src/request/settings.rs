use std::time::Duration;

use http::HeaderMap;

const DEFAULT_MAX_HEADERS: usize = 100;
const DEFAULT_MAX_REDIRECTIONS: u32 = 5;
const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a `RequestBuilder` can tune. Redirected requests reuse the same settings.
#[derive(Clone, Debug)]
pub struct BaseSettings {
    /// Sent with every request, after the defaults are filled in.
    pub headers: HeaderMap,
    pub max_headers: usize,
    pub max_redirections: u32,
    pub follow_redirects: bool,
    /// Per connection attempt.
    pub connect_timeout: Duration,
    /// Per socket read.
    pub read_timeout: Duration,
    /// Whole exchange; `None` is unlimited.
    pub timeout: Option<Duration>,
    #[cfg(feature = "flate2")]
    pub allow_compression: bool,
}

impl Default for BaseSettings {
    fn default() -> Self {
        BaseSettings {
            headers: HeaderMap::new(),
            max_headers: DEFAULT_MAX_HEADERS,
            max_redirections: DEFAULT_MAX_REDIRECTIONS,
            follow_redirects: true,
            connect_timeout: DEFAULT_SOCKET_TIMEOUT,
            read_timeout: DEFAULT_SOCKET_TIMEOUT,
            timeout: None,
            #[cfg(feature = "flate2")]
            allow_compression: true,
        }
    }
}
