use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::io;
use std::result;

/// Errors that can occur while parsing the response from the server.
#[derive(Debug)]
pub enum InvalidResponseKind {
    /// Invalid or missing Location header in redirection
    LocationHeader,
    /// Invalid redirection URL
    RedirectionUrl,
    /// Status line
    StatusLine,
    /// Status code
    StatusCode,
    /// Error parsing header
    Header,
    /// Error decoding chunk size
    ChunkSize,
    /// Error decoding chunk
    Chunk,
    /// Invalid Content-Length header
    ContentLength,
}

impl Display for InvalidResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use InvalidResponseKind::*;

        match self {
            LocationHeader => write!(f, "missing or invalid location header"),
            RedirectionUrl => write!(f, "invalid redirection url"),
            StatusLine => write!(f, "invalid status line"),
            StatusCode => write!(f, "invalid status code"),
            Header => write!(f, "invalid header"),
            ChunkSize => write!(f, "invalid chunk size"),
            Chunk => write!(f, "invalid chunk"),
            ContentLength => write!(f, "invalid content length"),
        }
    }
}

impl From<InvalidResponseKind> for Error {
    fn from(kind: InvalidResponseKind) -> Error {
        ErrorKind::InvalidResponse(kind).into()
    }
}

impl From<InvalidResponseKind> for io::Error {
    fn from(kind: InvalidResponseKind) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, Error::from(kind))
    }
}

/// Common errors that can occur while fetching and reporting.
#[derive(Debug)]
pub enum ErrorKind {
    /// CONNECT is not supported.
    ConnectNotSupported,
    /// Error generated by the `http` crate.
    Http(http::Error),
    /// The base URL could not be parsed.
    InvalidBaseUrl,
    /// The URL has no host.
    InvalidUrlHost,
    /// The URL has no port and the scheme has no known default.
    InvalidUrlPort,
    /// The server sent something that is not valid HTTP.
    InvalidResponse(InvalidResponseKind),
    /// I/O error, including connection failures and timeouts.
    Io(io::Error),
    /// The body is not valid JSON.
    Json(serde_json::Error),
    /// An `https` URL was requested but TLS support is compiled out.
    TlsDisabled,
    /// The host name is not a valid DNS name for TLS.
    InvalidDnsName(String),
    /// TLS error.
    #[cfg(feature = "tls-rustls")]
    Tls(rustls::Error),
    /// Too many redirections were followed.
    TooManyRedirections,
}

/// A type that contains all the errors that can possibly occur while fetching and reporting.
#[derive(Debug)]
pub struct Error(pub(crate) Box<ErrorKind>);

impl Error {
    /// Get a reference to the `ErrorKind` inside.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume this `Error` and get the `ErrorKind` inside.
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }
}

impl Display for Error {
    fn fmt(&self, w: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::*;

        match *self.0 {
            ConnectNotSupported => write!(w, "CONNECT is not supported"),
            Http(ref e) => write!(w, "Http Error: {}", e),
            InvalidBaseUrl => write!(w, "Invalid base URL"),
            InvalidUrlHost => write!(w, "URL is missing a host"),
            InvalidUrlPort => write!(w, "URL is missing a port"),
            InvalidResponse(ref k) => write!(w, "InvalidResponse: {}", k),
            Io(ref e) => write!(w, "Io Error: {}", e),
            Json(ref e) => write!(w, "Json Error: {}", e),
            TlsDisabled => write!(w, "TLS is disabled, activate the tls-rustls feature"),
            InvalidDnsName(ref name) => write!(w, "Invalid DNS name: {}", name),
            #[cfg(feature = "tls-rustls")]
            Tls(ref e) => write!(w, "Tls Error: {}", e),
            TooManyRedirections => write!(w, "Too many redirections"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        use ErrorKind::*;

        match *self.0 {
            Io(ref e) => Some(e),
            Http(ref e) => Some(e),
            Json(ref e) => Some(e),
            #[cfg(feature = "tls-rustls")]
            Tls(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(err: ErrorKind) -> Error {
        Error(Box::new(err))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error(Box::new(ErrorKind::Io(err)))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Error {
        Error(Box::new(ErrorKind::Http(err)))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Error {
        Error(Box::new(ErrorKind::Http(http::Error::from(err))))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error(Box::new(ErrorKind::Json(err)))
    }
}

#[cfg(feature = "tls-rustls")]
impl From<rustls::Error> for Error {
    fn from(err: rustls::Error) -> Error {
        Error(Box::new(ErrorKind::Tls(err)))
    }
}

/// Wrapper for the `Result` type with an `Error`.
pub type Result<T = ()> = result::Result<T, Error>;
