#![allow(clippy::needless_doctest_main)]
//! This crate fetches a Eurostat dataset and prints it for humans.
//!
//! It contains a small blocking HTTP/1.1 client and a pretty printer that lays JSON values out
//! the way Python's `pprint` does. The two meet in [`report`], which writes the request URL, the
//! status line of the response and the pretty-printed body.
//!
//! # Quick start
//! ```no_run
//! fn main() -> statfetch::Result {
//!     let stdout = std::io::stdout();
//!     let mut out = stdout.lock();
//!     statfetch::report(&statfetch::HttpFetcher, statfetch::gdp_query_url(), &mut out)
//! }
//! ```
//!
//! # Features
//! * `compress` support for decompressing response bodies using `miniz_oxide` (**default**)
//! * `compress-zlib` support for decompressing response bodies using `zlib`
//! * `compress-zlib-ng` support for decompressing response bodies using `zlib-ng`
//! * `tls-rustls` support for `https` URLs using `rustls` (**default**)
//!
//! # Logging
//! Requests, redirections and connection attempts are logged with the `log` crate. The binary
//! installs `env_logger`, so `RUST_LOG=statfetch=debug` shows them on stderr.

#[macro_use]
extern crate log;

mod error;
mod happy;
mod parsing;
pub mod pretty;
mod query;
pub mod report;
mod request;
mod streams;
mod tls;

pub use crate::error::{Error, ErrorKind, InvalidResponseKind, Result};
pub use crate::parsing::{Response, ResponseReader};
pub use crate::pretty::PrettyPrinter;
pub use crate::query::{gdp_query_url, GDP_QUERY_URL};
pub use crate::report::{report, Fetch, HttpFetcher, Reply};
pub use crate::request::{PreparedRequest, RequestBuilder};

/// Re-exports of the `http` crate's header types.
pub mod header {
    pub use http::header::*;
}

pub use http::{Method, StatusCode};

/// Create a new `RequestBuilder` with the GET method.
pub fn get<U>(base_url: U) -> RequestBuilder
where
    U: AsRef<str>,
{
    RequestBuilder::new(Method::GET, base_url)
}

/// Create a new `RequestBuilder` with the HEAD method.
pub fn head<U>(base_url: U) -> RequestBuilder
where
    U: AsRef<str>,
{
    RequestBuilder::new(Method::HEAD, base_url)
}
