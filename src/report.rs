//! Fetch a URL once and report on it.
//!
//! The report is written in a fixed order: the URL, the status line, then the body pretty-printed
//! as JSON. Any failure stops the report where it happens; lines already written stay written.

use std::io::Write;

use http::{Method, StatusCode};
use serde_json::Value;

use crate::error::Result;
use crate::parsing::Response;
use crate::pretty::PrettyPrinter;
use crate::request::RequestBuilder;

/// What the report needs from a response.
pub trait Reply {
    /// The numeric status.
    fn status(&self) -> StatusCode;

    /// The reason phrase sent along with the status.
    fn reason(&self) -> &str;

    /// Consume the reply and parse its body as JSON.
    fn json_value(self) -> Result<Value>;
}

impl Reply for Response {
    fn status(&self) -> StatusCode {
        Response::status(self)
    }

    fn reason(&self) -> &str {
        Response::reason(self)
    }

    fn json_value(self) -> Result<Value> {
        Response::json_value(self)
    }
}

/// Performs the request the report is about.
pub trait Fetch {
    type Reply: Reply;

    fn fetch(&self, url: &str) -> Result<Self::Reply>;
}

/// Fetches with a plain GET and default settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl Fetch for HttpFetcher {
    type Reply = Response;

    fn fetch(&self, url: &str) -> Result<Response> {
        RequestBuilder::try_new(Method::GET, url)?.send()
    }
}

/// Format the status line of the report.
pub fn status_line(status: StatusCode, reason: &str) -> String {
    format!("Request returned {} : '{}'", status.as_u16(), reason)
}

/// Run the report for `url`, writing it to `out`.
///
/// The URL is written before the request is sent, so it is present even when the fetch fails.
/// The status line is written before the body is parsed, so it is present even when the body is
/// not JSON.
pub fn report<F, W>(fetcher: &F, url: &str, out: &mut W) -> Result
where
    F: Fetch,
    W: Write,
{
    writeln!(out, "{}", url)?;

    let reply = fetcher.fetch(url)?;
    writeln!(out, "{}", status_line(reply.status(), reply.reason()))?;
    out.flush()?;

    let payload = reply.json_value()?;
    PrettyPrinter::new().indent(1).pprint(&payload, out)?;
    out.flush()?;

    Ok(())
}
