use std::io::{self, BufReader, Read, Write};
use std::str;

use http::{
    header::{HeaderName, HeaderValue, TRANSFER_ENCODING},
    HeaderMap, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{InvalidResponseKind, Result};
use crate::parsing::buffers::{self, decode_latin1, trim_whitespace};
use crate::parsing::{body_reader::BodyReader, compressed_reader::CompressedReader, ResponseReader};
use crate::request::PreparedRequest;
use crate::streams::BaseStream;

const MAX_LINE_LEN: u64 = 16 * 1024;

/// The status line and headers of a response.
#[derive(Debug)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub reason: String,
    pub headers: HeaderMap,
}

fn parse_status_line(line: &[u8]) -> Result<(StatusCode, String)> {
    let mut parts = line.splitn(3, |&b| b == b' ');

    let version = parts.next().ok_or(InvalidResponseKind::StatusLine)?;
    if !version.starts_with(b"HTTP/") {
        return Err(InvalidResponseKind::StatusLine.into());
    }

    let code = parts.next().ok_or(InvalidResponseKind::StatusLine)?;
    let status = str::from_utf8(code)
        .map_err(|_| InvalidResponseKind::StatusCode)?
        .parse()
        .map_err(|_| InvalidResponseKind::StatusCode)?;

    // The reason phrase may be absent, and may contain spaces of its own.
    let reason = parts.next().map(trim_whitespace).map(decode_latin1).unwrap_or_default();

    Ok((status, reason))
}

pub fn parse_response_head<R>(reader: &mut BufReader<R>, max_headers: usize) -> Result<ResponseHead>
where
    R: Read,
{
    let mut line = Vec::new();
    let mut headers = HeaderMap::new();

    buffers::read_line(reader, &mut line, MAX_LINE_LEN)?;
    let (status, reason) = parse_status_line(&line)?;

    let mut current: Vec<u8> = Vec::new();
    loop {
        buffers::read_line(reader, &mut line, MAX_LINE_LEN)?;
        if line.is_empty() {
            break;
        }

        // obs-fold: a line starting with whitespace continues the previous header value.
        if line[0] == b' ' || line[0] == b'\t' {
            if current.is_empty() {
                return Err(InvalidResponseKind::Header.into());
            }
            current.push(b' ');
            current.extend_from_slice(trim_whitespace(&line));
            continue;
        }

        if !current.is_empty() {
            append_header(&mut headers, &current, max_headers)?;
        }
        current.clear();
        current.extend_from_slice(&line);
    }

    if !current.is_empty() {
        append_header(&mut headers, &current, max_headers)?;
    }

    Ok(ResponseHead {
        status,
        reason,
        headers,
    })
}

fn append_header(headers: &mut HeaderMap, line: &[u8], max_headers: usize) -> Result {
    if headers.len() == max_headers {
        return Err(InvalidResponseKind::Header.into());
    }

    let col = line
        .iter()
        .position(|&c| c == b':')
        .ok_or(InvalidResponseKind::Header)?;

    let name = trim_whitespace(&line[..col]);
    let value = trim_whitespace(&line[col + 1..]);

    let name = match HeaderName::from_bytes(name) {
        Ok(val) => val,
        Err(err) => {
            warn!("Dropped invalid response header: {}", err);
            return Ok(());
        }
    };

    headers.append(name, HeaderValue::from_bytes(value).map_err(http::Error::from)?);
    Ok(())
}

pub fn parse_response(reader: BaseStream, request: &PreparedRequest) -> Result<Response> {
    let mut reader = BufReader::new(reader);
    let ResponseHead {
        status,
        reason,
        mut headers,
    } = parse_response_head(&mut reader, request.base_settings.max_headers)?;

    let body_reader = BodyReader::new(&headers, request.method(), status, reader)?;
    let compressed_reader = CompressedReader::new(&headers, body_reader);
    let response_reader = ResponseReader::new(compressed_reader);

    // Remove HOP-BY-HOP headers
    headers.remove(TRANSFER_ENCODING);

    Ok(Response {
        status,
        reason,
        headers,
        reader: response_reader,
    })
}

/// `Response` represents a response returned by a server.
///
/// The connection stays open until the body has been consumed or the `Response` is dropped.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    reason: String,
    headers: HeaderMap,
    reader: ResponseReader,
}

impl Response {
    /// Get the status code of this `Response`.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the reason phrase exactly as the server sent it, trimmed.
    ///
    /// This is empty when the status line carries no reason phrase.
    #[inline]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Get the headers of this `Response`.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Checks if the status code of this `Response` was a success code.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Write the response to any object that implements `Write`.
    #[inline]
    pub fn write_to<W>(self, writer: W) -> Result<u64>
    where
        W: Write,
    {
        self.reader.write_to(writer)
    }

    /// Read the response to a `Vec` of bytes.
    #[inline]
    pub fn bytes(self) -> Result<Vec<u8>> {
        self.reader.bytes()
    }

    /// Read the response to a `String`, assuming UTF-8. The conversion is lossy.
    #[inline]
    pub fn text(self) -> Result<String> {
        self.reader.text()
    }

    /// Parse the response as a JSON object and return it.
    #[inline]
    pub fn json<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.reader.json()
    }

    /// Parse the response as an untyped JSON value.
    #[inline]
    pub fn json_value(self) -> Result<Value> {
        self.json()
    }
}

impl Read for Response {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}
