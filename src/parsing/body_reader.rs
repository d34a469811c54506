use std::io::{self, BufReader, Read};
use std::str;

use http::header::{HeaderMap, CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{Method, StatusCode};

use crate::error::{InvalidResponseKind, Result};
use crate::parsing::buffers::trim_whitespace;
use crate::parsing::{ChunkedReader, LengthReader};
use crate::streams::BaseStream;

/// Frames the response body according to the response head.
///
/// Every variant owns the connection, so the socket is released when the body is dropped.
#[derive(Debug)]
pub enum BodyReader {
    Chunked(ChunkedReader<BufReader<BaseStream>>),
    Length(LengthReader<BufReader<BaseStream>>),
    Close(BufReader<BaseStream>),
}

impl Read for BodyReader {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            BodyReader::Chunked(r) => r.read(buf),
            BodyReader::Length(r) => r.read(buf),
            BodyReader::Close(r) => r.read(buf),
        }
    }
}

fn is_chunked(headers: &HeaderMap) -> bool {
    // Only the last transfer coding decides the framing.
    headers
        .get_all(TRANSFER_ENCODING)
        .into_iter()
        .filter_map(|val| val.to_str().ok())
        .flat_map(|val| val.split(','))
        .map(str::trim)
        .filter(|coding| !coding.is_empty())
        .last()
        .map_or(false, |coding| coding.eq_ignore_ascii_case("chunked"))
}

fn content_length(headers: &HeaderMap) -> Result<Option<u64>> {
    match headers.get(CONTENT_LENGTH) {
        None => Ok(None),
        Some(val) => {
            let val = str::from_utf8(trim_whitespace(val.as_bytes())).map_err(|_| InvalidResponseKind::ContentLength)?;
            let len = val.parse().map_err(|_| InvalidResponseKind::ContentLength)?;
            Ok(Some(len))
        }
    }
}

fn has_no_body(method: &Method, status: StatusCode) -> bool {
    method == Method::HEAD
        || status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED
}

impl BodyReader {
    pub fn new(
        headers: &HeaderMap,
        method: &Method,
        status: StatusCode,
        reader: BufReader<BaseStream>,
    ) -> Result<BodyReader> {
        if has_no_body(method, status) {
            debug!("response has no body");
            Ok(BodyReader::Length(LengthReader::new(reader, 0)))
        } else if is_chunked(headers) {
            debug!("using chunked reader");
            Ok(BodyReader::Chunked(ChunkedReader::new(reader)))
        } else if let Some(len) = content_length(headers)? {
            debug!("using length reader with length {}", len);
            Ok(BodyReader::Length(LengthReader::new(reader, len)))
        } else {
            debug!("no framing headers, reading until the connection closes");
            Ok(BodyReader::Close(reader))
        }
    }

    /// True when the body is known to be empty before reading it.
    pub fn is_empty(&self) -> bool {
        matches!(self, BodyReader::Length(r) if r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use http::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, TRANSFER_ENCODING};

    use super::{content_length, is_chunked};
    use crate::error::{ErrorKind, InvalidResponseKind};

    #[test]
    fn test_is_chunked() {
        let mut headers = HeaderMap::new();
        assert!(!is_chunked(&headers));

        headers.insert(TRANSFER_ENCODING, HeaderValue::from_static("gzip, Chunked"));
        assert!(is_chunked(&headers));

        headers.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked, gzip"));
        assert!(!is_chunked(&headers));
    }

    #[test]
    fn test_content_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(content_length(&headers).unwrap(), None);

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static(" 42 "));
        assert_eq!(content_length(&headers).unwrap(), Some(42));

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("-1"));
        let err = content_length(&headers).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidResponse(InvalidResponseKind::ContentLength)
        ));
    }
}
