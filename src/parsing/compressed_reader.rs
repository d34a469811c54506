use std::io::{self, Read};

#[cfg(feature = "flate2")]
use flate2::read::{DeflateDecoder, GzDecoder};
use http::header::HeaderMap;
#[cfg(feature = "flate2")]
use http::header::{CONTENT_ENCODING, TRANSFER_ENCODING};

use crate::parsing::body_reader::BodyReader;

#[allow(clippy::large_enum_variant)]
#[derive(Debug)]
pub enum CompressedReader {
    Plain(BodyReader),
    #[cfg(feature = "flate2")]
    Deflate(DeflateDecoder<BodyReader>),
    #[cfg(feature = "flate2")]
    Gzip(GzDecoder<BodyReader>),
}

#[cfg(feature = "flate2")]
fn have_encoding(headers: &HeaderMap, enc: &str) -> bool {
    headers
        .get_all(CONTENT_ENCODING)
        .into_iter()
        .chain(headers.get_all(TRANSFER_ENCODING))
        .filter_map(|val| val.to_str().ok())
        .flat_map(|val| val.split(','))
        .any(|item| item.trim().eq_ignore_ascii_case(enc))
}

impl CompressedReader {
    #[cfg(feature = "flate2")]
    pub fn new(headers: &HeaderMap, reader: BodyReader) -> CompressedReader {
        if !reader.is_empty() {
            if have_encoding(headers, "gzip") {
                debug!("creating gzip decoder");
                return CompressedReader::Gzip(GzDecoder::new(reader));
            }

            if have_encoding(headers, "deflate") {
                debug!("creating deflate decoder");
                return CompressedReader::Deflate(DeflateDecoder::new(reader));
            }
        }
        CompressedReader::Plain(reader)
    }

    #[cfg(not(feature = "flate2"))]
    pub fn new(_: &HeaderMap, reader: BodyReader) -> CompressedReader {
        CompressedReader::Plain(reader)
    }
}

impl Read for CompressedReader {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            CompressedReader::Plain(s) => s.read(buf),
            #[cfg(feature = "flate2")]
            CompressedReader::Deflate(s) => s.read(buf),
            #[cfg(feature = "flate2")]
            CompressedReader::Gzip(s) => s.read(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::prelude::*;

    #[cfg(feature = "flate2")]
    use flate2::{
        write::{DeflateEncoder, GzEncoder},
        Compression,
    };
    #[cfg(feature = "flate2")]
    use http::header::{HeaderMap, HeaderValue};
    use http::Method;

    #[cfg(feature = "flate2")]
    use super::have_encoding;
    use crate::parsing::response::parse_response;
    use crate::request::PreparedRequest;
    use crate::streams::BaseStream;

    fn respond(head: &str, payload: &[u8], method: Method) -> String {
        let mut buf: Vec<u8> = head.as_bytes().to_vec();
        buf.extend(payload);

        let req = PreparedRequest::new(method, "http://ec.europa.eu");
        let response = parse_response(BaseStream::mock(buf), &req).unwrap();
        response.text().unwrap()
    }

    #[test]
    #[cfg(feature = "flate2")]
    fn test_have_encoding() {
        let mut headers = HeaderMap::new();
        headers.insert("content-encoding", HeaderValue::from_static("gzip"));
        assert!(have_encoding(&headers, "gzip"));
        assert!(!have_encoding(&headers, "deflate"));

        headers.insert("content-encoding", HeaderValue::from_static("identity, Deflate"));
        assert!(have_encoding(&headers, "deflate"));

        let mut headers = HeaderMap::new();
        headers.insert("transfer-encoding", HeaderValue::from_static("gzip, chunked"));
        assert!(have_encoding(&headers, "gzip"));
    }

    #[test]
    fn test_stream_plain() {
        let payload = b"{\"value\": [1, 2, 3]}";
        let head = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", payload.len());
        assert_eq!(respond(&head, payload, Method::GET), "{\"value\": [1, 2, 3]}");
    }

    #[test]
    #[cfg(feature = "flate2")]
    fn test_stream_deflate() {
        let mut payload = Vec::new();
        let mut enc = DeflateEncoder::new(&mut payload, Compression::default());
        enc.write_all(b"Hello world!!!!!!!!").unwrap();
        enc.finish().unwrap();

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Encoding: deflate\r\n\r\n",
            payload.len()
        );
        assert_eq!(respond(&head, &payload, Method::GET), "Hello world!!!!!!!!");
    }

    #[test]
    #[cfg(feature = "flate2")]
    fn test_stream_gzip_chunked() {
        let mut payload = Vec::new();
        let mut enc = GzEncoder::new(&mut payload, Compression::default());
        enc.write_all(b"Hello world!!!!!!!!").unwrap();
        enc.finish().unwrap();

        let mut chunked = format!("{:x}\r\n", payload.len()).into_bytes();
        chunked.extend(&payload);
        chunked.extend(b"\r\n0\r\n\r\n");

        let head = "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nContent-Encoding: gzip\r\n\r\n";
        assert_eq!(respond(head, &chunked, Method::GET), "Hello world!!!!!!!!");
    }

    #[test]
    fn test_no_body_with_gzip() {
        let head = "HTTP/1.1 200 OK\r\ncontent-encoding: gzip\r\ncontent-length: 0\r\n\r\n";
        assert_eq!(respond(head, b"", Method::GET), "");
    }

    #[test]
    fn test_no_body_with_gzip_head() {
        let head = "HTTP/1.1 200 OK\r\ncontent-encoding: gzip\r\ncontent-length: 100\r\n\r\n";
        assert_eq!(respond(head, b"", Method::HEAD), "");
    }
}
