use std::io::{self, Read, Write};

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::parsing::CompressedReader;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// The `ResponseReader` is used to read the body of a response.
///
/// The data returned by `Read` is the body after transfer framing and content decoding
/// have been removed. Prefer the helper methods, which read the whole body at once.
#[derive(Debug)]
pub struct ResponseReader {
    inner: CompressedReader,
}

impl ResponseReader {
    pub(crate) fn new(reader: CompressedReader) -> ResponseReader {
        ResponseReader { inner: reader }
    }

    /// Write the response to any object that implements `Write`.
    pub fn write_to<W>(mut self, mut writer: W) -> Result<u64>
    where
        W: Write,
    {
        let n = io::copy(&mut self.inner, &mut writer)?;
        Ok(n)
    }

    /// Read the response to a `Vec` of bytes.
    pub fn bytes(self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Read the response body to a `String`, assuming UTF-8.
    ///
    /// Invalid sequences are replaced with U+FFFD instead of raising an error.
    pub fn text(self) -> Result<String> {
        let bytes = self.bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Parse the response body as JSON encoded in UTF-8.
    ///
    /// A leading byte order mark is skipped.
    pub fn json<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.bytes()?;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
        Ok(serde_json::from_slice(body)?)
    }
}

impl Read for ResponseReader {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
