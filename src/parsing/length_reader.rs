use std::cmp;
use std::io::{self, Read};

/// Reads exactly `length` bytes from the inner reader, as announced by `Content-Length`.
///
/// Hitting EOF before the announced length is an `UnexpectedEof` error.
#[derive(Debug)]
pub struct LengthReader<R> {
    inner: R,
    remaining: u64,
}

impl<R> LengthReader<R>
where
    R: Read,
{
    pub fn new(inner: R, length: u64) -> LengthReader<R> {
        LengthReader {
            inner,
            remaining: length,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }
}

impl<R> Read for LengthReader<R>
where
    R: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }

        let count = cmp::min(buf.len() as u64, self.remaining) as usize;
        let n = self.inner.read(&mut buf[..count])?;
        if n == 0 {
            debug!("connection closed with {} bytes of body left", self.remaining);
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        self.remaining -= n as u64;
        Ok(n)
    }
}
