use std::cmp;
use std::io::{self, BufRead, Read};
use std::str;

use crate::error::InvalidResponseKind;
use crate::parsing::buffers;

const MAX_LINE_LEN: u64 = 4096;

fn parse_chunk_size(line: &[u8]) -> io::Result<u64> {
    // Chunk extensions after ';' are ignored.
    let size = line.split(|&b| b == b';').next().unwrap_or_default();
    let size = str::from_utf8(buffers::trim_whitespace(size)).map_err(|_| InvalidResponseKind::ChunkSize)?;
    u64::from_str_radix(size, 16).map_err(|_| InvalidResponseKind::ChunkSize.into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Waiting for a chunk size line.
    Size,
    /// Inside a chunk with this many bytes left.
    Data(u64),
    /// Terminating chunk and trailers consumed.
    Done,
}

/// Decodes a `Transfer-Encoding: chunked` body.
#[derive(Debug)]
pub struct ChunkedReader<R> {
    inner: R,
    state: State,
    line: Vec<u8>,
}

impl<R> ChunkedReader<R>
where
    R: BufRead,
{
    pub fn new(inner: R) -> ChunkedReader<R> {
        ChunkedReader {
            inner,
            state: State::Size,
            line: Vec::new(),
        }
    }

    fn read_line(&mut self) -> io::Result<()> {
        buffers::read_line(&mut self.inner, &mut self.line, MAX_LINE_LEN)?;
        Ok(())
    }

    fn read_chunk_size(&mut self) -> io::Result<u64> {
        self.read_line()?;
        parse_chunk_size(&self.line)
    }

    fn read_chunk_end(&mut self) -> io::Result<()> {
        self.read_line()?;
        if self.line.is_empty() {
            Ok(())
        } else {
            Err(InvalidResponseKind::Chunk.into())
        }
    }

    fn skip_trailers(&mut self) -> io::Result<()> {
        loop {
            self.read_line()?;
            if self.line.is_empty() {
                return Ok(());
            }
            debug!("ignoring trailer {:?}", String::from_utf8_lossy(&self.line));
        }
    }
}

impl<R> Read for ChunkedReader<R>
where
    R: BufRead,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            match self.state {
                State::Done => return Ok(0),
                State::Size => {
                    let size = self.read_chunk_size()?;
                    debug!("new chunk of size {}", size);
                    if size == 0 {
                        self.skip_trailers()?;
                        self.state = State::Done;
                    } else {
                        self.state = State::Data(size);
                    }
                }
                State::Data(remaining) => {
                    let count = cmp::min(remaining, buf.len() as u64) as usize;
                    let n = self.inner.read(&mut buf[..count])?;
                    if n == 0 {
                        return Err(io::ErrorKind::UnexpectedEof.into());
                    }

                    let remaining = remaining - n as u64;
                    if remaining == 0 {
                        self.read_chunk_end()?;
                        self.state = State::Size;
                    } else {
                        self.state = State::Data(remaining);
                    }
                    return Ok(n);
                }
            }
        }
    }
}
