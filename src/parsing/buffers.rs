use std::io::{self, BufRead, Read};

/// Read one line terminated by LF or CRLF into `buf`, without the terminator.
///
/// At most `max_len` bytes are consumed. A line that is not terminated within that limit,
/// or before EOF, is an `UnexpectedEof` error. Returns the number of bytes consumed.
pub fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>, max_len: u64) -> io::Result<usize>
where
    R: BufRead,
{
    buf.clear();
    let n = (&mut *reader).take(max_len).read_until(b'\n', buf)?;

    if buf.ends_with(b"\r\n") {
        buf.truncate(buf.len() - 2);
    } else if buf.ends_with(b"\n") {
        buf.truncate(buf.len() - 1);
    } else {
        return Err(io::ErrorKind::UnexpectedEof.into());
    }

    Ok(n)
}

/// Decode ISO-8859-1 bytes. Every byte maps to the code point of the same value.
pub fn decode_latin1(buf: &[u8]) -> String {
    buf.iter().map(|&b| char::from(b)).collect()
}

/// Trim spaces and horizontal tabs on both ends.
pub fn trim_whitespace(buf: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| *b == b' ' || *b == b'\t';
    let start = buf.iter().position(|b| !is_ws(b)).unwrap_or(buf.len());
    let end = buf.iter().rposition(|b| !is_ws(b)).map_or(start, |n| n + 1);
    &buf[start..end]
}

#[cfg(test)]
mod tests {
    use std::io::{self, BufReader};

    use super::*;

    #[test]
    fn test_read_line_lf() {
        let mut reader = BufReader::new(&b"hello\nworld\n"[..]);
        let mut line = Vec::new();

        assert_eq!(read_line(&mut reader, &mut line, u64::MAX).ok(), Some(6));
        assert_eq!(line, b"hello");

        assert_eq!(read_line(&mut reader, &mut line, u64::MAX).ok(), Some(6));
        assert_eq!(line, b"world");
    }

    #[test]
    fn test_read_line_crlf() {
        let mut reader = BufReader::new(&b"hello\r\nworld\r\n"[..]);
        let mut line = Vec::new();

        assert_eq!(read_line(&mut reader, &mut line, u64::MAX).ok(), Some(7));
        assert_eq!(line, b"hello");

        assert_eq!(read_line(&mut reader, &mut line, u64::MAX).ok(), Some(7));
        assert_eq!(line, b"world");
    }

    #[test]
    fn test_read_line_empty_crlf() {
        let mut reader = BufReader::new(&b"\r\n"[..]);
        let mut line = Vec::new();

        assert_eq!(read_line(&mut reader, &mut line, u64::MAX).ok(), Some(2));
        assert_eq!(line, b"");
    }

    #[test]
    fn test_read_line_unterminated() {
        let mut reader = BufReader::new(&b"hello"[..]);
        let mut line = Vec::new();

        assert_eq!(
            read_line(&mut reader, &mut line, u64::MAX).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_read_line_beyond_limit() {
        let mut reader = BufReader::new(&b"1234567890\n"[..]);
        let mut line = Vec::new();

        assert_eq!(
            read_line(&mut reader, &mut line, 5).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
        assert_eq!(line, b"12345");
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(b"Not Found"), "Not Found");
        assert_eq!(decode_latin1(b"Gef\xfcllt"), "Gefüllt");
    }

    #[test]
    fn test_trim_whitespace() {
        assert_eq!(trim_whitespace(b" \t hello \t"), b"hello");
        assert_eq!(trim_whitespace(b"   "), b"");
        assert_eq!(trim_whitespace(b""), b"");
    }
}
