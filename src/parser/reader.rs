//! Line-oriented reading of request heads.

use std::io::{self, BufRead, ErrorKind};

use tokio::io::{AsyncRead, AsyncReadExt};

/// Finish a line: drop a trailing `\r` and decode it lossily.
fn finish_line(mut line: Vec<u8>) -> String {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    String::from_utf8_lossy(&line).into_owned()
}

/// Read one `\n`-terminated line, a byte at a time.
///
/// The buffer starts at `capacity` bytes and doubles as needed. Returns
/// `Ok(None)` when the stream ends before any byte is read; a final line
/// without `\n` is returned as-is.
pub(crate) async fn read_line<R>(reader: &mut R, capacity: usize) -> io::Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    let mut line = Vec::with_capacity(capacity);
    loop {
        match reader.read_u8().await {
            Ok(b'\n') => break,
            Ok(byte) => line.push(byte),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(Some(finish_line(line)))
}

/// Blocking counterpart of [`read_line`] for requests already in memory.
pub(crate) fn read_line_blocking<R>(reader: &mut R, capacity: usize) -> io::Result<Option<String>>
where
    R: BufRead,
{
    let mut line = Vec::with_capacity(capacity);
    let read = reader.read_until(b'\n', &mut line)?;
    if read == 0 {
        return Ok(None);
    }
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    Ok(Some(finish_line(line)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_strips_crlf() {
        let mut input: &[u8] = b"GET / HTTP/1.0\r\nHost: a\n\r\n";

        assert_eq!(read_line(&mut input, 4).await.unwrap().as_deref(), Some("GET / HTTP/1.0"));
        assert_eq!(read_line(&mut input, 4).await.unwrap().as_deref(), Some("Host: a"));
        assert_eq!(read_line(&mut input, 4).await.unwrap().as_deref(), Some(""));
        assert_eq!(read_line(&mut input, 4).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_line_returns_partial_final_line() {
        let mut input: &[u8] = b"GET /unterminated";
        assert_eq!(read_line(&mut input, 2).await.unwrap().as_deref(), Some("GET /unterminated"));
        assert_eq!(read_line(&mut input, 2).await.unwrap(), None);
    }

    #[test]
    fn test_read_line_blocking() {
        let mut input: &[u8] = b"first\r\nsecond";
        assert_eq!(read_line_blocking(&mut input, 8).unwrap().as_deref(), Some("first"));
        assert_eq!(read_line_blocking(&mut input, 8).unwrap().as_deref(), Some("second"));
        assert_eq!(read_line_blocking(&mut input, 8).unwrap(), None);
    }
}
