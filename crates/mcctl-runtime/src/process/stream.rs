//! Async stream line readers (non-UTF8-safe).
//!
//! Modded servers and their JVM can emit non-UTF8 bytes on stdout/stderr.
//! Using `BufReader::lines()` would end the reader on invalid UTF-8, so lines
//! are read as bytes and decoded lossily.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// Which pipe a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Forward each line of `stream` into `tx` until EOF, a read error, or the
/// receiver going away.
///
/// The channel closes once every reader feeding it has exited, which the
/// consumer treats as the child's output having ended.
pub fn spawn_stream_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    kind: StreamKind,
    tx: mpsc::Sender<String>,
) {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = decode_line(&mut buf);
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(stream = kind.as_str(), error = %e, "Output reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(stream = kind.as_str(), "Output reader task exiting");
    });
}

/// Strip the line terminator and decode lossily.
fn decode_line(buf: &mut Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    String::from_utf8_lossy(buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line_strips_terminators() {
        assert_eq!(decode_line(&mut b"hello\r\n".to_vec()), "hello");
        assert_eq!(decode_line(&mut b"hello\n".to_vec()), "hello");
        assert_eq!(decode_line(&mut b"no newline".to_vec()), "no newline");
    }

    #[test]
    fn test_decode_line_is_lossy() {
        assert_eq!(decode_line(&mut b"bad \xff byte\n".to_vec()), "bad \u{fffd} byte");
    }

    #[tokio::test]
    async fn test_reader_forwards_lines_then_closes() {
        let (tx, mut rx) = mpsc::channel(8);
        let input: &'static [u8] = b"one\ntwo\r\nthree";
        spawn_stream_reader(input, StreamKind::Stdout, tx);

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        assert_eq!(lines, vec!["one", "two", "three"]);
    }
}
