//! `Content-Length` framing.

use serde_json::Value;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const HEADER: &str = "Content-Length:";

/// Largest body accepted from the server.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Write one JSON value as a framed message and flush.
pub async fn write_frame<W>(writer: &mut W, value: &Value) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_string(value)?;
    let header = format!("{} {}\r\n\r\n", HEADER, body.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(body.as_bytes()).await?;
    writer.flush().await
}

/// Read one framed message body.
///
/// Returns `Ok(None)` on a clean end of stream between frames. Blank lines
/// and unknown headers before the body are skipped; an end of stream in the
/// middle of a frame is an `UnexpectedEof` error, and a length above
/// [`MAX_FRAME_LEN`] is `InvalidData`.
pub async fn read_frame<R>(reader: &mut R, line: &mut String) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let Some(length) = read_content_length(reader, line).await? else {
        return Ok(None);
    };
    if length > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {} bytes exceeds limit of {}", length, MAX_FRAME_LEN),
        ));
    }

    // Remaining headers up to the blank separator
    loop {
        line.clear();
        if reader.read_line(line).await? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed inside frame header",
            ));
        }
        if line.trim().is_empty() {
            break;
        }
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;
    Ok(Some(String::from_utf8_lossy(&body).into_owned()))
}

async fn read_content_length<R>(reader: &mut R, line: &mut String) -> io::Result<Option<usize>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        line.clear();
        if reader.read_line(line).await? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(value) = trimmed.strip_prefix(HEADER) {
            return value.trim().parse::<usize>().map(Some).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid Content-Length: {}", value.trim()),
                )
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_frames_survive_a_pipe() {
        let (mut client, server) = tokio::io::duplex(1024);
        let mut reader = BufReader::new(server);

        write_frame(&mut client, &json!({"type": "token", "content": "Größe"}))
            .await
            .unwrap();
        write_frame(&mut client, &json!({"type": "done"})).await.unwrap();
        drop(client);

        let mut line = String::new();
        let first = read_frame(&mut reader, &mut line).await.unwrap().unwrap();
        let first: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(first["content"], "Größe");

        let second = read_frame(&mut reader, &mut line).await.unwrap().unwrap();
        assert_eq!(second, r#"{"type":"done"}"#);
    }

    #[tokio::test]
    async fn test_clean_eof_between_frames() {
        let mut reader = BufReader::new(&b"\r\n"[..]);
        let mut line = String::new();
        assert!(read_frame(&mut reader, &mut line).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_extra_headers_are_skipped() {
        let raw = b"Content-Length: 2\r\nContent-Type: application/json\r\n\r\n{}";
        let mut reader = BufReader::new(&raw[..]);
        let mut line = String::new();
        assert_eq!(
            read_frame(&mut reader, &mut line).await.unwrap().as_deref(),
            Some("{}")
        );
    }

    #[tokio::test]
    async fn test_truncated_body_is_an_error() {
        let raw = b"Content-Length: 10\r\n\r\n{}";
        let mut reader = BufReader::new(&raw[..]);
        let mut line = String::new();
        let err = read_frame(&mut reader, &mut line).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_oversized_length_is_rejected_before_allocating() {
        let raw = b"Content-Length: 18446744073709551615\r\n\r\n{}";
        let mut reader = BufReader::new(&raw[..]);
        let mut line = String::new();
        let err = read_frame(&mut reader, &mut line).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let raw = format!("Content-Length: {}\r\n\r\n", MAX_FRAME_LEN + 1);
        let mut reader = BufReader::new(raw.as_bytes());
        let err = read_frame(&mut reader, &mut line).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_bad_length_is_an_error() {
        let raw = b"Content-Length: lots\r\n\r\n{}";
        let mut reader = BufReader::new(&raw[..]);
        let mut line = String::new();
        let err = read_frame(&mut reader, &mut line).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
