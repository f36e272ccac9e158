//! # Read Loop
//!
//! Feeds input lines to the dispatcher and writes each reply.
//!
//! ```text
//! line ──► Dispatcher::dispatch ──► Reply
//!                                    ├── Applied(lines)  → print each line
//!                                    ├── Rejected(err)   → print "Invalid"
//!                                    ├── Ignored         → print nothing
//!                                    └── Quit            → stop reading
//! ```
//!
//! Output is flushed after every command so a driving process sees each
//! response before it sends the next line.
//!
//! Lines are read as raw bytes. Anything that is not UTF-8 is decoded
//! lossily and then fails validation like any other non-ASCII token, so a
//! bad line is answered with `Invalid` instead of ending the session.

use std::borrow::Cow;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use tome_core::{Dispatcher, Reply, INVALID_MARKER};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `quit` or `exit`.
    Quit,
    /// The input closed.
    EndOfInput,
}

/// Runs commands until `quit`/`exit` or end of input.
pub async fn run<R, W>(dispatcher: &mut Dispatcher, mut input: R, output: &mut W) -> std::io::Result<Exit>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = decode_line(&buf);

        match dispatcher.dispatch(&line) {
            Reply::Ignored => continue,
            Reply::Quit => return Ok(Exit::Quit),
            Reply::Applied(response) => {
                for text in response.as_lines() {
                    output.write_all(text.as_bytes()).await?;
                    output.write_all(b"\n").await?;
                }
            }
            Reply::Rejected(reason) => {
                debug!(%line, %reason, "Invalid");
                output.write_all(INVALID_MARKER.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
        }
        output.flush().await?;
    }

    Ok(Exit::EndOfInput)
}

/// Strips the line terminator (`\n` or `\r\n`) and decodes the rest.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}
