// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::error::FrameError;

/// Maximum accepted size, in bytes, of a quote response body (excluding the
/// trailing newline), to bound buffering.
pub const MAX_RESPONSE_LEN: usize = 64 * 1024;

/// `{"quote":"<text>","error":"<message>"}\n` — exactly one of `quote` and
/// `error` is non-empty in a well-formed response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(default)]
    pub quote: String,
    #[serde(default)]
    pub error: String,
}

impl QuoteResponse {
    pub fn quote(text: impl Into<String>) -> Self {
        QuoteResponse {
            quote: text.into(),
            error: String::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        QuoteResponse {
            quote: String::new(),
            error: message.into(),
        }
    }
}

/// Writes a single JSON response terminated by exactly one newline.
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &QuoteResponse,
) -> Result<(), FrameError> {
    let mut data = serde_json::to_vec(response)?;
    data.push(b'\n');
    writer.write_all(&data).await?;
    Ok(())
}

/// Reads a single JSON response up to the first newline, bounded by
/// [`MAX_RESPONSE_LEN`].
pub async fn read_response<R: AsyncRead + Unpin>(
    reader: &mut R,
    max_len: usize,
) -> Result<QuoteResponse, FrameError> {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = reader.read(&mut byte).await?;
        if n == 0 {
            return Err(FrameError::ConnectionClosed);
        }
        if byte[0] == b'\n' {
            break;
        }
        buf.push(byte[0]);
        if buf.len() > max_len {
            return Err(FrameError::ResponseTooLarge { max: max_len });
        }
    }
    Ok(serde_json::from_slice(&buf)?)
}
