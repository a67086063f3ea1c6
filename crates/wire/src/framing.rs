// SPDX-License-Identifier: MIT

//! Wire format for process-boundary IPC: 4-byte length prefix (big-endian)
//! + JSON payload. Used both for the control-plane socket and for the
//! engine's stdio-JSON transport launchers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Guards against a corrupt or malicious length prefix demanding an
/// unbounded read.
const MAX_MESSAGE_BYTES: u32 = 64 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message of {0} bytes exceeds the {max} byte limit", max = MAX_MESSAGE_BYTES)]
    TooLarge(u32),
}

/// Serialize `value` to JSON with no length prefix.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write `payload` prefixed with its length as 4 big-endian bytes.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::TooLarge(u32::MAX))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a length-prefixed message, returning the raw payload bytes.
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes).await?;
    let len = u32::from_be_bytes(len_bytes);
    if len > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::TooLarge(len));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

pub async fn write_envelope<W: AsyncWrite + Unpin, T: Serialize>(writer: &mut W, value: &T) -> Result<(), ProtocolError> {
    write_message(writer, &encode(value)?).await
}

pub async fn read_envelope<R: AsyncRead + Unpin, T: DeserializeOwned>(reader: &mut R) -> Result<T, ProtocolError> {
    decode(&read_message(reader).await?)
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
