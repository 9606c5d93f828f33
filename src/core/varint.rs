use crate::error::ScanError;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Maximum number of 7-bit groups a length prefix may span
pub const MAX_VARINT_BYTES: usize = 5;

/// Decode a varint from the stream, one byte at a time. Each byte carries
/// 7 data bits, accumulated least-significant-group-first; the top bit is
/// the continuation flag. Blocks on the underlying read, so callers are
/// responsible for bounding total time.
pub async fn read_varint<S>(stream: &mut S) -> Result<u64, ScanError>
where
    S: AsyncRead + Unpin,
{
    let mut result: u64 = 0;
    let mut shift = 0;
    for _ in 0..MAX_VARINT_BYTES {
        let byte = stream.read_u8().await?;
        result |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
    Err(ScanError::VarintTooLong)
}

/// Encode a value into varint bytes, the inverse of [`read_varint`]
pub fn encode_varint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            return out;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanStatus;

    #[tokio::test]
    async fn test_single_group_values_decode_unchanged() {
        for value in [0u8, 1, 5, 42, 127] {
            let bytes = [value, 0xff];
            let mut stream = &bytes[..];
            let decoded = read_varint(&mut stream).await.unwrap();
            assert_eq!(decoded, u64::from(value));
            // Exactly one byte consumed
            assert_eq!(stream.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_multi_group_roundtrip() {
        for value in [128u64, 300, 32800, 0xffff_ffff, (1 << 35) - 1] {
            let bytes = encode_varint(value);
            assert!(bytes.len() <= MAX_VARINT_BYTES);
            let mut stream = &bytes[..];
            assert_eq!(read_varint(&mut stream).await.unwrap(), value);
            assert!(stream.is_empty());
        }
    }

    #[tokio::test]
    async fn test_six_continuation_bytes_is_malformed() {
        let bytes = [0x80u8, 0x80, 0x80, 0x80, 0x80, 0x01];
        let mut stream = &bytes[..];
        let err = read_varint(&mut stream).await.unwrap_err();
        assert!(matches!(err, ScanError::VarintTooLong));
        assert_eq!(err.status(), ScanStatus::ProtocolError);
    }

    #[tokio::test]
    async fn test_eof_mid_varint_is_transport_error() {
        let bytes = [0x80u8, 0x80];
        let mut stream = &bytes[..];
        let err = read_varint(&mut stream).await.unwrap_err();
        assert!(matches!(err, ScanError::Io(_)));
    }
}
