use crate::args::Config;
use crate::core::{probe, varint};
use crate::error::ScanError;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{Instant, timeout_at};

/// Largest banner length a server may declare in round one
pub const MAX_BANNER_LEN: u64 = 32800;

/// Exact reply length required in round two: a packet id byte plus an
/// 8 byte payload
pub const PONG_LEN: u64 = 9;

/// The two payloads returned by a completed exchange
#[derive(Debug)]
pub struct Exchange {
    pub banner1: Vec<u8>,
    pub banner2: Vec<u8>,
}

/// Drives the two probe/response rounds against one open connection.
///
/// Built once at startup and shared read-only across all targets; each
/// call to [`Grabber::exchange`] owns its own buffers and holds no state
/// between invocations.
pub struct Grabber {
    probe1: Vec<u8>,
    probe2: Vec<u8>,
    read_timeout: Duration,
}

impl Grabber {
    /// Parse the configured probe strings and build a grabber. A malformed
    /// probe escape fails here, before any connection is opened.
    pub fn new(config: &Config) -> Result<Grabber, ScanError> {
        Ok(Grabber {
            probe1: probe::parse(&config.probe1)?,
            probe2: probe::parse(&config.probe2)?,
            read_timeout: Duration::from_millis(config.read_timeout),
        })
    }

    /// Run both rounds on the stream and return the raw banners. Any
    /// failure at any step aborts immediately; no partial result escapes.
    pub async fn exchange<S>(&self, stream: &mut S) -> Result<Exchange, ScanError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        stream.write_all(&self.probe1).await?;

        let length = varint::read_varint(stream).await?;
        if length > MAX_BANNER_LEN {
            return Err(ScanError::BannerTooLong(length));
        }
        if length < 1 {
            return Err(ScanError::EmptyBanner);
        }
        let banner1 = read_bounded(stream, length as usize, self.read_timeout).await?;

        stream.write_all(&self.probe2).await?;

        let length = varint::read_varint(stream).await?;
        if length != PONG_LEN {
            return Err(ScanError::LengthMismatch { expected: PONG_LEN, actual: length });
        }
        let banner2 = read_bounded(stream, length as usize, self.read_timeout).await?;

        Ok(Exchange { banner1, banner2 })
    }
}

/// Read up to `declared` bytes under a wall-clock deadline measured from
/// the start of this phase. A peer that closes the connection early yields
/// a short buffer rather than an error; a deadline expiry yields
/// [`ScanError::ReadTimeout`] and no bytes.
async fn read_bounded<S>(
    stream: &mut S,
    declared: usize,
    read_timeout: Duration,
) -> Result<Vec<u8>, ScanError>
where
    S: AsyncRead + Unpin,
{
    let mut data = vec![0u8; declared];
    let mut total_read = 0;
    let deadline = Instant::now() + read_timeout;

    while total_read < declared {
        match timeout_at(deadline, stream.read(&mut data[total_read..])).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => total_read += n,
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(ScanError::ReadTimeout),
        }
    }

    data.truncate(total_read);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::varint::encode_varint;
    use crate::error::ScanStatus;

    fn test_grabber() -> Grabber {
        Grabber::new(&Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_exchange_succeeds_end_to_end() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        let server_task = tokio::spawn(async move {
            let mut probe = [0u8; 1];
            server.read_exact(&mut probe).await.unwrap();
            assert_eq!(&probe, b"\n");
            server.write_all(&[0x05, b'h', b'e', b'l', b'l', b'o']).await.unwrap();

            server.read_exact(&mut probe).await.unwrap();
            assert_eq!(&probe, b"\n");
            server.write_all(&[0x09]).await.unwrap();
            server.write_all(&[1, 2, 3, 4, 5, 6, 7, 8, 9]).await.unwrap();
            server
        });

        let result = test_grabber().exchange(&mut client).await.unwrap();
        assert_eq!(result.banner1, b"hello");
        assert_eq!(result.banner2, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_length_fails_before_payload_read() {
        let (mut client, mut server) = tokio::io::duplex(64);
        server.write_all(&[0x00]).await.unwrap();

        let err = test_grabber().exchange(&mut client).await.unwrap_err();
        assert!(matches!(err, ScanError::EmptyBanner));
        assert_eq!(err.status(), ScanStatus::ProtocolError);
    }

    #[tokio::test]
    async fn test_over_limit_length_fails_before_payload_read() {
        let (mut client, mut server) = tokio::io::duplex(64);
        server.write_all(&encode_varint(MAX_BANNER_LEN + 1)).await.unwrap();

        let err = test_grabber().exchange(&mut client).await.unwrap_err();
        assert!(matches!(err, ScanError::BannerTooLong(32801)));
        assert_eq!(err.status(), ScanStatus::ProtocolError);
    }

    #[tokio::test]
    async fn test_round_two_length_must_be_exact() {
        let (mut client, mut server) = tokio::io::duplex(128);

        let server_task = tokio::spawn(async move {
            let mut probe = [0u8; 1];
            server.read_exact(&mut probe).await.unwrap();
            server.write_all(&[0x03, b'a', b'b', b'c']).await.unwrap();

            server.read_exact(&mut probe).await.unwrap();
            server.write_all(&[0x08, 0, 0, 0, 0, 0, 0, 0, 0]).await.unwrap();
            server
        });

        let err = test_grabber().exchange(&mut client).await.unwrap_err();
        assert!(matches!(err, ScanError::LengthMismatch { expected: 9, actual: 8 }));
        assert_eq!(err.status(), ScanStatus::ProtocolError);
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_short_read_is_kept_not_failed() {
        // Peer declared 10 bytes but closed after 5
        let payload = [b'a', b'b', b'c', b'd', b'e'];
        let mut stream = &payload[..];
        let data = read_bounded(&mut stream, 10, Duration::from_secs(5)).await.unwrap();
        assert_eq!(data, b"abcde");
    }

    #[tokio::test]
    async fn test_immediate_eof_yields_empty_buffer() {
        let mut stream: &[u8] = &[];
        let data = read_bounded(&mut stream, 10, Duration::from_secs(5)).await.unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_read_times_out() {
        let (mut client, mut server) = tokio::io::duplex(64);
        // Three of ten declared bytes arrive, then the peer stalls without
        // closing. Keep the server half alive so the client never sees EOF.
        server.write_all(&[0x0a, 1, 2, 3]).await.unwrap();

        let err = test_grabber().exchange(&mut client).await.unwrap_err();
        assert!(matches!(err, ScanError::ReadTimeout));
        assert_eq!(err.status(), ScanStatus::ProtocolError);
        drop(server);
    }
}
