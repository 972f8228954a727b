//! TCP link to the host
//!
//! Reads go through a buffer over the socket; the read timeout bounds how
//! long a stalled host can hold up a frame.

use std::io::{self, BufReader, Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use tilelink_hal::{Channel, ChannelError};

use crate::error::ClientError;

/// Duplex channel over a TCP stream
#[derive(Debug)]
pub struct TcpChannel {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl TcpChannel {
    /// Wrap a connected stream
    pub fn from_stream(stream: TcpStream, read_timeout: Duration) -> io::Result<Self> {
        stream.set_read_timeout(Some(read_timeout))?;
        stream.set_nodelay(true)?;
        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: stream,
        })
    }

    /// Connect to the host, retrying a fixed number of times
    pub fn connect(
        addr: &str,
        read_timeout: Duration,
        attempts: u32,
        retry_delay: Duration,
    ) -> Result<Self, ClientError> {
        let attempts = attempts.max(1);
        let mut attempt = 1;

        loop {
            match TcpStream::connect(addr) {
                Ok(stream) => {
                    info!(%addr, attempt, "connected to host");
                    return Ok(Self::from_stream(stream, read_timeout)?);
                }
                Err(source) if attempt >= attempts => {
                    return Err(ClientError::Connect {
                        addr: addr.into(),
                        attempts,
                        source,
                    });
                }
                Err(e) => {
                    warn!(%addr, attempt, error = %e, "connection failed, retrying");
                    thread::sleep(retry_delay);
                    attempt += 1;
                }
            }
        }
    }
}

fn channel_error(e: &io::Error) -> ChannelError {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ChannelError::Timeout,
        _ => {
            debug!(error = %e, "link error");
            ChannelError::Closed
        }
    }
}

impl Channel for TcpChannel {
    fn read(&mut self) -> Result<u8, ChannelError> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Err(ChannelError::Closed),
                Ok(_) => return Ok(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(channel_error(&e)),
            }
        }
    }

    fn write(&mut self, value: u8) -> Result<(), ChannelError> {
        self.writer
            .write_all(&[value])
            .map_err(|e| channel_error(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    fn pair() -> (TcpChannel, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let channel = TcpChannel::connect(&addr, Duration::from_millis(50), 1, Duration::ZERO).unwrap();
        let (host, _) = listener.accept().unwrap();
        (channel, host)
    }

    #[test]
    fn test_bytes_cross_the_link() {
        let (mut channel, mut host) = pair();

        host.write_all(&[0x00, 0x02, 0xAB]).unwrap();
        assert_eq!(channel.read_word(), Ok(2));
        assert_eq!(channel.read(), Ok(0xAB));

        channel.write(0x81).unwrap();
        let mut echoed = [0u8; 1];
        host.read_exact(&mut echoed).unwrap();
        assert_eq!(echoed, [0x81]);
    }

    #[test]
    fn test_silent_host_times_out() {
        let (mut channel, _host) = pair();
        assert_eq!(channel.read(), Err(ChannelError::Timeout));
    }

    #[test]
    fn test_closed_host() {
        let (mut channel, host) = pair();
        drop(host);
        assert_eq!(channel.read(), Err(ChannelError::Closed));
    }

    #[test]
    fn test_connect_gives_up() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let result = TcpChannel::connect(&addr, Duration::from_millis(10), 2, Duration::from_millis(1));
        assert!(matches!(
            result,
            Err(ClientError::Connect { attempts: 2, .. })
        ));
    }
}
