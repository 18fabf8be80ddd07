/*++

Licensed under the Apache-2.0 license.

File Name:

    channel.rs

Abstract:

    File contains definition of the Channel trait.

--*/

use std::fmt::Display;
use std::io;
use std::time::Duration;

/// Errors produced by a channel implementation.
#[derive(Debug)]
pub enum ChannelError {
    /// The device identifier could not be opened (missing, permission
    /// denied, or held exclusively elsewhere).
    Unavailable(io::Error),

    /// Transport failure while transmitting.
    Write(io::Error),

    /// Transport failure while receiving.
    Read(io::Error),

    /// A configured deadline elapsed before the operation completed.
    Timeout(Duration),
}

impl Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Unavailable(e) => write!(f, "channel unavailable: {e}"),
            ChannelError::Write(e) => write!(f, "channel write error: {e}"),
            ChannelError::Read(e) => write!(f, "channel read error: {e}"),
            ChannelError::Timeout(d) => write!(f, "channel deadline of {d:?} elapsed"),
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChannelError::Unavailable(e)
            | ChannelError::Write(e)
            | ChannelError::Read(e) => Some(e),
            ChannelError::Timeout(_) => None,
        }
    }
}

/// Represents an abstract bidirectional byte stream. The link carries no
/// in-band delimiters; frames are delimited purely by byte counts, so
/// reads must be exact-count blocking rather than best-effort.
///
/// The underlying resource is released when the implementation is
/// dropped; a session driver that owns a channel by value closes it on
/// every exit path.
pub trait Channel {
    /// Transmit every byte of `bytes`, blocking until the transport has
    /// accepted them.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Data to transmit
    ///
    /// # Error
    ///
    /// * `ChannelError` - `Write` on transport failure, `Timeout` if a
    ///   configured deadline elapses first
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), ChannelError>;

    /// Block until exactly `buf.len()` bytes have been received, in
    /// arrival order. Never returns with `buf` partially filled.
    ///
    /// # Arguments
    ///
    /// * `buf` - Buffer to fill completely
    ///
    /// # Error
    ///
    /// * `ChannelError` - `Read` on transport failure, `Timeout` if a
    ///   configured deadline elapses first
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let e = ChannelError::Read(io::Error::new(ErrorKind::UnexpectedEof, "device closed"));
        assert_eq!(e.to_string(), "channel read error: device closed");
        let e = ChannelError::Timeout(Duration::from_secs(2));
        assert_eq!(e.to_string(), "channel deadline of 2s elapsed");
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;
        let e = ChannelError::Write(io::Error::new(ErrorKind::BrokenPipe, "gone"));
        assert!(e.source().is_some());
        assert!(ChannelError::Timeout(Duration::ZERO).source().is_none());
    }
}
