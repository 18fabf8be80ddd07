/*++

Licensed under the Apache-2.0 license.

File Name:

    tty.rs

Abstract:

    File contains the serial TTY implementation of the Channel trait.

--*/

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::mem::MaybeUninit;
use std::os::fd::{AsRawFd, RawFd};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::channel::{Channel, ChannelError};

/// A serial device channel (e.g. `/dev/ttyUSB0`), configured raw 8N1
/// with no flow control. The device is released when the channel is
/// dropped.
#[derive(Debug)]
pub struct TtyChannel {
    file: File,
    settle: Option<Duration>,
    read_deadline: Option<Duration>,
}

impl TtyChannel {
    /// The target firmware needs a moment between transactions to re-arm
    /// its receive loop before the next frame arrives.
    const DEFAULT_SETTLE: Duration = Duration::from_millis(10);

    /// Open and configure the serial device at `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Device node of the serial port
    /// * `baud` - Line rate in bits per second
    ///
    /// # Error
    ///
    /// * `ChannelError::Unavailable` - the device cannot be opened or
    ///   does not accept the requested line settings
    pub fn open(path: &Path, baud: u32) -> Result<Self, ChannelError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(ChannelError::Unavailable)?;
        configure_raw_8n1(&file, baud).map_err(ChannelError::Unavailable)?;
        Ok(Self {
            file,
            settle: Some(Self::DEFAULT_SETTLE),
            read_deadline: None,
        })
    }

    /// Delay applied before each write; `None` disables it.
    pub fn set_settle(&mut self, settle: Option<Duration>) {
        self.settle = settle;
    }

    /// Deadline for `read_exact`; `None` (the default) blocks
    /// indefinitely, matching the underlying transport.
    pub fn set_read_deadline(&mut self, deadline: Option<Duration>) {
        self.read_deadline = deadline;
    }
}

impl Channel for TtyChannel {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), ChannelError> {
        if let Some(settle) = self.settle {
            std::thread::sleep(settle);
        }
        self.file.write_all(bytes).map_err(ChannelError::Write)?;
        self.file.flush().map_err(ChannelError::Write)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ChannelError> {
        // VMIN=0/VTIME=1 makes each read() return within 100ms even with
        // no data, so the deadline is checked between attempts.
        let start = Instant::now();
        let mut filled = 0;
        while filled < buf.len() {
            if let Some(deadline) = self.read_deadline {
                if start.elapsed() >= deadline {
                    return Err(ChannelError::Timeout(deadline));
                }
            }
            let n = self.file.read(&mut buf[filled..]).map_err(ChannelError::Read)?;
            if n == 0 {
                // A zero-length read is either the VTIME tick expiring or
                // the device going away; only the latter hangs up the fd.
                if hung_up(self.file.as_raw_fd()).map_err(ChannelError::Read)? {
                    return Err(ChannelError::Read(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "serial device closed",
                    )));
                }
            }
            filled += n;
        }
        Ok(())
    }
}

fn configure_raw_8n1(file: &File, baud: u32) -> io::Result<()> {
    let speed = baud_to_speed(baud)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "unsupported baud rate"))?;
    let fd = file.as_raw_fd();
    unsafe {
        let mut termios = MaybeUninit::<libc::termios>::uninit();
        if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut termios = termios.assume_init();
        termios.c_iflag &= !(libc::IGNBRK
            | libc::BRKINT
            | libc::PARMRK
            | libc::ISTRIP
            | libc::ICRNL
            | libc::INLCR
            | libc::IGNCR
            | libc::IXON
            | libc::IXOFF);
        termios.c_oflag &= !libc::OPOST;
        termios.c_lflag &=
            !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::IEXTEN | libc::ISIG);
        termios.c_cflag &= !(libc::CSIZE | libc::PARENB | libc::CSTOPB | libc::CRTSCTS);
        termios.c_cflag |= libc::CS8 | libc::CREAD | libc::CLOCAL;
        termios.c_cc[libc::VMIN] = 0;
        termios.c_cc[libc::VTIME] = 1;
        if libc::cfsetspeed(&mut termios, speed) != 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::tcsetattr(fd, libc::TCSANOW, &termios as *const _) != 0 {
            return Err(io::Error::last_os_error());
        }
        // Stale bytes from a previous session would desynchronize the
        // request/response pairing.
        if libc::tcflush(fd, libc::TCIOFLUSH) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Whether the peer end of `fd` has hung up with no data left to drain.
fn hung_up(fd: RawFd) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let rc = unsafe { libc::poll(&mut pfd, 1, 0) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(rc > 0
        && (pfd.revents & (libc::POLLHUP | libc::POLLERR)) != 0
        && (pfd.revents & libc::POLLIN) == 0)
}

fn baud_to_speed(baud: u32) -> Option<libc::speed_t> {
    match baud {
        9600 => Some(libc::B9600),
        19200 => Some(libc::B19200),
        38400 => Some(libc::B38400),
        57600 => Some(libc::B57600),
        115200 => Some(libc::B115200),
        230400 => Some(libc::B230400),
        _ => None,
    }
}
