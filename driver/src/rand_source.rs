/*++

Licensed under the Apache-2.0 license.

File Name:

    rand_source.rs

Abstract:

    File contains the random-byte source consumed by the session driver.

--*/

use std::io;

use rand::rngs::OsRng;
use rand::RngCore;

/// Capability producing cryptographically strong random bytes on demand.
/// Each call must yield bytes independent of every previous call.
pub trait RandomSource {
    /// Fill `buf` with fresh random bytes.
    ///
    /// # Arguments
    ///
    /// * `buf` - Buffer to fill completely
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// Random source backed by the operating system CSPRNG.
#[derive(Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_random_fills() {
        let mut buf = [0u8; 22];
        OsRandom.fill(&mut buf).unwrap();
        // 22 zero bytes from a CSPRNG would be a 1-in-2^176 event.
        assert_ne!(buf, [0u8; 22]);
    }
}
