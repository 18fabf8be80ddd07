/*++

Licensed under the Apache-2.0 license.

File Name:

    protocol.rs

Abstract:

    File contains the wire-format constants and frame types exchanged
    with the SCALE target.

--*/

use arrayref::array_ref;

/// Length of the AES input block at the start of each request frame.
pub const PLAINTEXT_LEN: usize = 16;

/// Length of the fresh randomness appended to each request frame. The
/// target consumes it as one masking-state byte, one masking-round-key
/// byte, and four bytes for internal randomized operations.
pub const AUX_RANDOM_LEN: usize = 6;

/// Total request frame length. There is no header, checksum or
/// terminator on the link; the frame boundary is this byte count.
pub const REQUEST_LEN: usize = PLAINTEXT_LEN + AUX_RANDOM_LEN;

/// Response frame length: one AES ciphertext block, nothing else.
pub const CIPHERTEXT_LEN: usize = 16;

/// A request frame as transmitted to the target: the plaintext block
/// followed by the auxiliary randomness. The split at offset 16 is a
/// protocol constant; the driver never interprets either half.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RequestFrame {
    bytes: [u8; REQUEST_LEN],
}

impl RequestFrame {
    /// Create a frame from a full 22-byte random sample.
    pub fn new(bytes: [u8; REQUEST_LEN]) -> Self {
        Self { bytes }
    }

    /// The wire form of the frame.
    pub fn as_bytes(&self) -> &[u8; REQUEST_LEN] {
        &self.bytes
    }

    /// The AES input block, bytes [0, 16).
    pub fn plaintext(&self) -> &[u8; PLAINTEXT_LEN] {
        array_ref![&self.bytes, 0, PLAINTEXT_LEN]
    }

    /// The target-consumed randomness, bytes [16, 22).
    pub fn aux_random(&self) -> &[u8; AUX_RANDOM_LEN] {
        array_ref![&self.bytes, PLAINTEXT_LEN, AUX_RANDOM_LEN]
    }
}

/// A response frame as received from the target: the ciphertext block
/// corresponding to the most recently sent request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResponseFrame {
    bytes: [u8; CIPHERTEXT_LEN],
}

impl ResponseFrame {
    pub fn new(bytes: [u8; CIPHERTEXT_LEN]) -> Self {
        Self { bytes }
    }

    pub fn ciphertext(&self) -> &[u8; CIPHERTEXT_LEN] {
        &self.bytes
    }
}

/// One completed transaction: the request halves paired with the
/// ciphertext that answered them. Immutable once built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransactionRecord {
    /// Position of this transaction within its session.
    pub index: usize,

    pub plaintext: [u8; PLAINTEXT_LEN],

    pub aux_random: [u8; AUX_RANDOM_LEN],

    pub ciphertext: [u8; CIPHERTEXT_LEN],
}

impl TransactionRecord {
    pub fn new(index: usize, request: &RequestFrame, response: &ResponseFrame) -> Self {
        Self {
            index,
            plaintext: *request.plaintext(),
            aux_random: *request.aux_random(),
            ciphertext: *response.ciphertext(),
        }
    }
}

/// The ordered sequence of transactions completed during one driver run.
#[derive(Debug, Default)]
pub struct Session {
    records: Vec<TransactionRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    /// Number of completed transactions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }
}
