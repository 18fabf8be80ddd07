/*++

Licensed under the Apache-2.0 license.

File Name:

    report.rs

Abstract:

    File contains the reporting sink for completed transactions.

--*/

use std::io::{self, Write};

use crate::protocol::TransactionRecord;

/// Receives each transaction as it completes. The driver hands over
/// every record exactly once, in session order, including the records
/// completed before an aborted session failed. A reporting failure
/// aborts the session; the records are a primary deliverable, so they
/// must never be dropped silently.
pub trait Reporter {
    fn record(&mut self, record: &TransactionRecord) -> io::Result<()>;
}

/// Discards all records. Useful when the caller only wants the returned
/// session.
#[derive(Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn record(&mut self, _record: &TransactionRecord) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one hex-encoded line per transaction to the wrapped writer.
pub struct HexWriter<W: Write> {
    writer: W,
}

impl<W: Write> HexWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for HexWriter<W> {
    fn record(&mut self, record: &TransactionRecord) -> io::Result<()> {
        writeln!(
            self.writer,
            "{:6}  pt={}  aux={}  ct={}",
            record.index,
            hex::encode(record.plaintext),
            hex::encode(record.aux_random),
            hex::encode(record.ciphertext),
        )
    }
}
