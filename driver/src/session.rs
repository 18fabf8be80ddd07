/*++

Licensed under the Apache-2.0 license.

File Name:

    session.rs

Abstract:

    File contains the exchange driver that runs a session of
    request/response transactions against one channel.

--*/

use std::fmt::Display;
use std::io;

use crate::channel::{Channel, ChannelError};
use crate::protocol::{
    RequestFrame, ResponseFrame, Session, TransactionRecord, CIPHERTEXT_LEN, REQUEST_LEN,
};
use crate::rand_source::RandomSource;
use crate::report::Reporter;

/// Errors surfaced at the session boundary. Every variant carries the
/// transactions that completed before the failure, so a caller can keep
/// the partial session regardless of what ended it.
#[derive(Debug)]
pub enum SessionError {
    /// A channel failure aborted the session.
    Aborted {
        session: Session,
        source: ChannelError,
    },

    /// The random source failed to produce bytes.
    Random { session: Session, source: io::Error },

    /// The reporter failed to persist a completed record.
    Report { session: Session, source: io::Error },
}

impl SessionError {
    /// Number of transactions that completed before the session ended.
    pub fn completed(&self) -> usize {
        self.session().len()
    }

    /// The transactions that completed before the failure.
    pub fn session(&self) -> &Session {
        match self {
            SessionError::Aborted { session, .. }
            | SessionError::Random { session, .. }
            | SessionError::Report { session, .. } => session,
        }
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Aborted { session, source } => write!(
                f,
                "session aborted after {} completed transactions: {source}",
                session.len()
            ),
            SessionError::Random { session, source } => write!(
                f,
                "random source failure after {} completed transactions: {source}",
                session.len()
            ),
            SessionError::Report { session, source } => write!(
                f,
                "reporting failure after {} completed transactions: {source}",
                session.len()
            ),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Aborted { source, .. } => Some(source),
            SessionError::Random { source, .. } | SessionError::Report { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Run `num_repeat` transactions against `channel` and return the
/// collected session.
///
/// Each transaction draws 22 fresh random bytes (16 plaintext + 6
/// auxiliary), writes the request frame, then blocks until the full
/// 16-byte ciphertext arrives. The link carries no request tags, so a
/// response is attributed to the immediately preceding request purely by
/// order; transaction `i` completes before `i+1` starts. Completed
/// records are handed to `reporter` as they finish; a reporting failure
/// aborts the remainder of the session rather than dropping records.
///
/// The channel is consumed and dropped (closing the device) on every
/// exit path. On a channel failure the session aborts immediately with
/// `SessionError::Aborted`; no transaction is retried.
///
/// # Arguments
///
/// * `channel` - Opened channel to the target, owned for the session
/// * `num_repeat` - Number of transactions; 0 performs no channel I/O
/// * `rng` - Source of the per-transaction 22-byte sample
/// * `reporter` - Sink receiving each completed record
pub fn run_session<C: Channel>(
    mut channel: C,
    num_repeat: usize,
    rng: &mut dyn RandomSource,
    reporter: &mut dyn Reporter,
) -> Result<Session, SessionError> {
    let mut session = Session::new();
    for index in 0..num_repeat {
        let mut sample = [0u8; REQUEST_LEN];
        if let Err(source) = rng.fill(&mut sample) {
            return Err(SessionError::Random { session, source });
        }
        let request = RequestFrame::new(sample);
        match exchange(&mut channel, &request) {
            Ok(response) => {
                let record = TransactionRecord::new(index, &request, &response);
                // The transaction completed on the wire, so it belongs
                // to the session even if reporting it fails.
                session.push(record);
                if let Err(source) = reporter.record(&record) {
                    return Err(SessionError::Report { session, source });
                }
            }
            Err(source) => return Err(SessionError::Aborted { session, source }),
        }
    }
    Ok(session)
}

/// One transaction on the wire: full request out, full response in.
fn exchange<C: Channel>(
    channel: &mut C,
    request: &RequestFrame,
) -> Result<ResponseFrame, ChannelError> {
    channel.write_all(request.as_bytes())?;
    let mut ciphertext = [0u8; CIPHERTEXT_LEN];
    channel.read_exact(&mut ciphertext)?;
    Ok(ResponseFrame::new(ciphertext))
}
