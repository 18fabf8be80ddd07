/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Host-side driver for collecting plaintext/ciphertext pairs from a
    SCALE board running a masked AES, over a UART serial link.

--*/

mod channel;
mod protocol;
mod rand_source;
mod report;
mod session;
mod tty;

pub use channel::{Channel, ChannelError};
pub use protocol::{
    RequestFrame, ResponseFrame, Session, TransactionRecord, AUX_RANDOM_LEN, CIPHERTEXT_LEN,
    PLAINTEXT_LEN, REQUEST_LEN,
};
pub use rand_source::{OsRandom, RandomSource};
pub use report::{HexWriter, NullReporter, Reporter};
pub use session::{run_session, SessionError};
pub use tty::TtyChannel;
