//! unseal-client: Authorized decryption of confidential ledger values
//!
//! Ties the pieces together for an application: a wallet provider supplies
//! the user identity and signature, the engine manager supplies a ready
//! engine instance, and this crate turns batches of ciphertext handles into
//! plaintext values under a cached, time-bounded authorization session.
//!
//! Obtaining a signature is an interactive wallet prompt, so sessions are
//! reused aggressively: one signature covers every later batch whose
//! addresses it already authorizes, until the window expires or the active
//! account changes.

mod client;
mod decrypt;
mod error;
mod session;
mod wallet;

pub use client::UnsealClient;
pub use decrypt::decrypt_batch;
pub use error::ClientError;
pub use session::{AuthorizationSession, SESSION_DURATION_DAYS};
pub use wallet::LocalWallet;
