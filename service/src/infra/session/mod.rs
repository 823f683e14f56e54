//! [`SessionStore`]-related implementations.
//!
//! The store is the single source of truth for [`Session`] lifecycle: a
//! record present and unexpired is the only proof of authentication, so
//! revocation is effective the moment a record is deleted.
//!
//! [`Session`]: crate::domain::user::Session

pub mod memory;

use derive_more::{Display, Error as StdError};

pub use self::memory::Memory;

/// [`SessionStore`] operation.
///
/// Backing implementations are swappable behind the operation
/// implementations without touching any [`Command`] logic.
///
/// [`Command`]: crate::Command
pub use common::Handler as SessionStore;

/// [`SessionStore`] error.
#[derive(Debug, Display, StdError)]
pub enum Error {
    /// [`SessionStore`] backend is unreachable.
    ///
    /// Fatal for the current request only: the client may retry.
    #[display("`SessionStore` is unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}
