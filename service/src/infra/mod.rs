//! Infrastructure layer.

pub mod database;
pub mod session;

pub use self::database::Database;
#[cfg(feature = "postgres")]
pub use self::database::{postgres, Postgres};
pub use self::session::SessionStore;
