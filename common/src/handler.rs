//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// The single execution abstraction of this system: commands, queries,
/// database operations, session store operations and background tasks are
/// all expressed as [`Handler`] implementations over different argument
/// types.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
