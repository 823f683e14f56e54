//! [`Command`] for revoking a [`Session`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::user::{session, Session},
    infra::{session as store, SessionStore},
    Service,
};

use super::Command;

/// [`Command`] for revoking a [`Session`].
///
/// Revocation is idempotent: revoking an absent or already revoked
/// [`Session`] succeeds.
#[derive(Clone, Debug, From)]
pub struct RevokeUserSession {
    /// [`Session`] token to revoke.
    pub token: session::Token,
}

impl<Db, Ss> Command<RevokeUserSession> for Service<Db, Ss>
where
    Ss: SessionStore<
        Delete<By<Session, session::Token>>,
        Ok = (),
        Err = Traced<store::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RevokeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RevokeUserSession { token } = cmd;

        self.sessions()
            .execute(Delete(By::<Session, _>::new(token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`RevokeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`SessionStore`] error.
    #[display("`SessionStore` operation failed: {_0}")]
    Store(store::Error),
}
