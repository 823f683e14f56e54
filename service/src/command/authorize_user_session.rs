//! [`Command`] for authorizing a [`User`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, session as store, Database, SessionStore},
    Service,
};

use super::Command;

/// [`Command`] for authorizing a [`User`].
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

/// Output of [`AuthorizeUserSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Authorized [`Session`].
    pub session: Session,

    /// [`User`] the [`Session`] belongs to.
    pub user: User,
}

impl<Db, Ss> Command<AuthorizeUserSession> for Service<Db, Ss>
where
    Db: Database<
        Select<By<Option<User>, user::Id>>,
        Ok = Option<User>,
        Err = Traced<database::Error>,
    >,
    Ss: SessionStore<
            Select<By<Option<Session>, session::Token>>,
            Ok = Option<Session>,
            Err = Traced<store::Error>,
        > + SessionStore<
            Delete<By<Session, session::Token>>,
            Ok = (),
            Err = Traced<store::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let session = self
            .sessions()
            .execute(Select(By::new(token.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SessionNotExists)
            .map_err(tracerr::wrap!())?;

        if session.is_expired_at(session::ExpirationDateTime::now()) {
            // Lazy removal: the periodic sweep would catch it anyway.
            self.sessions()
                .execute(Delete(By::<Session, _>::new(token)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            return Err(tracerr::new!(E::SessionExpired));
        }

        let user = self
            .database()
            .execute(Select(By::new(session.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(session.user_id))
            .map_err(tracerr::wrap!())?;

        Ok(Output { session, user })
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`SessionStore`] error.
    #[display("`SessionStore` operation failed: {_0}")]
    #[from]
    Store(store::Error),

    /// [`Session`] has expired.
    #[display("`Session` has expired")]
    SessionExpired,

    /// [`Session`] with the provided token does not exist.
    #[display("`Session` does not exist")]
    SessionNotExists,

    /// [`User`] the [`Session`] belongs to does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
