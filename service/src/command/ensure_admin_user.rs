//! [`Command`] ensuring the administrator [`User`] exists.

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::ExposeSecret as _;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] ensuring the administrator [`User`] exists.
///
/// Creates the administrator account from the configured credentials if
/// it's absent, and is a no-op otherwise. Executed on every startup, so
/// the platform is never left without an administrator.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnsureAdminUser;

impl<Db, Ss> Command<EnsureAdminUser> for Service<Db, Ss>
where
    Db: for<'l> Database<
            Select<By<Option<User>, &'l user::Login>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        _: EnsureAdminUser,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let admin = &self.config().admin;

        if let Some(existing) = self
            .database()
            .execute(Select(By::new(&admin.login)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            return Ok(existing);
        }

        let user = User {
            id: user::Id::new(),
            // Admin login always satisfies the `Name` format.
            name: user::Name::new(admin.login.to_string())
                .ok_or_else(|| tracerr::new!(E::InvalidCredentials))?,
            login: admin.login.clone(),
            password_hash: user::PasswordHash::new(
                admin.password.expose_secret(),
            ),
            email: None,
            phone: None,
            city: None,
            is_admin: true,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(user.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`EnsureAdminUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Configured administrator credentials are malformed.
    #[display("Malformed administrator credentials")]
    InvalidCredentials,
}
