//! [`Command`] for updating a [`Bicycle`] listing [`Status`].
//!
//! [`Status`]: bicycle::Status

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{bicycle, user, Bicycle, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Bicycle`] listing [`Status`].
///
/// [`Status`]: bicycle::Status
#[derive(Clone, Copy, Debug)]
pub struct UpdateBicycleStatus {
    /// ID of the [`Bicycle`] to update.
    pub id: bicycle::Id,

    /// New [`Status`] of the [`Bicycle`].
    ///
    /// [`Status`]: bicycle::Status
    pub status: bicycle::Status,

    /// ID of the [`User`] performing the update.
    pub actor_id: user::Id,
}

impl<Db, Ss> Command<UpdateBicycleStatus> for Service<Db, Ss>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Bicycle, bicycle::Id>>,
            Ok = (),
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Bicycle>, bicycle::Id>>,
            Ok = Option<Bicycle>,
            Err = Traced<database::Error>,
        > + Database<Update<Bicycle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Bicycle;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateBicycleStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateBicycleStatus {
            id,
            status,
            actor_id,
        } = cmd;

        let actor = self
            .database()
            .execute(Select(By::new(actor_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ActorNotExists(actor_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut bicycle = tx
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BicycleNotExists(id))
            .map_err(tracerr::wrap!())?;

        // Only the seller themselves or an administrator may update.
        if bicycle.seller_id != actor.id && !actor.is_admin {
            return Err(tracerr::new!(E::NotOwner));
        }

        bicycle.status = status;

        tx.execute(Update(bicycle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(bicycle)
    }
}

/// Error of [`UpdateBicycleStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Acting [`User`] does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    ActorNotExists(#[error(not(source))] user::Id),

    /// [`Bicycle`] with the provided ID does not exist.
    #[display("`Bicycle(id: {_0})` does not exist")]
    #[from(ignore)]
    BicycleNotExists(#[error(not(source))] bicycle::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Acting [`User`] is neither the seller nor an administrator.
    #[display("`User` is not allowed to update the `Bicycle`")]
    NotOwner,
}
