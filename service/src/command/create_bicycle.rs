//! [`Command`] for listing a new [`Bicycle`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::bicycle::{Brand, Category, Condition, Model, Price};
use crate::{
    domain::{bicycle, user, Bicycle, User},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for listing a new [`Bicycle`].
#[derive(Clone, Debug)]
pub struct CreateBicycle {
    /// ID of the [`User`] selling the [`Bicycle`].
    pub seller_id: user::Id,

    /// [`Category`] of the [`Bicycle`].
    pub category: bicycle::Category,

    /// [`Brand`] of the [`Bicycle`].
    pub brand: bicycle::Brand,

    /// [`Model`] of the [`Bicycle`].
    pub model: bicycle::Model,

    /// Year the [`Bicycle`] was originally purchased in.
    pub purchase_year: bicycle::PurchaseYear,

    /// Asking [`Price`] of the [`Bicycle`].
    pub price: bicycle::Price,

    /// [`Condition`] of the [`Bicycle`].
    pub condition: bicycle::Condition,

    /// Indicator whether the listing is promoted as premium.
    pub is_premium: bool,
}

impl<Db, Ss> Command<CreateBicycle> for Service<Db, Ss>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Bicycle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Bicycle;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateBicycle,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBicycle {
            seller_id,
            category,
            brand,
            model,
            purchase_year,
            price,
            condition,
            is_premium,
        } = cmd;

        let seller = self
            .database()
            .execute(Select(By::new(seller_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SellerNotExists(seller_id))
            .map_err(tracerr::wrap!())?;

        // Buyers need a place to inspect the bicycle in.
        if seller.city.is_none() {
            return Err(tracerr::new!(E::MissingCity));
        }

        let bicycle = Bicycle {
            id: bicycle::Id::new(),
            seller_id,
            category,
            brand,
            model,
            purchase_year,
            price,
            condition,
            status: bicycle::Status::Available,
            is_premium,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(bicycle.clone()))
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

/// Error of [`CreateBicycle`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Selling [`User`] has no city filled in.
    #[display("Seller has no city filled in")]
    MissingCity,

    /// Selling [`User`] does not exist.
    #[display("`User(id: {_0})` does not exist")]
    #[from(ignore)]
    SellerNotExists(#[error(not(source))] user::Id),
}
