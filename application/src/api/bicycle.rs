//! [`Bicycle`]-related endpoints of the REST API.
//!
//! [`Bicycle`]: service::domain::Bicycle

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{bicycle, user, Bicycle},
    query, read,
};

use crate::{define_error, AsError, Auth, Error, Service};

/// Wire representation of a [`Bicycle`].
#[derive(Clone, Debug, Serialize)]
pub struct Response {
    /// ID of the [`Bicycle`].
    pub id: bicycle::Id,

    /// ID of the selling [`User`].
    ///
    /// [`User`]: service::domain::User
    pub seller_id: user::Id,

    /// Category of the [`Bicycle`].
    pub category: bicycle::Category,

    /// Brand of the [`Bicycle`].
    pub brand: String,

    /// Model of the [`Bicycle`].
    pub model: String,

    /// Year the [`Bicycle`] was originally purchased in.
    pub purchase_year: i32,

    /// Asking price of the [`Bicycle`].
    pub price: i32,

    /// Condition of the [`Bicycle`].
    pub condition: bicycle::Condition,

    /// Listing status of the [`Bicycle`].
    pub status: bicycle::Status,

    /// Indicator whether the listing is promoted as premium.
    pub is_premium: bool,

    /// Moment the [`Bicycle`] was listed at.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: bicycle::CreationDateTime,
}

impl From<Bicycle> for Response {
    fn from(bicycle: Bicycle) -> Self {
        let Bicycle {
            id,
            seller_id,
            category,
            brand,
            model,
            purchase_year,
            price,
            condition,
            status,
            is_premium,
            created_at,
        } = bicycle;

        Self {
            id,
            seller_id,
            category,
            brand: brand.to_string(),
            model: model.to_string(),
            purchase_year: purchase_year.into(),
            price: price.into(),
            condition,
            status,
            is_premium,
            created_at,
        }
    }
}

/// `GET /api/bicycles` query string.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Category to select listings of.
    pub category: Option<bicycle::Category>,

    /// Condition to select listings of.
    pub condition: Option<bicycle::Condition>,

    /// Brand (or its part) to fuzzy search for.
    pub brand: Option<String>,

    /// Indicator whether only premium listings should be selected.
    pub premium: bool,

    /// Lowest acceptable price, inclusive.
    pub min_price: Option<i32>,

    /// Highest acceptable price, inclusive.
    pub max_price: Option<i32>,

    /// Indicator whether sold listings should be selected too.
    pub include_sold: bool,

    /// Sorting of the selected listings.
    pub sort: Sort,
}

impl TryFrom<ListQuery> for read::bicycle::list::Filter {
    type Error = Error;

    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        use BicycleError as E;

        let ListQuery {
            category,
            condition,
            brand,
            premium,
            min_price,
            max_price,
            include_sold,
            sort,
        } = query;

        Ok(Self {
            category,
            condition,
            brand: brand
                .map(|b| bicycle::Brand::new(b).ok_or(E::InvalidFilter))
                .transpose()?,
            premium_only: premium,
            min_price: min_price
                .map(|p| bicycle::Price::new(p).ok_or(E::InvalidFilter))
                .transpose()?,
            max_price: max_price
                .map(|p| bicycle::Price::new(p).ok_or(E::InvalidFilter))
                .transpose()?,
            include_sold,
            sort: sort.into(),
        })
    }
}

/// Sorting of a [`Bicycle`]s list selection.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sort {
    /// Most recently listed first.
    #[default]
    Newest,

    /// Cheapest first.
    PriceAscending,

    /// Most expensive first.
    PriceDescending,
}

impl From<Sort> for read::bicycle::list::Sort {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Newest => Self::Newest,
            Sort::PriceAscending => Self::PriceAscending,
            Sort::PriceDescending => Self::PriceDescending,
        }
    }
}

/// `POST /api/bicycles` request body.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateRequest {
    /// Category of the [`Bicycle`].
    pub category: bicycle::Category,

    /// Brand of the [`Bicycle`].
    pub brand: String,

    /// Model of the [`Bicycle`].
    pub model: String,

    /// Year the [`Bicycle`] was originally purchased in.
    pub purchase_year: i32,

    /// Asking price of the [`Bicycle`].
    pub price: i32,

    /// Condition of the [`Bicycle`].
    pub condition: bicycle::Condition,

    /// Indicator whether the listing is promoted as premium.
    #[serde(default)]
    pub is_premium: bool,
}

/// `PATCH /api/bicycles/{id}/status` request body.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// New listing status of the [`Bicycle`].
    pub status: bicycle::Status,
}

/// `GET /api/bicycles` handler.
///
/// Public listing with filtering and sorting. Sold listings are excluded
/// unless explicitly requested.
pub async fn list(
    Extension(service): Extension<Service>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Response>>, Error> {
    let filter = read::bicycle::list::Filter::try_from(query)?;

    let bicycles = service
        .execute(query::bicycles::List::by(filter))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(bicycles.into_iter().map(Into::into).collect()))
}

/// `GET /api/bicycles/{id}` handler.
pub async fn find(
    Extension(service): Extension<Service>,
    Path(id): Path<bicycle::Id>,
) -> Result<Json<Response>, Error> {
    service
        .execute(query::bicycle::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|bicycle| Json(bicycle.into()))
        .ok_or_else(|| BicycleError::NotFound.into())
}

/// `POST /api/bicycles` handler.
///
/// The seller is always the authenticated principal: a seller ID in the
/// body would be ignored, so none is accepted.
pub async fn create(
    Extension(service): Extension<Service>,
    Auth(principal): Auth,
    Json(body): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Response>), Error> {
    use BicycleError as E;

    let CreateRequest {
        category,
        brand,
        model,
        purchase_year,
        price,
        condition,
        is_premium,
    } = body;

    let bicycle = service
        .execute(command::CreateBicycle {
            seller_id: principal.user_id(),
            category,
            brand: bicycle::Brand::new(brand).ok_or(E::InvalidBrand)?,
            model: bicycle::Model::new(model).ok_or(E::InvalidModel)?,
            purchase_year: bicycle::PurchaseYear::new(purchase_year)
                .ok_or(E::InvalidPurchaseYear)?,
            price: bicycle::Price::new(price).ok_or(E::InvalidPrice)?,
            condition,
            is_premium,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(bicycle.into())))
}

/// `PATCH /api/bicycles/{id}/status` handler.
///
/// Only the seller themselves or an administrator may update the status.
pub async fn update_status(
    Extension(service): Extension<Service>,
    Auth(principal): Auth,
    Path(id): Path<bicycle::Id>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Response>, Error> {
    let bicycle = service
        .execute(command::UpdateBicycleStatus {
            id,
            status: body.status,
            actor_id: principal.user_id(),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(bicycle.into()))
}

impl AsError for command::create_bicycle::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_bicycle::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::MissingCity => Some(BicycleError::MissingCity.into()),
            // The principal was just admitted, so this is a server fault.
            E::SellerNotExists(_) => None,
        }
    }
}

impl AsError for command::update_bicycle_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::update_bicycle_status::ExecutionError as E;

        match self {
            E::ActorNotExists(_) => None,
            E::BicycleNotExists(_) => Some(BicycleError::NotFound.into()),
            E::Db(e) => e.try_as_error(),
            E::NotOwner => Some(BicycleError::NotOwner.into()),
        }
    }
}

define_error! {
    enum BicycleError {
        #[code = "INVALID_BRAND"]
        #[status = BAD_REQUEST]
        #[message = "Invalid brand"]
        InvalidBrand,

        #[code = "INVALID_MODEL"]
        #[status = BAD_REQUEST]
        #[message = "Invalid model"]
        InvalidModel,

        #[code = "INVALID_PURCHASE_YEAR"]
        #[status = BAD_REQUEST]
        #[message = "Purchase year is out of range"]
        InvalidPurchaseYear,

        #[code = "INVALID_PRICE"]
        #[status = BAD_REQUEST]
        #[message = "Price must be non-negative"]
        InvalidPrice,

        #[code = "INVALID_FILTER"]
        #[status = BAD_REQUEST]
        #[message = "Invalid listing filter"]
        InvalidFilter,

        #[code = "MISSING_CITY"]
        #[status = BAD_REQUEST]
        #[message = "Seller must have a city filled in"]
        MissingCity,

        #[code = "NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Bicycle not found"]
        NotFound,

        #[code = "NOT_OWNER"]
        #[status = FORBIDDEN]
        #[message = "Only the seller or an administrator may update the \
                     listing"]
        NotOwner,
    }
}

#[cfg(test)]
mod spec {
    use service::read;

    use crate::AsError as _;

    use super::{ListQuery, Sort};

    #[test]
    fn default_filter_hides_sold_and_sorts_by_newest() {
        let filter =
            read::bicycle::list::Filter::try_from(ListQuery::default())
                .expect("valid filter");

        assert!(!filter.include_sold);
        assert!(!filter.premium_only);
        assert_eq!(filter.sort, read::bicycle::list::Sort::Newest);
        assert!(filter.category.is_none());
        assert!(filter.brand.is_none());
    }

    #[test]
    fn filter_carries_price_range_and_sort() {
        let query = ListQuery {
            min_price: Some(1_000),
            max_price: Some(5_000),
            sort: Sort::PriceAscending,
            include_sold: true,
            ..ListQuery::default()
        };

        let filter = read::bicycle::list::Filter::try_from(query)
            .expect("valid filter");

        assert_eq!(filter.min_price.map(i32::from), Some(1_000));
        assert_eq!(filter.max_price.map(i32::from), Some(5_000));
        assert_eq!(filter.sort, read::bicycle::list::Sort::PriceAscending);
        assert!(filter.include_sold);
    }

    #[test]
    fn negative_price_bound_is_rejected() {
        let query = ListQuery {
            min_price: Some(-1),
            ..ListQuery::default()
        };

        let err = read::bicycle::list::Filter::try_from(query)
            .expect_err("negative bound");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn ownership_violation_is_forbidden() {
        use service::command::update_bicycle_status::ExecutionError as E;

        let err = E::NotOwner.as_error();

        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
        assert_eq!(err.code, "NOT_OWNER");
    }
}
