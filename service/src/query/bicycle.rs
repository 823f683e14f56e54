//! [`Query`] collection related to a single [`Bicycle`].

use common::operations::By;

use crate::domain::{bicycle, Bicycle};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Bicycle`] by its [`bicycle::Id`].
pub type ById = DatabaseQuery<By<Option<Bicycle>, bicycle::Id>>;
