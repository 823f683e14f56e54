//! [`Query`] collection related to the multiple [`Bicycle`]s.

use common::operations::By;

use crate::{domain::Bicycle, read};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a filtered list of [`Bicycle`]s.
pub type List = DatabaseQuery<By<Vec<Bicycle>, read::bicycle::list::Filter>>;
