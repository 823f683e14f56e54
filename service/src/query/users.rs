//! [`Query`] collection related to the multiple [`User`]s.

use common::operations::By;

use crate::domain::User;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all the registered [`User`]s, newest first.
pub type All = DatabaseQuery<By<Vec<User>, ()>>;
