//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::{error::Error, time::Duration};

use common::operations::{By, Start};
use derive_more::Debug;
use secrecy::SecretBox;

use crate::domain::user;
#[cfg(doc)]
use crate::infra::{Database, SessionStore};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Lifetime of a [`user::Session`] since its creation.
    ///
    /// Expiry is absolute: it never slides on activity.
    pub session_ttl: Duration,

    /// Credentials of the administrator account ensured on startup.
    pub admin: AdminCredentials,

    /// [`task::SweepExpiredSessions`] configuration.
    pub sweep_expired_sessions: task::sweep_expired_sessions::Config,
}

/// Credentials of the administrator account ensured on startup.
#[derive(Clone, Debug)]
pub struct AdminCredentials {
    /// [`user::Login`] of the administrator account.
    pub login: user::Login,

    /// [`user::Password`] of the administrator account.
    #[debug(skip)]
    pub password: SecretBox<user::Password>,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Ss> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`SessionStore`] of this [`Service`].
    sessions: Ss,
}

impl<Db, Ss> Service<Db, Ss> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        sessions: Ss,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::SweepExpiredSessions<Self>,
                        task::sweep_expired_sessions::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            sessions,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().sweep_expired_sessions)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`SessionStore`] of this [`Service`].
    #[must_use]
    pub fn sessions(&self) -> &Ss {
        &self.sessions
    }
}
