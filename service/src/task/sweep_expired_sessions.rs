//! [`SweepExpiredSessions`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::user::{session, Session},
    infra::{session as store, SessionStore},
    Service,
};

use super::Task;

/// Configuration for [`SweepExpiredSessions`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between expired [`Session`]s sweeps.
    pub interval: time::Duration,
}

/// [`Task`] removing expired [`Session`]s from the [`SessionStore`].
///
/// Expired [`Session`]s are rejected on authorization regardless, so this
/// [`Task`] only bounds the [`SessionStore`] growth.
#[derive(Clone, Copy, Debug)]
pub struct SweepExpiredSessions<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Ss> Task<Start<By<SweepExpiredSessions<Self>, Config>>>
    for Service<Db, Ss>
where
    SweepExpiredSessions<Service<Db, Ss>>:
        Task<Perform<()>, Ok = usize, Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<SweepExpiredSessions<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = SweepExpiredSessions {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task
                .execute(Perform(()))
                .await
                .map(|swept| {
                    if swept > 0 {
                        log::info!(
                            "`task::SweepExpiredSessions` removed {swept} \
                             expired `Session`(s)",
                        );
                    }
                })
                .map_err(|e| {
                    log::error!("`task::SweepExpiredSessions` failed: {e}");
                });
        }
    }
}

impl<Db, Ss> Task<Perform<()>> for SweepExpiredSessions<Service<Db, Ss>>
where
    Ss: SessionStore<
        Delete<By<Session, session::ExpirationDateTime>>,
        Ok = usize,
        Err = Traced<store::Error>,
    >,
{
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = session::ExpirationDateTime::now();
        self.service
            .sessions()
            .execute(Delete(By::new(deadline)))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`SweepExpiredSessions`] execution.
pub type ExecutionError = Traced<store::Error>;
