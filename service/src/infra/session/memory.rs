//! In-process [`Memory`] session store.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Delete, Insert, Select};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::user::{session, Session},
    infra::session::{self as store, SessionStore},
};

/// In-process [`SessionStore`] keeping [`Session`]s in memory.
///
/// Writes are atomic per key (the map is guarded as a whole), with
/// last-writer-wins semantics. All records are lost on process restart,
/// which merely re-authenticates the affected users.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored [`Session`]s keyed by their [`session::Token`].
    sessions: Arc<RwLock<HashMap<session::Token, Session>>>,
}

impl SessionStore<Insert<(session::Token, Session)>> for Memory {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Insert((token, session)): Insert<(session::Token, Session)>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.sessions.write().await.insert(token, session));
        Ok(())
    }
}

impl SessionStore<Select<By<Option<Session>, session::Token>>> for Memory {
    type Ok = Option<Session>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Session>, session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.sessions.read().await.get(&by.into_inner()).copied())
    }
}

impl SessionStore<Delete<By<Session, session::Token>>> for Memory {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Session, session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Idempotent: deleting an absent `Session` is not an error.
        drop(self.sessions.write().await.remove(&by.into_inner()));
        Ok(())
    }
}

impl SessionStore<Delete<By<Session, session::ExpirationDateTime>>>
    for Memory
{
    type Ok = usize;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Session, session::ExpirationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline = by.into_inner();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(deadline));
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{By, Delete, Insert, Select};

    use crate::{
        domain::user::{self, session, Session},
        infra::SessionStore as _,
    };

    use super::Memory;

    fn session(ttl: Duration) -> (session::Token, Session) {
        let now = session::CreationDateTime::now();
        (
            session::Token::generate(),
            Session {
                user_id: user::Id::new(),
                created_at: now,
                expires_at: (now + ttl).coerce(),
            },
        )
    }

    #[tokio::test]
    async fn insert_select_delete_roundtrip() {
        let store = Memory::default();
        let (token, session) = session(Duration::from_secs(60));

        store
            .execute(Insert((token.clone(), session)))
            .await
            .unwrap();
        let found = store
            .execute(Select(By::<Option<Session>, _>::new(token.clone())))
            .await
            .unwrap()
            .expect("stored");
        assert_eq!(found.user_id, session.user_id);

        store
            .execute(Delete(By::<Session, _>::new(token.clone())))
            .await
            .unwrap();
        assert!(store
            .execute(Select(By::<Option<Session>, _>::new(token.clone())))
            .await
            .unwrap()
            .is_none());

        // Deleting an already absent `Session` still succeeds.
        store
            .execute(Delete(By::<Session, _>::new(token)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn sweep_removes_expired_records_only() {
        let store = Memory::default();
        let (live_token, live) = session(Duration::from_secs(3600));
        let (dead_token, dead) = session(Duration::from_secs(0));

        store
            .execute(Insert((live_token.clone(), live)))
            .await
            .unwrap();
        store
            .execute(Insert((dead_token.clone(), dead)))
            .await
            .unwrap();

        let swept = store
            .execute(Delete(By::<Session, _>::new(
                session::ExpirationDateTime::now(),
            )))
            .await
            .unwrap();
        assert_eq!(swept, 1);

        assert!(store
            .execute(Select(By::<Option<Session>, _>::new(live_token)))
            .await
            .unwrap()
            .is_some());
        assert!(store
            .execute(Select(By::<Option<Session>, _>::new(dead_token)))
            .await
            .unwrap()
            .is_none());
    }
}
