//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_bicycle;
pub mod create_user;
pub mod create_user_session;
pub mod ensure_admin_user;
pub mod revoke_user_session;
pub mod update_bicycle_status;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_bicycle::CreateBicycle, create_user::CreateUser,
    create_user_session::CreateUserSession,
    ensure_admin_user::EnsureAdminUser,
    revoke_user_session::RevokeUserSession,
    update_bicycle_status::UpdateBicycleStatus,
};

#[cfg(test)]
mod spec {
    use std::{collections::HashMap, sync::Arc, time::Duration};

    use common::operations::{By, Commit, Insert, Select, Transact};
    use secrecy::SecretBox;
    use tokio::sync::RwLock;
    use tracerr::Traced;

    use crate::{
        domain::{
            user::{self, session, Session},
            User,
        },
        infra::{database, session::Memory, Database, SessionStore as _},
        task, AdminCredentials, Config, Service,
    };

    use super::{
        authorize_user_session, create_user_session, AuthorizeUserSession,
        Command as _, CreateUser, CreateUserSession, EnsureAdminUser,
        RevokeUserSession,
    };

    /// In-memory [`Database`] standing in for Postgres.
    #[derive(Clone, Debug, Default)]
    struct MockDb {
        users: Arc<RwLock<HashMap<user::Id, User>>>,
    }

    impl Database<Transact> for MockDb {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Commit> for MockDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
            Ok(())
        }
    }

    impl Database<Insert<User>> for MockDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(user): Insert<User>,
        ) -> Result<Self::Ok, Self::Err> {
            drop(self.users.write().await.insert(user.id, user));
            Ok(())
        }
    }

    impl Database<Select<By<Option<User>, user::Id>>> for MockDb {
        type Ok = Option<User>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<User>, user::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self
                .users
                .read()
                .await
                .get(&by.into_inner())
                .filter(|u| u.deleted_at.is_none())
                .cloned())
        }
    }

    impl<'l> Database<Select<By<Option<User>, &'l user::Login>>> for MockDb {
        type Ok = Option<User>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Select(by): Select<By<Option<User>, &'l user::Login>>,
        ) -> Result<Self::Ok, Self::Err> {
            let login = by.into_inner();
            Ok(self
                .users
                .read()
                .await
                .values()
                .find(|u| &u.login == login && u.deleted_at.is_none())
                .cloned())
        }
    }

    fn service() -> Service<MockDb, Memory> {
        let (service, _bg) = Service::new(
            Config {
                session_ttl: Duration::from_secs(3600),
                admin: AdminCredentials {
                    login: user::Login::new("admin").unwrap(),
                    password: SecretBox::new(Box::new(
                        user::Password::new("admin123").unwrap(),
                    )),
                },
                sweep_expired_sessions: task::sweep_expired_sessions::Config {
                    interval: Duration::from_secs(3600),
                },
            },
            MockDb::default(),
            Memory::default(),
        );
        service
    }

    async fn register_alice(service: &Service<MockDb, Memory>) -> User {
        service
            .execute(CreateUser {
                name: user::Name::new("Alice").unwrap(),
                login: user::Login::new("alice").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("correct horse").unwrap(),
                )),
                email: user::Email::new("alice@example.com"),
                phone: None,
                city: None,
            })
            .await
            .unwrap()
    }

    fn credentials(
        login: &str,
        password: &str,
    ) -> CreateUserSession {
        CreateUserSession::ByCredentials {
            login: user::Login::new(login).unwrap(),
            password: SecretBox::new(Box::new(
                user::Password::new(password).unwrap(),
            )),
        }
    }

    #[tokio::test]
    async fn login_failure_is_uniform() {
        use create_user_session::ExecutionError as E;

        let service = service();
        let _ = register_alice(&service).await;

        let unknown_login = service
            .execute(credentials("nosuch", "correct horse"))
            .await
            .unwrap_err();
        let wrong_password = service
            .execute(credentials("alice", "wrong horse"))
            .await
            .unwrap_err();

        // An attacker probing logins learns nothing from the error.
        assert!(matches!(unknown_login.as_ref(), E::WrongCredentials));
        assert!(matches!(wrong_password.as_ref(), E::WrongCredentials));
    }

    #[tokio::test]
    async fn each_login_mints_a_fresh_token() {
        let service = service();
        let _ = register_alice(&service).await;

        let first = service
            .execute(credentials("alice", "correct horse"))
            .await
            .unwrap();
        let second = service
            .execute(credentials("alice", "correct horse"))
            .await
            .unwrap();

        assert_ne!(first.token, second.token);

        for out in [first, second] {
            let authorized = service
                .execute(AuthorizeUserSession { token: out.token })
                .await
                .unwrap();
            assert_eq!(authorized.user.id, out.user.id);
        }
    }

    #[tokio::test]
    async fn expired_session_is_rejected_and_reclaimed() {
        use authorize_user_session::ExecutionError as E;

        let service = service();
        let alice = register_alice(&service).await;

        let token = session::Token::generate();
        let created_at = session::CreationDateTime::now()
            - Duration::from_secs(7200);
        service
            .sessions()
            .execute(Insert((
                token.clone(),
                Session {
                    user_id: alice.id,
                    created_at,
                    expires_at: (created_at + Duration::from_secs(3600))
                        .coerce(),
                },
            )))
            .await
            .unwrap();

        let err = service
            .execute(AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::SessionExpired));

        // The expired record is removed lazily on access.
        assert!(service
            .sessions()
            .execute(Select(By::<Option<Session>, _>::new(token)))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn revoked_session_is_rejected_and_revoke_is_idempotent() {
        use authorize_user_session::ExecutionError as E;

        let service = service();
        let _ = register_alice(&service).await;

        let out = service
            .execute(credentials("alice", "correct horse"))
            .await
            .unwrap();

        service
            .execute(RevokeUserSession {
                token: out.token.clone(),
            })
            .await
            .unwrap();

        let err = service
            .execute(AuthorizeUserSession {
                token: out.token.clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::SessionNotExists));

        // Revoking again still succeeds.
        service
            .execute(RevokeUserSession { token: out.token })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let service = service();

        let first = service.execute(EnsureAdminUser).await.unwrap();
        let second = service.execute(EnsureAdminUser).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.is_admin);

        let admins = service
            .database()
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_admin)
            .count();
        assert_eq!(admins, 1);

        // The bootstrapped credentials actually authenticate.
        let out = service
            .execute(credentials("admin", "admin123"))
            .await
            .unwrap();
        assert!(out.user.is_admin);
    }

    #[tokio::test]
    async fn occupied_login_is_rejected() {
        use super::create_user::ExecutionError as E;

        let service = service();
        let _ = register_alice(&service).await;

        let err = service
            .execute(CreateUser {
                name: user::Name::new("Impostor").unwrap(),
                login: user::Login::new("alice").unwrap(),
                password: SecretBox::new(Box::new(
                    user::Password::new("whatever").unwrap(),
                )),
                email: user::Email::new("impostor@example.com"),
                phone: None,
                city: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::LoginOccupied(_)));
    }
}
