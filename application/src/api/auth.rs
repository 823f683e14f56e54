//! Authentication endpoints of the REST API.

use axum::{Extension, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::user::{self, session},
};

use crate::{
    api, config, define_error, AsError, Auth, Error, Service, SESSION_COOKIE,
};

/// `POST /api/login` request body.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    /// [`user::Login`] of the [`User`].
    ///
    /// [`User`]: service::domain::User
    pub login: String,

    /// [`user::Password`] of the [`User`].
    ///
    /// [`User`]: service::domain::User
    pub password: String,
}

/// `POST /api/logout` response body.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct LogoutResponse {
    /// Indicator of a successful logout.
    pub ok: bool,
}

/// `POST /api/login` handler.
///
/// Authenticates the [`User`] and sets the session cookie. Any credential
/// failure answers with the same `401` and the same message: whether the
/// login or the password was wrong is never revealed.
///
/// [`User`]: service::domain::User
pub async fn login(
    Extension(service): Extension<Service>,
    Extension(cookie): Extension<config::Cookie>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<api::user::Response>), Error> {
    use LoginError as E;

    let LoginRequest { login, password } = body;

    // Malformed credentials cannot match any stored ones, so they get the
    // very same uniform rejection.
    let login = login
        .parse::<user::Login>()
        .map_err(|_| Error::from(E::WrongCredentials))?;
    let password = user::Password::new(password)
        .ok_or_else(|| Error::from(E::WrongCredentials))?;

    let out = service
        .execute(command::CreateUserSession::ByCredentials {
            login,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((
        jar.add(session_cookie(&out.token, out.expires_at, &cookie)),
        Json(out.user.into()),
    ))
}

/// `POST /api/logout` handler.
///
/// Revokes the current session and removes the cookie. Idempotent on the
/// store side: revoking an already revoked session still succeeds.
pub async fn logout(
    Extension(service): Extension<Service>,
    Auth(principal): Auth,
    jar: CookieJar,
) -> Result<(CookieJar, Json<LogoutResponse>), Error> {
    service
        .execute(command::RevokeUserSession {
            token: principal.token,
        })
        .await
        .map_err(AsError::into_error)?;

    let removal = Cookie::build(SESSION_COOKIE).path("/").build();
    Ok((jar.remove(removal), Json(LogoutResponse { ok: true })))
}

/// `GET /api/user` handler.
///
/// Returns the authenticated [`User`], or `401` without a valid session.
///
/// [`User`]: service::domain::User
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
pub async fn current_user(Auth(principal): Auth) -> Json<api::user::Response> {
    Json(principal.user.into())
}

/// Builds the session [`Cookie`] carrying the provided [`session::Token`].
pub(crate) fn session_cookie(
    token: &session::Token,
    expires_at: session::ExpirationDateTime,
    config: &config::Cookie,
) -> Cookie<'static> {
    let max_age = expires_at - session::ExpirationDateTime::now();

    Cookie::build((SESSION_COOKIE, token.as_ref().to_owned()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .path("/")
        .max_age(
            time::Duration::try_from(max_age)
                .unwrap_or(time::Duration::ZERO),
        )
        .build()
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_user_session::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::Store(e) => e.try_as_error(),
            // `ByUserId` is only executed with freshly created users.
            E::UserNotExists(_) => None,
            E::WrongCredentials => Some(LoginError::WrongCredentials.into()),
        }
    }
}

impl AsError for command::revoke_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::revoke_user_session::ExecutionError as E;

        match self {
            E::Store(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum LoginError {
        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Wrong login or password"]
        WrongCredentials,
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use axum_extra::extract::cookie::SameSite;
    use service::domain::user::session;

    use crate::{config, AsError as _};

    use super::session_cookie;

    #[test]
    fn session_cookie_is_scoped_and_inaccessible_to_scripts() {
        let token = session::Token::generate();
        let expires_at =
            (session::ExpirationDateTime::now() + Duration::from_secs(3600))
                .coerce();

        let cookie = session_cookie(
            &token,
            expires_at,
            &config::Cookie { secure: true },
        );

        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), token.as_ref());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.max_age().is_some());
    }

    #[test]
    fn already_expired_session_cookie_gets_zero_max_age() {
        let token = session::Token::generate();
        let expires_at =
            (session::ExpirationDateTime::now() - Duration::from_secs(3600))
                .coerce();

        let cookie = session_cookie(
            &token,
            expires_at,
            &config::Cookie { secure: false },
        );

        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }

    #[test]
    fn credential_failure_is_uniform() {
        use service::command::create_user_session::ExecutionError as E;

        let err = E::WrongCredentials.as_error();

        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, "WRONG_CREDENTIALS");
    }
}
