//! Access admission guards of the REST API.

use axum::{async_trait, extract::FromRequestParts};
use axum_extra::extract::CookieJar;
use service::{
    command::{self, Command as _},
    domain::{
        user::{self, session},
        User,
    },
};

use crate::{define_error, AsError, Error, Service};

/// Name of the HTTP cookie carrying the [`session::Token`].
pub const SESSION_COOKIE: &str = "session";

/// Authenticated party of the current HTTP request.
///
/// Resolved from the session cookie on every request, so revocation and
/// expiry take effect immediately. Never cached across requests.
#[derive(Clone, Debug)]
pub struct Principal {
    /// [`User`] the session belongs to.
    pub user: User,

    /// [`session::Token`] the session was resolved from.
    pub token: session::Token,
}

impl Principal {
    /// Returns the ID of this [`Principal`]'s [`User`].
    #[must_use]
    pub fn user_id(&self) -> user::Id {
        self.user.id
    }

    /// Indicates whether this [`Principal`] is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.is_admin
    }
}

/// Extractor admitting any authenticated [`Principal`].
///
/// Rejects with `401` and the `AUTHENTICATION_REQUIRED` code when the
/// session cookie is missing, malformed, revoked or expired.
#[derive(Clone, Debug)]
pub struct Auth(pub Principal);

/// Extractor admitting administrator [`Principal`]s only.
///
/// Authentication is checked first: an anonymous request is rejected with
/// `401`, while an authenticated non-administrator gets `403` with the
/// `ADMIN_REQUIRED` code. The role is never consulted before
/// authentication succeeds.
#[derive(Clone, Debug)]
pub struct AdminAuth(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Service` extension"))?;

        let token = CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse::<session::Token>().ok())
            .ok_or_else(|| {
                Error::from(AuthError::AuthenticationRequired)
            })?;

        let out = service
            .execute(command::AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .map_err(AsError::into_error)?;

        Ok(Self(Principal {
            user: out.user,
            token,
        }))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Auth(principal) =
            Auth::from_request_parts(parts, state).await?;

        if !principal.is_admin() {
            return Err(AuthError::AdminRequired.into());
        }

        Ok(Self(principal))
    }
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::authorize_user_session::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::Store(e) => e.try_as_error(),
            // An unknown, expired or orphaned session is just "not
            // authenticated" to the client.
            E::SessionExpired | E::SessionNotExists | E::UserNotExists(_) => {
                Some(AuthError::AuthenticationRequired.into())
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHENTICATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authentication required"]
        AuthenticationRequired,

        #[code = "ADMIN_REQUIRED"]
        #[status = FORBIDDEN]
        #[message = "Administrator privileges required"]
        AdminRequired,
    }
}

#[cfg(test)]
mod spec {
    use service::{command::authorize_user_session, domain::user};

    use crate::AsError as _;

    use super::AuthError;

    #[test]
    fn admission_failures_are_unauthenticated_not_forbidden() {
        use authorize_user_session::ExecutionError as E;

        for e in [E::SessionNotExists, E::SessionExpired] {
            let err = e.as_error();
            assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
            assert_eq!(err.code, "AUTHENTICATION_REQUIRED");
        }

        let err = E::UserNotExists(user::Id::new()).as_error();
        assert_eq!(err.status_code, http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn admin_gate_is_forbidden_not_unauthenticated() {
        let err = crate::Error::from(AuthError::AdminRequired);

        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
        assert_eq!(err.code, "ADMIN_REQUIRED");
    }
}
