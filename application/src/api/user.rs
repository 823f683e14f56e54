//! [`User`]-related endpoints of the REST API.
//!
//! [`User`]: service::domain::User

use axum::{Extension, Json};
use axum_extra::extract::CookieJar;
use http::StatusCode;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{user, User},
    query,
};

use crate::{
    api, config, define_error, AdminAuth, AsError, Error, Service,
};

/// Wire representation of a [`User`].
#[derive(Clone, Debug, Serialize)]
pub struct Response {
    /// ID of the [`User`].
    pub id: user::Id,

    /// Login of the [`User`].
    pub login: String,

    /// Name of the [`User`].
    pub name: String,

    /// Email address of the [`User`].
    pub email: Option<String>,

    /// Phone number of the [`User`].
    pub phone: Option<String>,

    /// City the [`User`] is located in.
    pub city: Option<String>,

    /// Indicator whether the [`User`] is an administrator.
    pub is_admin: bool,

    /// Moment the [`User`] was registered at.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: user::CreationDateTime,
}

impl From<User> for Response {
    fn from(user: User) -> Self {
        let User {
            id,
            name,
            login,
            password_hash: _,
            email,
            phone,
            city,
            is_admin,
            created_at,
            deleted_at: _,
        } = user;

        Self {
            id,
            login: login.to_string(),
            name: name.to_string(),
            email: email.map(|e| e.to_string()),
            phone: phone.map(|p| p.to_string()),
            city: city.map(|c| c.to_string()),
            is_admin,
            created_at,
        }
    }
}

/// `POST /api/register` request body.
#[derive(Clone, Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login of the new [`User`].
    pub login: String,

    /// Password of the new [`User`].
    pub password: String,

    /// Name of the new [`User`].
    pub name: String,

    /// Email address of the new [`User`].
    #[serde(default)]
    pub email: Option<String>,

    /// Phone number of the new [`User`].
    #[serde(default)]
    pub phone: Option<String>,

    /// City of the new [`User`].
    #[serde(default)]
    pub city: Option<String>,
}

/// `POST /api/register` handler.
///
/// Creates a new [`User`] and immediately authenticates them, so no
/// separate login round-trip is needed after registration.
pub async fn register(
    Extension(service): Extension<Service>,
    Extension(cookie): Extension<config::Cookie>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<Response>), Error> {
    use RegisterError as E;

    let RegisterRequest {
        login,
        password,
        name,
        email,
        phone,
        city,
    } = body;

    let user = service
        .execute(command::CreateUser {
            name: user::Name::new(name).ok_or(E::InvalidName)?,
            login: user::Login::new(login).ok_or(E::InvalidLogin)?,
            password: SecretBox::new(Box::new(
                user::Password::new(password).ok_or(E::InvalidPassword)?,
            )),
            email: email
                .map(|e| user::Email::new(e).ok_or(E::InvalidEmail))
                .transpose()?,
            phone: phone
                .map(|p| user::Phone::new(p).ok_or(E::InvalidPhone))
                .transpose()?,
            city: city
                .map(|c| user::City::new(c).ok_or(E::InvalidCity))
                .transpose()?,
        })
        .await
        .map_err(AsError::into_error)?;

    let out = service
        .execute(command::CreateUserSession::ByUserId(user.id))
        .await
        .map_err(AsError::into_error)?;

    Ok((
        StatusCode::CREATED,
        jar.add(api::auth::session_cookie(
            &out.token,
            out.expires_at,
            &cookie,
        )),
        Json(out.user.into()),
    ))
}

/// `GET /api/admin/users` handler.
///
/// Lists all registered [`User`]s for the back office, newest first.
/// Administrators only.
pub async fn list(
    Extension(service): Extension<Service>,
    AdminAuth(_): AdminAuth,
) -> Result<Json<Vec<Response>>, Error> {
    let users = service
        .execute(query::users::All::by(()))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        use command::create_user::ExecutionError as E;

        match self {
            E::Db(e) => e.try_as_error(),
            E::LoginOccupied(_) => Some(RegisterError::LoginOccupied.into()),
            E::NoContactInfo => Some(RegisterError::NoContactInfo.into()),
        }
    }
}

define_error! {
    enum RegisterError {
        #[code = "INVALID_LOGIN"]
        #[status = BAD_REQUEST]
        #[message = "Login must be 4-20 letters, digits or underscores"]
        InvalidLogin,

        #[code = "INVALID_PASSWORD"]
        #[status = BAD_REQUEST]
        #[message = "Password must be 2-128 characters long"]
        InvalidPassword,

        #[code = "INVALID_NAME"]
        #[status = BAD_REQUEST]
        #[message = "Invalid name"]
        InvalidName,

        #[code = "INVALID_EMAIL"]
        #[status = BAD_REQUEST]
        #[message = "Invalid email address"]
        InvalidEmail,

        #[code = "INVALID_PHONE"]
        #[status = BAD_REQUEST]
        #[message = "Invalid phone number"]
        InvalidPhone,

        #[code = "INVALID_CITY"]
        #[status = BAD_REQUEST]
        #[message = "Invalid city"]
        InvalidCity,

        #[code = "LOGIN_OCCUPIED"]
        #[status = CONFLICT]
        #[message = "Login is already occupied"]
        LoginOccupied,

        #[code = "NO_CONTACT_INFO"]
        #[status = BAD_REQUEST]
        #[message = "Either an email or a phone number is required"]
        NoContactInfo,
    }
}

#[cfg(test)]
mod spec {
    use crate::AsError as _;

    #[test]
    fn response_never_leaks_credentials() {
        use service::domain::{user, User};

        use super::Response;

        let password = user::Password::new("hunter42").expect("valid");
        let user = User {
            id: user::Id::new(),
            name: user::Name::new("Alice").expect("valid"),
            login: user::Login::new("alice").expect("valid"),
            password_hash: user::PasswordHash::new(&password),
            email: user::Email::new("alice@example.com"),
            phone: None,
            city: None,
            is_admin: false,
            created_at: user::CreationDateTime::now(),
            deleted_at: None,
        };

        let body = serde_json::to_value(Response::from(user))
            .expect("serializable");

        assert!(body.get("password_hash").is_none());
        assert!(body.get("password").is_none());
        assert_eq!(body["login"], "alice");
        // `created_at` goes over the wire as an RFC 3339 string.
        assert!(body["created_at"].is_string());
    }

    #[test]
    fn occupied_login_is_conflict() {
        use service::{
            command::create_user::ExecutionError as E, domain::user,
        };

        let login = user::Login::new("occupied").expect("valid login");
        let err = E::LoginOccupied(login).as_error();

        assert_eq!(err.status_code, http::StatusCode::CONFLICT);
        assert_eq!(err.code, "LOGIN_OCCUPIED");
    }

    #[test]
    fn missing_contact_info_is_client_error() {
        use service::command::create_user::ExecutionError as E;

        let err = E::NoContactInfo.as_error();

        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "NO_CONTACT_INFO");
    }
}
