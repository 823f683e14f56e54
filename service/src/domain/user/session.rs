//! [`Session`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display};
use rand::RngCore as _;
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// Server-side record of an authenticated [`User`] session.
///
/// Lives in the session store keyed by its [`Token`] and is re-validated
/// against the store on every request, so revocation takes effect
/// immediately.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Session {
    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`DateTime`] when this [`Session`] was created.
    #[serde(with = "common::datetime::serde::unix_timestamp")]
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Session`] expires.
    ///
    /// Absolute expiry: it's fixed at creation and never slides.
    #[serde(with = "common::datetime::serde::unix_timestamp")]
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Indicates whether this [`Session`] is expired at the provided moment.
    #[must_use]
    pub fn is_expired_at(&self, moment: ExpirationDateTime) -> bool {
        self.expires_at <= moment
    }
}

/// Opaque token identifying a [`Session`].
///
/// 32 bytes of OS CSPRNG output, hex-encoded. Unguessable and carrying no
/// claims: the [`Session`] state lives on the server only.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Token(String);

impl Token {
    /// Number of random bytes in a [`Token`] (doubled by hex encoding).
    const LEN: usize = 32;

    /// Generates a new random [`Token`].
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; Self::LEN];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Creates a new [`Token`] without checking its contents.
    ///
    /// # Safety
    ///
    /// The provided `token` must be a valid [`Token`] representation.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(token: String) -> Self {
        Self(token)
    }

    /// Checks whether the given `token` is a valid [`Token`] representation.
    fn check(token: impl AsRef<str>) -> bool {
        let token = token.as_ref();
        token.len() == 2 * Self::LEN
            && token.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl FromStr for Token {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::check(s)
            .then(|| Self(s.to_owned()))
            .ok_or("invalid `Token`")
    }
}

/// [`DateTime`] of a [`Session`] creation.
pub type CreationDateTime = DateTimeOf<(Session, unit::Creation)>;

/// [`DateTime`] of a [`Session`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;

#[cfg(test)]
mod spec {
    use super::Token;

    #[test]
    fn generated_tokens_are_unique_and_parseable() {
        let first = Token::generate();
        let second = Token::generate();

        assert_ne!(first, second);
        assert_eq!(first.as_ref().len(), 64);
        assert_eq!(
            first.as_ref().parse::<Token>().expect("parseable"),
            first,
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!("".parse::<Token>().is_err());
        assert!("abc123".parse::<Token>().is_err());
        assert!("g".repeat(64).parse::<Token>().is_err());
        assert!("a".repeat(63).parse::<Token>().is_err());
        assert!("a".repeat(64).parse::<Token>().is_ok());
    }
}
