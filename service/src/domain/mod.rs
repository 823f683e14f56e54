//! Domain entities definitions.

pub mod bicycle;
pub mod user;

pub use self::{bicycle::Bicycle, user::User};
