//! [`Bicycle`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

/// Second-hand bicycle listed on the marketplace.
#[derive(Clone, Debug, From)]
pub struct Bicycle {
    /// ID of this [`Bicycle`].
    pub id: Id,

    /// ID of the [`User`] selling this [`Bicycle`].
    pub seller_id: user::Id,

    /// [`Category`] of this [`Bicycle`].
    pub category: Category,

    /// [`Brand`] of this [`Bicycle`].
    pub brand: Brand,

    /// [`Model`] of this [`Bicycle`].
    pub model: Model,

    /// Year this [`Bicycle`] was originally purchased in.
    pub purchase_year: PurchaseYear,

    /// Asking [`Price`] of this [`Bicycle`].
    pub price: Price,

    /// [`Condition`] of this [`Bicycle`].
    pub condition: Condition,

    /// Listing [`Status`] of this [`Bicycle`].
    pub status: Status,

    /// Indicator whether this listing is promoted as premium.
    pub is_premium: bool,

    /// [`DateTime`] when this [`Bicycle`] was listed.
    pub created_at: CreationDateTime,
}

/// ID of a [`Bicycle`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    derive_more::FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Age category of a `Bicycle`."]
    enum Category {
        #[doc = "Bicycle sized for adults."]
        Adult = 1,

        #[doc = "Bicycle sized for kids."]
        Kids = 2,
    }
}

define_kind! {
    #[doc = "Wear condition of a `Bicycle`."]
    enum Condition {
        #[doc = "Noticeable wear, fully functional."]
        Fair = 1,

        #[doc = "Light wear."]
        Good = 2,

        #[doc = "Barely used."]
        LikeNew = 3,
    }
}

define_kind! {
    #[doc = "Listing status of a `Bicycle`."]
    enum Status {
        #[doc = "Listed and available for sale."]
        Available = 1,

        #[doc = "Sold and kept for history only."]
        Sold = 2,
    }
}

/// Brand of a [`Bicycle`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Brand(String);

impl Brand {
    /// Creates a new [`Brand`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `brand` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(brand: impl Into<String>) -> Self {
        Self(brand.into())
    }

    /// Creates a new [`Brand`] if the given `brand` is valid.
    #[must_use]
    pub fn new(brand: impl Into<String>) -> Option<Self> {
        let brand = brand.into();
        Self::check(&brand).then_some(Self(brand))
    }

    /// Checks whether the given `brand` is a valid [`Brand`].
    fn check(brand: impl AsRef<str>) -> bool {
        let brand = brand.as_ref();
        brand.trim() == brand && !brand.is_empty() && brand.len() <= 100
    }
}

impl FromStr for Brand {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Brand`")
    }
}

/// Model of a [`Bicycle`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `model` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    /// Creates a new [`Model`] if the given `model` is valid.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Option<Self> {
        let model = model.into();
        Self::check(&model).then_some(Self(model))
    }

    /// Checks whether the given `model` is a valid [`Model`].
    fn check(model: impl AsRef<str>) -> bool {
        let model = model.as_ref();
        model.trim() == model && !model.is_empty() && model.len() <= 100
    }
}

impl FromStr for Model {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Model`")
    }
}

/// Year a [`Bicycle`] was originally purchased in.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PurchaseYear(i32);

impl PurchaseYear {
    /// Creates a new [`PurchaseYear`] if the given `year` is valid.
    #[must_use]
    pub fn new(year: i32) -> Option<Self> {
        (1990..=2100).contains(&year).then_some(Self(year))
    }
}

/// Asking price of a [`Bicycle`], in whole currency units.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Price(i32);

impl Price {
    /// Creates a new [`Price`] if the given `price` is valid.
    #[must_use]
    pub fn new(price: i32) -> Option<Self> {
        (price >= 0).then_some(Self(price))
    }
}

/// [`DateTime`] when a [`Bicycle`] was listed.
pub type CreationDateTime = DateTimeOf<(Bicycle, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Brand, Category, Condition, Id, Price, PurchaseYear, Status};

    #[test]
    fn id_parses_from_its_string_form() {
        let id = Id::new();
        assert_eq!(id.to_string().parse::<Id>().unwrap(), id);
    }

    #[test]
    fn kinds_have_wire_representation() {
        assert_eq!(
            serde_json::to_string(&Category::Adult).unwrap(),
            "\"ADULT\"",
        );
        assert_eq!(
            serde_json::to_string(&Condition::LikeNew).unwrap(),
            "\"LIKE_NEW\"",
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"SOLD\"").unwrap(),
            Status::Sold,
        );
    }

    #[test]
    fn brand_format() {
        assert!(Brand::new("Hero").is_some());
        assert!(Brand::new("Firefox Bikes").is_some());

        assert!(Brand::new("").is_none());
        assert!(Brand::new(" padded ").is_none());
        assert!(Brand::new("b".repeat(101)).is_none());
    }

    #[test]
    fn price_is_non_negative() {
        assert!(Price::new(0).is_some());
        assert!(Price::new(15_000).is_some());
        assert!(Price::new(-1).is_none());
    }

    #[test]
    fn purchase_year_range() {
        assert!(PurchaseYear::new(2019).is_some());
        assert!(PurchaseYear::new(1989).is_none());
        assert!(PurchaseYear::new(2101).is_none());
    }
}
