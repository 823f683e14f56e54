//! [`Bicycle`] read model definition.
//!
//! [`Bicycle`]: crate::domain::Bicycle

pub mod list {
    //! [`Bicycle`]s list definitions.
    //!
    //! [`Bicycle`]: crate::domain::Bicycle

    use crate::domain::bicycle;
    #[cfg(doc)]
    use crate::domain::Bicycle;

    /// Filter of a [`Bicycle`]s list selection.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`bicycle::Category`] to select [`Bicycle`]s of.
        pub category: Option<bicycle::Category>,

        /// [`bicycle::Condition`] to select [`Bicycle`]s of.
        pub condition: Option<bicycle::Condition>,

        /// [`bicycle::Brand`] (or its part) to fuzzy search for.
        pub brand: Option<bicycle::Brand>,

        /// Indicator whether only premium [`Bicycle`]s should be selected.
        pub premium_only: bool,

        /// Lowest acceptable [`bicycle::Price`], inclusive.
        pub min_price: Option<bicycle::Price>,

        /// Highest acceptable [`bicycle::Price`], inclusive.
        pub max_price: Option<bicycle::Price>,

        /// Indicator whether sold [`Bicycle`]s should be selected too.
        pub include_sold: bool,

        /// [`Sort`]ing of the selected [`Bicycle`]s.
        pub sort: Sort,
    }

    /// Sorting of a [`Bicycle`]s list selection.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum Sort {
        /// Most recently listed first.
        #[default]
        Newest,

        /// Cheapest first.
        PriceAscending,

        /// Most expensive first.
        PriceDescending,
    }

    impl Sort {
        /// Returns the `ORDER BY` SQL representation of this [`Sort`]ing.
        #[must_use]
        pub fn sql(self) -> &'static str {
            match self {
                Self::Newest => "created_at DESC",
                Self::PriceAscending => "price ASC",
                Self::PriceDescending => "price DESC",
            }
        }
    }
}
