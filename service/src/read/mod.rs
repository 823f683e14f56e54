//! Read entities definitions.

pub mod bicycle;
