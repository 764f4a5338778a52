//! Travel data provider abstraction.

pub mod provider;

pub use provider::TravelProvider;
