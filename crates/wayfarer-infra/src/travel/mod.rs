//! Travel data provider implementations.

pub mod amadeus;

pub use amadeus::AmadeusClient;
