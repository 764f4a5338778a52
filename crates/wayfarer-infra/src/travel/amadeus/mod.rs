//! Amadeus self-service API client.
//!
//! Implements [`wayfarer_core::travel::TravelProvider`] against the Amadeus
//! flight-offers and activities endpoints, with a cached OAuth2
//! client-credentials token.

mod client;
mod types;

pub use client::AmadeusClient;
