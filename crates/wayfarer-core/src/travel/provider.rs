//! TravelProvider trait definition.
//!
//! The port the tool layer queries for flights and activities. The concrete
//! Amadeus client lives in wayfarer-infra.

use wayfarer_types::error::TravelError;
use wayfarer_types::travel::{FlightOffer, FlightQuery, PointOfInterest};

/// Trait for travel data backends (flight offers, activities).
pub trait TravelProvider: Send + Sync {
    /// Search flight offers for a validated query. Implementations cap the
    /// result list at a handful of offers suitable for chat display.
    fn search_flights(
        &self,
        query: &FlightQuery,
    ) -> impl std::future::Future<Output = Result<Vec<FlightOffer>, TravelError>> + Send;

    /// Search activities and points of interest around a coordinate.
    fn search_activities(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl std::future::Future<Output = Result<Vec<PointOfInterest>, TravelError>> + Send;
}
