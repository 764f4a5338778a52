//! Normalized travel provider records.
//!
//! The travel provider's verbose responses are flattened into these small
//! records before being attached to a chat message, so the client only ever
//! sees a stable shape regardless of provider.

use serde::{Deserialize, Serialize};

/// A single candidate flight, normalized from a provider flight offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Carrier code of the first segment (e.g. "AF").
    pub airline: String,
    /// Aircraft type code of the first segment.
    pub aircraft: String,
    /// Departure time of the first segment (ISO-8601 local).
    pub departure_time: String,
    /// Arrival time of the final segment (ISO-8601 local).
    pub arrival_time: String,
    /// Total price as the provider's decimal string, with currency.
    pub price: String,
}

/// A candidate activity or point of interest near a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    pub description: String,
    pub price: String,
    pub pictures: Vec<String>,
}

/// A lodging suggestion. The agent proposes these by name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LodgingOption {
    pub name: String,
}

/// Validated parameters for a flight search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightQuery {
    /// IATA code of the origin airport.
    pub origin: String,
    /// IATA code of the destination airport.
    pub destination: String,
    /// Departure date, `YYYY-MM-DD`.
    pub departure_date: String,
    /// Number of adult travelers (age 12+ on departure date).
    pub adults: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_offer_serde_roundtrip() {
        let offer = FlightOffer {
            airline: "AF".to_string(),
            aircraft: "77W".to_string(),
            departure_time: "2025-03-01T10:15:00".to_string(),
            arrival_time: "2025-03-02T07:40:00".to_string(),
            price: "842.50 USD".to_string(),
        };
        let json = serde_json::to_string(&offer).unwrap();
        let parsed: FlightOffer = serde_json::from_str(&json).unwrap();
        assert_eq!(offer, parsed);
    }

    #[test]
    fn test_flight_query_shape() {
        let query = FlightQuery {
            origin: "CDG".to_string(),
            destination: "HND".to_string(),
            departure_date: "2025-03-01".to_string(),
            adults: 2,
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["origin"], "CDG");
        assert_eq!(json["adults"], 2);
    }
}
