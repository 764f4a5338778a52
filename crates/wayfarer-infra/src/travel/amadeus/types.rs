//! Wire types for the Amadeus flight-offers and activities responses,
//! and their normalization into the small records the chat client renders.

use serde::Deserialize;

use wayfarer_types::travel::{FlightOffer, PointOfInterest};

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime of the token in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<WireFlightOffer>,
}

#[derive(Debug, Deserialize)]
pub struct WireFlightOffer {
    pub itineraries: Vec<WireItinerary>,
    pub price: WirePrice,
}

#[derive(Debug, Deserialize)]
pub struct WireItinerary {
    pub segments: Vec<WireSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSegment {
    pub departure: WireEndpoint,
    pub arrival: WireEndpoint,
    pub carrier_code: String,
    pub aircraft: WireAircraft,
}

#[derive(Debug, Deserialize)]
pub struct WireEndpoint {
    pub at: String,
}

#[derive(Debug, Deserialize)]
pub struct WireAircraft {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct WirePrice {
    pub total: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivitiesResponse {
    #[serde(default)]
    pub data: Vec<WireActivity>,
}

#[derive(Debug, Deserialize)]
pub struct WireActivity {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<WireActivityPrice>,
    #[serde(default)]
    pub pictures: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireActivityPrice {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

/// Flatten a provider flight offer into the record the client renders.
///
/// The first itinerary's first segment supplies airline, aircraft, and
/// departure time; its last segment supplies the arrival time. Offers
/// without segments are dropped.
pub fn normalize_offer(offer: &WireFlightOffer) -> Option<FlightOffer> {
    let itinerary = offer.itineraries.first()?;
    let first = itinerary.segments.first()?;
    let last = itinerary.segments.last()?;

    let price = match &offer.price.currency {
        Some(currency) => format!("{} {}", offer.price.total, currency),
        None => offer.price.total.clone(),
    };

    Some(FlightOffer {
        airline: first.carrier_code.clone(),
        aircraft: first.aircraft.code.clone(),
        departure_time: first.departure.at.clone(),
        arrival_time: last.arrival.at.clone(),
        price,
    })
}

pub fn normalize_activity(activity: WireActivity) -> PointOfInterest {
    let price = activity
        .price
        .map(|p| {
            match (p.amount, p.currency_code) {
                (Some(amount), Some(currency)) => format!("{amount} {currency}"),
                (Some(amount), None) => amount,
                _ => String::new(),
            }
        })
        .unwrap_or_default();

    PointOfInterest {
        name: activity.name,
        description: activity.description.unwrap_or_default(),
        price,
        pictures: activity.pictures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_offer_uses_first_and_last_segment() {
        let raw = json!({
            "itineraries": [{
                "segments": [
                    {
                        "departure": { "at": "2025-03-01T10:15:00" },
                        "arrival": { "at": "2025-03-01T14:05:00" },
                        "carrierCode": "AF",
                        "aircraft": { "code": "77W" }
                    },
                    {
                        "departure": { "at": "2025-03-01T16:30:00" },
                        "arrival": { "at": "2025-03-02T07:40:00" },
                        "carrierCode": "JL",
                        "aircraft": { "code": "789" }
                    }
                ]
            }],
            "price": { "total": "842.50", "currency": "USD" }
        });

        let offer: WireFlightOffer = serde_json::from_value(raw).unwrap();
        let normalized = normalize_offer(&offer).unwrap();
        assert_eq!(normalized.airline, "AF");
        assert_eq!(normalized.aircraft, "77W");
        assert_eq!(normalized.departure_time, "2025-03-01T10:15:00");
        assert_eq!(normalized.arrival_time, "2025-03-02T07:40:00");
        assert_eq!(normalized.price, "842.50 USD");
    }

    #[test]
    fn test_normalize_offer_without_segments_is_dropped() {
        let raw = json!({
            "itineraries": [{ "segments": [] }],
            "price": { "total": "100.00" }
        });
        let offer: WireFlightOffer = serde_json::from_value(raw).unwrap();
        assert!(normalize_offer(&offer).is_none());
    }

    #[test]
    fn test_normalize_activity_defaults() {
        let raw = json!({ "name": "Senso-ji" });
        let activity: WireActivity = serde_json::from_value(raw).unwrap();
        let normalized = normalize_activity(activity);
        assert_eq!(normalized.name, "Senso-ji");
        assert_eq!(normalized.description, "");
        assert_eq!(normalized.price, "");
        assert!(normalized.pictures.is_empty());
    }

    #[test]
    fn test_normalize_activity_full() {
        let raw = json!({
            "name": "Tokyo Tower",
            "description": "Observation deck",
            "price": { "amount": "15.00", "currencyCode": "USD" },
            "pictures": ["https://example.com/tower.jpg"]
        });
        let activity: WireActivity = serde_json::from_value(raw).unwrap();
        let normalized = normalize_activity(activity);
        assert_eq!(normalized.price, "15.00 USD");
        assert_eq!(normalized.pictures.len(), 1);
    }

    #[test]
    fn test_empty_data_array_parses() {
        let response: FlightOffersResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.data.is_empty());
    }
}
