//! AmadeusClient -- concrete [`TravelProvider`] for the Amadeus
//! self-service APIs.
//!
//! Authentication uses the OAuth2 client-credentials grant. The bearer
//! token is cached and refreshed shortly before expiry, so concurrent
//! conversations share one token instead of hammering the token endpoint.

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::debug;

use wayfarer_core::travel::TravelProvider;
use wayfarer_types::error::TravelError;
use wayfarer_types::travel::{FlightOffer, FlightQuery, PointOfInterest};

use super::types::{
    ActivitiesResponse, FlightOffersResponse, TokenResponse, normalize_activity, normalize_offer,
};

/// Maximum flight offers requested from the provider; chat clients render
/// a handful of cards, not a result page.
const MAX_FLIGHT_OFFERS: u32 = 3;

/// Refresh the token this many seconds before the provider expires it.
const TOKEN_EXPIRY_SLACK_SECS: i64 = 30;

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Amadeus travel data client.
pub struct AmadeusClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    api_secret: SecretString,
    token: Mutex<Option<CachedToken>>,
}

impl AmadeusClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        api_secret: SecretString,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            api_secret,
            token: Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Return a valid bearer token, fetching or refreshing as needed.
    async fn bearer_token(&self) -> Result<String, TravelError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        debug!("requesting new amadeus access token");
        let response = self
            .client
            .post(self.url("/v1/security/oauth2/token"))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.expose_secret()),
                ("client_secret", self.api_secret.expose_secret()),
            ])
            .send()
            .await
            .map_err(|err| TravelError::Http(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(TravelError::Auth(format!("token request returned {status}: {detail}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| TravelError::Decode(err.to_string()))?;

        let expires_at = Utc::now()
            + chrono::Duration::seconds((token.expires_in - TOKEN_EXPIRY_SLACK_SECS).max(0));
        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at,
        });
        Ok(value)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TravelError> {
        let token = self.bearer_token().await?;
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|err| TravelError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TravelError::Provider {
                status: status.as_u16(),
                message: detail,
            });
        }

        response
            .json()
            .await
            .map_err(|err| TravelError::Decode(err.to_string()))
    }
}

impl TravelProvider for AmadeusClient {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>, TravelError> {
        let response: FlightOffersResponse = self
            .get_json(
                "/v2/shopping/flight-offers",
                &[
                    ("originLocationCode", query.origin.clone()),
                    ("destinationLocationCode", query.destination.clone()),
                    ("departureDate", query.departure_date.clone()),
                    ("adults", query.adults.to_string()),
                    ("max", MAX_FLIGHT_OFFERS.to_string()),
                    ("currencyCode", "USD".to_string()),
                ],
            )
            .await?;

        Ok(response
            .data
            .iter()
            .filter_map(normalize_offer)
            .take(MAX_FLIGHT_OFFERS as usize)
            .collect())
    }

    async fn search_activities(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<PointOfInterest>, TravelError> {
        let response: ActivitiesResponse = self
            .get_json(
                "/v1/shopping/activities",
                &[
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                ],
            )
            .await?;

        Ok(response.data.into_iter().map(normalize_activity).collect())
    }
}
