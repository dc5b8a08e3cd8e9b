//! Request URL construction for the current-weather endpoint.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::model::LocationQuery;

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

const REDACTED_KEY: &str = "REDACTED";

/// Builds request URLs for one endpoint and API key.
#[derive(Clone)]
pub struct QueryBuilder {
    endpoint: String,
    api_key: String,
    metric_coordinates: bool,
}

impl std::fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("endpoint", &self.endpoint)
            .field("metric_coordinates", &self.metric_coordinates)
            .finish_non_exhaustive()
    }
}

impl QueryBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            metric_coordinates: false,
        }
    }

    /// Point at a different endpoint, e.g. a mock server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Also request `units=metric` for coordinate queries.
    ///
    /// Off by default: coordinate lookups have always been sent without a
    /// units parameter, so the provider answers them in Kelvin.
    pub fn with_metric_coordinates(mut self, enabled: bool) -> Self {
        self.metric_coordinates = enabled;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_url(&self, query: &LocationQuery) -> String {
        self.render(query, &self.api_key)
    }

    /// Same URL as [`QueryBuilder::build_url`] with the API key masked, for logs.
    pub fn redacted_url(&self, query: &LocationQuery) -> String {
        self.render(query, REDACTED_KEY)
    }

    fn render(&self, query: &LocationQuery, api_key: &str) -> String {
        let appid = utf8_percent_encode(api_key, NON_ALPHANUMERIC);

        match query {
            LocationQuery::ByCity(name) => {
                let q = utf8_percent_encode(name, NON_ALPHANUMERIC);
                format!("{}?q={q}&appid={appid}&units=metric", self.endpoint)
            }
            LocationQuery::ByCoordinates { latitude, longitude } => {
                let mut url =
                    format!("{}?lat={latitude}&lon={longitude}&appid={appid}", self.endpoint);
                if self.metric_coordinates {
                    url.push_str("&units=metric");
                }
                url
            }
        }
    }
}

/// Request URL for `query` against the default endpoint.
pub fn build_url(query: &LocationQuery, api_key: &str) -> String {
    QueryBuilder::new(api_key).build_url(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_query_is_encoded_and_metric() {
        let url = build_url(&LocationQuery::city("Ottawa"), "KEY");

        assert_eq!(
            url,
            "https://api.openweathermap.org/data/2.5/weather?q=Ottawa&appid=KEY&units=metric"
        );
        assert!(!url.contains("lat="));
    }

    #[test]
    fn city_names_are_percent_encoded() {
        let url = build_url(&LocationQuery::city("São Paulo"), "KEY");
        assert!(url.contains("q=S%C3%A3o%20Paulo&"), "{url}");

        let url = build_url(&LocationQuery::city("a&units=imperial"), "KEY");
        assert!(url.contains("q=a%26units%3Dimperial&"), "{url}");
        assert!(url.ends_with("&units=metric"));
    }

    #[test]
    fn coordinate_query_omits_units_by_default() {
        let url = build_url(&LocationQuery::coordinates(45.4215, -75.6972), "KEY");

        assert!(url.contains("lat=45.4215&lon=-75.6972"), "{url}");
        assert!(url.contains("appid=KEY"));
        assert!(!url.contains("units=metric"));
        assert!(!url.contains("q="));
    }

    #[test]
    fn coordinate_query_can_request_metric() {
        let builder = QueryBuilder::new("KEY").with_metric_coordinates(true);
        let url = builder.build_url(&LocationQuery::coordinates(1.5, 2.0));

        assert!(url.contains("lat=1.5&lon=2&appid=KEY&units=metric"), "{url}");
    }

    #[test]
    fn custom_endpoint_is_used() {
        let builder = QueryBuilder::new("KEY").with_endpoint("http://127.0.0.1:9000/weather");
        let url = builder.build_url(&LocationQuery::city("Rome"));

        assert!(url.starts_with("http://127.0.0.1:9000/weather?q=Rome"));
    }

    #[test]
    fn redacted_url_hides_the_key() {
        let builder = QueryBuilder::new("secret-key");
        let url = builder.redacted_url(&LocationQuery::city("Rome"));

        assert!(!url.contains("secret-key"));
        assert!(url.contains("appid=REDACTED"));
        assert!(!format!("{builder:?}").contains("secret-key"));
    }
}
