use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, info, warn};

use crate::{
    error::LookupError,
    model::{LocationQuery, WeatherReport},
    parse,
    query::QueryBuilder,
};

/// Anything that can answer a single weather lookup.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn lookup(&self, query: &LocationQuery) -> Result<WeatherReport, LookupError>;
}

/// Issues exactly one HTTP GET per lookup and parses the body.
///
/// No retries and no timeout beyond whatever the `reqwest::Client` was built
/// with. Calls are independent; nothing is cached between them.
#[derive(Debug, Clone)]
pub struct WeatherService {
    queries: QueryBuilder,
    http: Client,
}

impl WeatherService {
    pub fn new(queries: QueryBuilder) -> Self {
        Self::with_client(queries, Client::new())
    }

    /// Use a preconfigured client, e.g. one with a short timeout in tests.
    pub fn with_client(queries: QueryBuilder, http: Client) -> Self {
        Self { queries, http }
    }

    pub fn queries(&self) -> &QueryBuilder {
        &self.queries
    }

    async fn fetch(&self, query: &LocationQuery) -> Result<String, LookupError> {
        let url = self.queries.build_url(query);
        debug!(url = %self.queries.redacted_url(query), "requesting current weather");

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::Network(format!(
                "HTTP {status}: {}",
                truncate_body(&body)
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for WeatherService {
    async fn lookup(&self, query: &LocationQuery) -> Result<WeatherReport, LookupError> {
        let result = match self.fetch(query).await {
            Ok(body) => parse::parse(&body).map_err(LookupError::from),
            Err(err) => Err(err),
        };

        match &result {
            Ok(report) => info!(%query, location = %report.location_label, "weather lookup succeeded"),
            Err(err) => warn!(%query, error = %err, "weather lookup failed"),
        }

        result
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("city not found"), "city not found");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn service_exposes_its_query_builder() {
        let service = WeatherService::new(QueryBuilder::new("KEY").with_endpoint("http://x/w"));
        assert_eq!(service.queries().endpoint(), "http://x/w");
    }
}
