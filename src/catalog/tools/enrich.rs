//! Filter-facet lookups that add extra category rows for routable nodes.

use futures::future::join_all;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::catalog::tools::config::FilterEndpoint;
use crate::catalog::tools::error::{Result, ToolError};
use crate::catalog::tools::flatten::EnrichmentRequest;
use crate::catalog::tools::io::http::{BlockingCatalogClient, CatalogClient};
use crate::catalog::tools::model::CategoryRecord;

#[derive(Debug, Deserialize)]
struct FilterResponse {
    data: FilterData,
}

#[derive(Debug, Deserialize)]
struct FilterData {
    filters: Vec<FilterGroup>,
}

#[derive(Debug, Deserialize)]
struct FilterGroup {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    items: Option<Vec<FilterItem>>,
}

#[derive(Debug, Deserialize)]
struct FilterItem {
    id: i64,
    name: String,
}

/// Extracts the items of the `facet` filter group from a filter listing body.
pub fn parse_facet(body: &str, facet: &str) -> Result<Vec<CategoryRecord>> {
    let response: FilterResponse = serde_json::from_str(body)?;
    let group = response
        .data
        .filters
        .into_iter()
        .find(|group| group.name.as_deref() == Some(facet))
        .ok_or_else(|| ToolError::MissingFacet(facet.to_string()))?;
    let items = group
        .items
        .ok_or_else(|| ToolError::MissingFacet(facet.to_string()))?;

    Ok(items
        .into_iter()
        .map(|item| CategoryRecord::from_filter(item.id, item.name))
        .collect())
}

/// Fetches the facet rows for one node. Never fails: any error is logged
/// together with the URL and the node contributes no rows.
pub async fn fetch_filter_categories<C>(
    client: &C,
    endpoint: &FilterEndpoint,
    facet: &str,
    request: &EnrichmentRequest,
) -> Vec<CategoryRecord>
where
    C: CatalogClient + ?Sized,
{
    let url = endpoint.url(&request.shard, &request.query);
    let outcome = client
        .get_text(&url)
        .await
        .and_then(|body| parse_facet(&body, facet));
    settle(&url, request, outcome)
}

/// Blocking counterpart of [`fetch_filter_categories`].
pub fn fetch_filter_categories_blocking<C>(
    client: &C,
    endpoint: &FilterEndpoint,
    facet: &str,
    request: &EnrichmentRequest,
) -> Vec<CategoryRecord>
where
    C: BlockingCatalogClient + ?Sized,
{
    let url = endpoint.url(&request.shard, &request.query);
    let outcome = client
        .get_text(&url)
        .and_then(|body| parse_facet(&body, facet));
    settle(&url, request, outcome)
}

fn settle(
    url: &str,
    request: &EnrichmentRequest,
    outcome: Result<Vec<CategoryRecord>>,
) -> Vec<CategoryRecord> {
    match outcome {
        Ok(records) => {
            debug!(node_id = request.node_id, count = records.len(), "facet rows fetched");
            records
        }
        Err(error) => {
            warn!(node_id = request.node_id, %url, %error, "filter lookup failed");
            Vec::new()
        }
    }
}

/// Runs every request at once and waits for all of them. Results are
/// concatenated in submission order, whatever order they complete in.
pub async fn enrich_all<C>(
    client: &C,
    endpoint: &FilterEndpoint,
    facet: &str,
    requests: &[EnrichmentRequest],
) -> Vec<CategoryRecord>
where
    C: CatalogClient + ?Sized,
{
    let lookups = requests
        .iter()
        .map(|request| fetch_filter_categories(client, endpoint, facet, request));
    join_all(lookups).await.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::catalog::tools::config::DEFAULT_FACET;
    use crate::catalog::tools::model::SENTINEL_LEVEL;

    /// Serves canned bodies; the delay lets later requests finish first.
    struct CannedClient {
        bodies: HashMap<String, (String, u64)>,
    }

    impl CannedClient {
        fn new() -> Self {
            Self {
                bodies: HashMap::new(),
            }
        }

        fn serve(mut self, url: String, body: &str, delay_ms: u64) -> Self {
            self.bodies.insert(url, (body.to_string(), delay_ms));
            self
        }
    }

    #[async_trait]
    impl CatalogClient for CannedClient {
        async fn get_text(&self, url: &str) -> Result<String> {
            match self.bodies.get(url) {
                Some((body, delay_ms)) => {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    Ok(body.clone())
                }
                None => Err(ToolError::UnexpectedStatus {
                    url: url.to_string(),
                    status: 503,
                }),
            }
        }
    }

    impl BlockingCatalogClient for CannedClient {
        fn get_text(&self, url: &str) -> Result<String> {
            self.bodies
                .get(url)
                .map(|(body, _)| body.clone())
                .ok_or_else(|| ToolError::UnexpectedStatus {
                    url: url.to_string(),
                    status: 503,
                })
        }
    }

    fn request(node_id: i64, shard: &str) -> EnrichmentRequest {
        EnrichmentRequest {
            node_id,
            shard: shard.to_string(),
            query: format!("cat={node_id}"),
        }
    }

    fn facet_body(items: &[(i64, &str)]) -> String {
        let items: Vec<_> = items
            .iter()
            .map(|(id, name)| serde_json::json!({"id": id, "name": name, "count": 10}))
            .collect();
        serde_json::json!({
            "data": {
                "filters": [
                    {"name": "Цена", "key": "priceU"},
                    {"name": DEFAULT_FACET, "key": "xsubject", "items": items}
                ]
            }
        })
        .to_string()
    }

    #[test]
    fn parses_category_facet_items_with_sentinel_level() {
        let records = parse_facet(&facet_body(&[(9, "X"), (10, "Y")]), DEFAULT_FACET)
            .expect("facet parsed");

        assert_eq!(
            records,
            vec![
                CategoryRecord::from_filter(9, "X"),
                CategoryRecord::from_filter(10, "Y")
            ]
        );
        assert!(records.iter().all(|record| record.level() == SENTINEL_LEVEL));
    }

    #[test]
    fn missing_facet_is_an_error() {
        let body = r#"{"data": {"filters": [{"name": "Цена", "items": []}]}}"#;
        assert!(matches!(
            parse_facet(body, DEFAULT_FACET),
            Err(ToolError::MissingFacet(_))
        ));

        let empty = r#"{"data": {"filters": []}}"#;
        assert!(matches!(
            parse_facet(empty, DEFAULT_FACET),
            Err(ToolError::MissingFacet(_))
        ));
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        assert!(matches!(
            parse_facet("<html>", DEFAULT_FACET),
            Err(ToolError::Json(_))
        ));
        assert!(matches!(
            parse_facet(r#"{"data": {}}"#, DEFAULT_FACET),
            Err(ToolError::Json(_))
        ));
    }

    #[tokio::test]
    async fn failures_yield_no_rows() {
        let endpoint = FilterEndpoint::default();
        let client = CannedClient::new()
            .serve(
                endpoint.url("empty", "cat=2"),
                r#"{"data": {"filters": []}}"#,
                0,
            )
            .serve(endpoint.url("broken", "cat=3"), "not json", 0);

        for shard in ["offline", "empty", "broken"] {
            let node_id = match shard {
                "offline" => 1,
                "empty" => 2,
                _ => 3,
            };
            let rows =
                fetch_filter_categories(&client, &endpoint, DEFAULT_FACET, &request(node_id, shard))
                    .await;
            assert!(rows.is_empty(), "{shard} should yield no rows");
        }
    }

    /// Answers every URL with the same facet after a short pause and records
    /// how many requests were outstanding at once.
    #[derive(Default)]
    struct InFlightClient {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogClient for InFlightClient {
        async fn get_text(&self, _url: &str) -> Result<String> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(facet_body(&[(1, "row")]))
        }
    }

    #[tokio::test]
    async fn enrich_all_has_every_lookup_in_flight_at_once() {
        let endpoint = FilterEndpoint::default();
        let client = InFlightClient::default();
        let requests: Vec<EnrichmentRequest> =
            (1..=6).map(|node_id| request(node_id, "shard")).collect();

        let rows = enrich_all(&client, &endpoint, DEFAULT_FACET, &requests).await;

        assert_eq!(rows.len(), requests.len());
        assert_eq!(client.calls.load(Ordering::SeqCst), requests.len());
        assert_eq!(client.peak.load(Ordering::SeqCst), requests.len());
        assert_eq!(client.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn enrich_all_preserves_submission_order() {
        let endpoint = FilterEndpoint::default();
        let client = CannedClient::new()
            .serve(endpoint.url("slow", "cat=1"), &facet_body(&[(11, "slow")]), 40)
            .serve(endpoint.url("fast", "cat=2"), &facet_body(&[(22, "fast")]), 0)
            .serve(
                endpoint.url("medium", "cat=4"),
                &facet_body(&[(44, "m1"), (45, "m2")]),
                10,
            );

        let requests = vec![
            request(1, "slow"),
            request(2, "fast"),
            request(3, "missing"),
            request(4, "medium"),
        ];
        let rows = enrich_all(&client, &endpoint, DEFAULT_FACET, &requests).await;

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![11, 22, 44, 45]);
    }

    #[test]
    fn blocking_lookup_matches_async_contract() {
        let endpoint = FilterEndpoint::default();
        let client =
            CannedClient::new().serve(endpoint.url("s1", "cat=7"), &facet_body(&[(9, "X")]), 0);

        let rows =
            fetch_filter_categories_blocking(&client, &endpoint, DEFAULT_FACET, &request(7, "s1"));
        assert_eq!(rows, vec![CategoryRecord::from_filter(9, "X")]);

        let none =
            fetch_filter_categories_blocking(&client, &endpoint, DEFAULT_FACET, &request(8, "s1"));
        assert!(none.is_empty());
    }
}
