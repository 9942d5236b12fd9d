//! API Router with Swagger UI

use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::{ErrorResponse, PageResponse, PoleRecord};
use crate::api::handlers::health::HealthResponse;
use crate::api::handlers::{health, metrics, poles};
use crate::config::QueryConfig;
use crate::domain::PoleRepository;

/// Unified state for all routes. Axum extracts the specific handler
/// state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub repository: Arc<dyn PoleRepository>,
    pub query: QueryConfig,
    pub prometheus: PrometheusHandle,
}

impl FromRef<ApiState> for poles::PolesAppState {
    fn from_ref(s: &ApiState) -> Self {
        poles::PolesAppState {
            repository: Arc::clone(&s.repository),
            query: s.query.clone(),
        }
    }
}

impl FromRef<ApiState> for metrics::MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        metrics::MetricsState {
            handle: s.prometheus.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(poles::list_poles, health::health_check),
    components(schemas(PageResponse, PoleRecord, ErrorResponse, HealthResponse)),
    tags(
        (name = "Poles", description = "Bounding-box pole queries"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;

/// Build the API router. Everything the handlers need is injected
/// here; handlers never reach for ambient state.
pub fn create_api_router(
    repository: Arc<dyn PoleRepository>,
    query: QueryConfig,
    prometheus: PrometheusHandle,
) -> Router {
    let state = ApiState {
        repository,
        query,
        prometheus,
    };

    // The map frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/poles", get(poles::list_poles))
        .route("/metrics", get(metrics::prometheus_metrics))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::pole::{BoundingBox, PageRequest, Pole};
    use crate::domain::{DomainError, DomainResult};
    use crate::infrastructure::InMemoryPoleRepository;

    fn sample_pole(id: i64, lat: f64, lng: f64) -> Pole {
        Pole {
            id,
            municipality: "São Paulo".to_string(),
            neighborhood: "Pinheiros".to_string(),
            street: "Rua dos Postes".to_string(),
            material: "concreto".to_string(),
            height: 10.5,
            mechanical_tension: 600.0,
            latitude: lat,
            longitude: lng,
            companies: vec!["CPFL".to_string(), "Vivo".to_string()],
        }
    }

    fn seeded_repository(count: i64) -> Arc<InMemoryPoleRepository> {
        let repo = Arc::new(InMemoryPoleRepository::new());
        for i in 1..=count {
            // All inside bbox (-46.7,-23.3,-46.5,-23.1)
            repo.insert(sample_pole(i, -23.25, -46.62));
        }
        repo
    }

    fn test_router(repository: Arc<dyn PoleRepository>, query: QueryConfig) -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        create_api_router(repository, query, handle)
    }

    fn small_page_config() -> QueryConfig {
        QueryConfig {
            default_limit: 100,
            min_limit: 1,
            max_limit: 100,
            ..QueryConfig::default()
        }
    }

    async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn returns_page_with_total_and_cache_header() {
        let router = test_router(seeded_repository(5), QueryConfig::default());
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/poles?bbox=-46.7,-23.3,-46.5,-23.1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["cache-control"],
            "s-maxage=30, stale-while-revalidate=120"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["total"], 5);
        assert_eq!(body["page"], 1);
        assert_eq!(body["limit"], 5000);
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"][0]["companyCount"], 2);
    }

    #[tokio::test]
    async fn swapped_bounds_give_identical_results() {
        let router = test_router(seeded_repository(3), QueryConfig::default());
        let (_, ordered) = get_json(
            &router,
            "/api/poles?minLat=-23.3&maxLat=-23.1&minLng=-46.7&maxLng=-46.5",
        )
        .await;
        let (_, swapped) = get_json(
            &router,
            "/api/poles?minLat=-23.1&maxLat=-23.3&minLng=-46.5&maxLng=-46.7",
        )
        .await;
        assert_eq!(ordered, swapped);
        assert_eq!(ordered["total"], 3);
    }

    #[tokio::test]
    async fn pages_concatenate_without_overlap_or_gap() {
        let router = test_router(seeded_repository(250), small_page_config());

        let mut ids = Vec::new();
        for page in 1..=3 {
            let uri = format!(
                "/api/poles?bbox=-46.7,-23.3,-46.5,-23.1&page={}&limit=100",
                page
            );
            let (status, body) = get_json(&router, &uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["total"], 250);
            let batch: Vec<i64> = body["data"]
                .as_array()
                .unwrap()
                .iter()
                .map(|r| r["id"].as_i64().unwrap())
                .collect();
            assert!(batch.len() <= 100);
            ids.extend(batch);
        }

        let expected: Vec<i64> = (1..=250).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn limit_clamps_into_configured_range() {
        let router = test_router(seeded_repository(1), QueryConfig::default());
        let (_, body) = get_json(&router, "/api/poles?bbox=-46.7,-23.3,-46.5,-23.1&limit=1").await;
        assert_eq!(body["limit"], 100);

        let (_, body) =
            get_json(&router, "/api/poles?bbox=-46.7,-23.3,-46.5,-23.1&limit=1000000").await;
        assert_eq!(body["limit"], 20000);
    }

    #[tokio::test]
    async fn malformed_bounds_yield_invalid_bounds() {
        let router = test_router(seeded_repository(1), QueryConfig::default());

        let (status, body) = get_json(
            &router,
            "/api/poles?minLat=abc&maxLat=-23.1&minLng=-46.7&maxLng=-46.5",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid bounds");

        let (status, body) = get_json(&router, "/api/poles").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid bounds");
    }

    /// Counts store calls so guard tests can assert none happened.
    struct CountingRepository {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PoleRepository for CountingRepository {
        async fn count_in_bounds(&self, _bbox: &BoundingBox) -> DomainResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(0)
        }

        async fn find_page_in_bounds(
            &self,
            _bbox: &BoundingBox,
            _page: &PageRequest,
        ) -> DomainResult<Vec<Pole>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn oversized_bbox_is_rejected_before_any_store_call() {
        let repo = Arc::new(CountingRepository {
            calls: AtomicUsize::new(0),
        });
        let router = test_router(repo.clone(), QueryConfig::default());

        // 10 x 10 degrees, far above the 0.30 default
        let (status, body) = get_json(&router, "/api/poles?bbox=-50,-30,-40,-20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "area too large");
        assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
    }

    struct FailingRepository {
        error: fn() -> DomainError,
    }

    #[async_trait]
    impl PoleRepository for FailingRepository {
        async fn count_in_bounds(&self, _bbox: &BoundingBox) -> DomainResult<u64> {
            Err((self.error)())
        }

        async fn find_page_in_bounds(
            &self,
            _bbox: &BoundingBox,
            _page: &PageRequest,
        ) -> DomainResult<Vec<Pole>> {
            Err((self.error)())
        }
    }

    #[tokio::test]
    async fn timeout_maps_to_504() {
        let repo = Arc::new(FailingRepository {
            error: || DomainError::QueryTimeout,
        });
        let router = test_router(repo, QueryConfig::default());
        let (status, body) = get_json(&router, "/api/poles?bbox=-46.7,-23.3,-46.5,-23.1").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"], "query timed out");
    }

    #[tokio::test]
    async fn store_failure_maps_to_500_without_detail() {
        let repo = Arc::new(FailingRepository {
            error: || DomainError::Database("secret connection string".to_string()),
        });
        let router = test_router(repo, QueryConfig::default());
        let (status, body) = get_json(&router, "/api/poles?bbox=-46.7,-23.3,-46.5,-23.1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal error");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let router = test_router(seeded_repository(0), QueryConfig::default());
        let (status, body) = get_json(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
