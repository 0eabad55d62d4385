//! REST API for the box advisor.
//!
//! Thin JSON wrapper around the recommendation engine. Uses Axum as the web
//! framework and supports CORS.

use std::sync::{Arc, OnceLock};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

use crate::config::ApiConfig;
use crate::engine::{EngineConfig, Recommendation, Recommender, StrategyPreferences, Weights};
use crate::model::{PackingLevel, ShippingBox, ValidationError};
use crate::policy::{Feasibility, PackingRule, PackingRules};
use crate::strategies::{StrategyDetail, StrategyKind};
use crate::types::Dims3;

#[derive(Clone)]
struct ApiState {
    recommender: Arc<Recommender>,
    inventory: Arc<Vec<ShippingBox>>,
    rules: Arc<PackingRules>,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// Swagger UI assets pinned to swagger-ui-dist 5.17.14, each with an integrity hash.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>box-advisor API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Request structure for the recommendation endpoint.
#[derive(Deserialize, Clone, ToSchema)]
#[schema(example = json!({ "item": [18.0, 13.0, 8.0], "level": "standard" }))]
pub struct RecommendRequest {
    /// Item dimensions in inches, any order.
    #[schema(value_type = [f64; 3], example = json!([18.0, 13.0, 8.0]))]
    pub item: [f64; 3],
    /// One of `basic`/`no_pack`, `standard`, `fragile`, `custom`.
    pub level: String,
}

#[derive(Debug)]
struct ValidatedRecommendRequest {
    item: Dims3,
    level: PackingLevel,
}

impl RecommendRequest {
    fn into_validated(self) -> Result<ValidatedRecommendRequest, ValidationError> {
        let level = self.level.parse::<PackingLevel>()?;
        let item = Dims3(self.item);
        if !item.is_valid_dimension() {
            return Err(ValidationError::InvalidDimension(format!(
                "item dimensions must be positive, got {:?}",
                self.item
            )));
        }
        Ok(ValidatedRecommendRequest { item, level })
    }
}

/// Response with the ranked recommendations.
#[derive(Serialize, ToSchema)]
pub struct RecommendResponse {
    pub level: PackingLevel,
    pub recommendations: Vec<RecommendationView>,
}

/// One ranked recommendation as returned over HTTP.
#[derive(Serialize, ToSchema)]
pub struct RecommendationView {
    /// 1-based rank.
    pub rank: usize,
    pub box_id: String,
    pub strategy: StrategyKind,
    pub price: f64,
    pub feasibility: Feasibility,
    pub tightness_score: f64,
    #[schema(value_type = [f64; 3], example = json!([20.0, 15.0, 10.0]))]
    pub effective_dims: [f64; 3],
    pub clearances: Vec<f64>,
    pub note: String,
    pub tag: String,
    pub tag_class: String,
    pub reason: String,
    pub composite_score: f64,
    pub normalized_price: f64,
    pub normalized_tightness: f64,
    pub strategy_penalty: f64,
    pub reasonably_efficient: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_scored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_degrees: Option<f64>,
}

impl RecommendationView {
    fn from_recommendation(rank: usize, rec: Recommendation) -> Self {
        let (cut_depth, pre_scored, box_count, rotation_degrees) = match rec.result.detail {
            StrategyDetail::CutDown {
                cut_depth,
                pre_scored,
            } => (Some(cut_depth), Some(pre_scored), None, None),
            StrategyDetail::Telescoping { box_count } => (None, None, Some(box_count), None),
            StrategyDetail::Diagonal { rotation_degrees } => {
                (None, None, None, Some(rotation_degrees))
            }
            StrategyDetail::Normal | StrategyDetail::Flattened => (None, None, None, None),
        };

        Self {
            rank,
            strategy: rec.strategy(),
            box_id: rec.box_id,
            price: rec.result.price,
            feasibility: rec.result.feasibility,
            tightness_score: rec.result.tightness_score,
            effective_dims: rec.result.effective_dims.as_array(),
            clearances: rec.result.clearances,
            note: rec.result.note,
            tag: rec.tag,
            tag_class: rec.tag_class.to_string(),
            reason: rec.reason,
            composite_score: rec.composite_score,
            normalized_price: rec.normalized_price,
            normalized_tightness: rec.normalized_tightness,
            strategy_penalty: rec.strategy_penalty,
            reasonably_efficient: rec.reasonably_efficient,
            cut_depth,
            pre_scored,
            box_count,
            rotation_degrees,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid input data",
        details,
    )
}

fn parse_recommend_request(
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<ValidatedRecommendRequest, Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    payload
        .into_validated()
        .map_err(|err| validation_error(err.to_string()))
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_recommend, handle_packing_rules, handle_engine_config),
    components(
        schemas(
            RecommendRequest,
            RecommendResponse,
            RecommendationView,
            ErrorResponse,
            PackingLevel,
            PackingRule,
            Feasibility,
            StrategyKind,
            EngineConfig,
            Weights,
            StrategyPreferences
        )
    ),
    tags((name = "recommendation", description = "Box and packing strategy recommendations"))
)]
struct ApiDoc;

fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recommend", post(handle_recommend))
        .route("/packing-rules", get(handle_packing_rules))
        .route("/engine-config", get(handle_engine_config))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
///
/// Blocks until the server is terminated.
pub async fn start_api_server(
    config: ApiConfig,
    recommender: Recommender,
    inventory: Vec<ShippingBox>,
    rules: PackingRules,
) -> std::io::Result<()> {
    let state = ApiState {
        recommender: Arc::new(recommender),
        inventory: Arc::new(inventory),
        rules: Arc::new(rules),
    };
    let app = router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await.inspect_err(|err| {
        error!(%addr, error = %err, "could not bind API server");
    })?;

    info!(
        "server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        info!("local access: http://localhost:{}", config.port());
    }
    info!("endpoints: POST /recommend, GET /packing-rules, GET /engine-config, GET /docs");

    axum::serve(listener, app).await
}

/// Handler for POST /recommend.
///
/// Ranks every feasible way to pack the item with the store's boxes.
#[utoipa::path(
    post,
    path = "/recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Ranked recommendations", body = RecommendResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid item or packing level",
            body = ErrorResponse
        )
    ),
    tag = "recommendation"
)]
async fn handle_recommend(
    State(state): State<ApiState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_recommend_request(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(item = %request.item.label(), level = %request.level, "recommendation request");
    let recommendations = state
        .recommender
        .compute(&state.inventory, &request.item, request.level);
    info!(count = recommendations.len(), "recommendations computed");

    let response = RecommendResponse {
        level: request.level,
        recommendations: recommendations
            .into_iter()
            .enumerate()
            .map(|(i, rec)| RecommendationView::from_recommendation(i + 1, rec))
            .collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Handler for GET /packing-rules: effective rules from NoPack to Custom.
#[utoipa::path(
    get,
    path = "/packing-rules",
    responses((status = 200, description = "Effective packing rules", body = [PackingRule])),
    tag = "recommendation"
)]
async fn handle_packing_rules(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.rules.effective())
}

/// Handler for GET /engine-config.
#[utoipa::path(
    get,
    path = "/engine-config",
    responses((status = 200, description = "Active engine configuration", body = EngineConfig)),
    tag = "recommendation"
)]
async fn handle_engine_config(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.recommender.config().clone())
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
