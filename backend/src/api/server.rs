//! HTTP server for the performance dashboard.
//!
//! Every request refetches and regroups the source table; nothing is cached
//! between requests.
//!
//! # API Endpoints
//!
//! | Method | Path        | Description                                  |
//! |--------|-------------|----------------------------------------------|
//! | GET    | `/health`   | Health check                                 |
//! | GET    | `/summary`  | Records grouped by date                      |
//! | POST   | `/analyze`  | Answer a question about one date             |
//! | GET    | `/api/logs` | SSE stream of pipeline logs                  |

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::{AllowOrigin, CorsLayer};
use uuid::Uuid;

use super::logs::{log_error, log_info, log_success, log_warning, LOG_BROADCASTER};
use super::types::{AnalyzeRequest, AnswerResponse};
use crate::ai::{format_records_block, system_prompt, user_prompt, AiClient, AnswerGenerator};
use crate::catalog::OutletCatalog;
use crate::config::ServerConfig;
use crate::error::{AiError, ConfigError, ServerError};
use crate::source::TableSource;
use crate::transform::pipeline::{summarize_source, SummaryReport};
use crate::transform::sanitize::{sanitized, Shape};

/// Shared, read-only state of the server.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<TableSource>,
    pub catalog: Arc<OutletCatalog>,
    /// `None` when no API key is configured; `/analyze` then fails with 500.
    pub generator: Option<Arc<dyn AnswerGenerator>>,
}

impl AppState {
    pub fn new(source: TableSource, catalog: Arc<OutletCatalog>) -> Self {
        Self {
            source: Arc::new(source),
            catalog,
            generator: None,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }
}

/// CORS layer for the dashboard origin (`*` allows any origin).
fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = if allowed_origin == "*" {
        AllowOrigin::any()
    } else {
        let value = allowed_origin
            .parse::<HeaderValue>()
            .map_err(|_| ConfigError::InvalidValue {
                name: "ALLOWED_ORIGIN",
                value: allowed_origin.to_string(),
            })?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Build the application router.
pub fn router(state: AppState, allowed_origin: &str) -> Result<Router, ConfigError> {
    Ok(Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/summary", get(summary))
        .route("/analyze", post(analyze))
        .route("/api/logs", get(sse_logs))
        .layer(cors_layer(allowed_origin)?)
        .with_state(state))
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = AppState::new(config.source.clone(), Arc::clone(&config.catalog));
    match AiClient::from_env() {
        Ok(client) => state = state.with_generator(Arc::new(client)),
        Err(e) => log_warning(format!("Question answering disabled: {}", e)),
    }

    let app = router(state, &config.allowed_origin)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚀 Lighthouse server running on http://localhost:{}", config.port);
    println!("   GET  /summary   - Records grouped by date");
    println!("   POST /analyze   - Ask about one date");
    println!("   GET  /api/logs  - SSE log stream");
    println!("   GET  /health    - Health check");
    println!();
    println!("📄 Source: {}", config.source);
    println!("📋 Outlets: {}", config.catalog.len());
    println!("🌐 Allowed origin: {}", config.allowed_origin);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "lighthouse",
        "version": env!("CARGO_PKG_VERSION"),
        "outlets": state.catalog.len(),
        "analyze": state.generator.is_some(),
        "endpoints": {
            "summary": "GET /summary",
            "analyze": "POST /analyze",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Fetch and group the source table for one request.
async fn run_summary(state: &AppState, request_id: Uuid) -> Result<SummaryReport, ServerError> {
    summarize_source(&state.source, &state.catalog)
        .await
        .map_err(|e| {
            log_error(format!("[{}] Summary failed: {}", request_id, e));
            ServerError::from(e)
        })
}

/// Query operation: every date with its outlet records.
async fn summary(State(state): State<AppState>) -> Result<Json<Shape>, ServerError> {
    let request_id = Uuid::new_v4();
    log_info(format!("📊 GET /summary [{}]", request_id));

    let report = run_summary(&state, request_id).await?;
    log_success(format!(
        "[{}] {} dates, {} records",
        request_id,
        report.groups.len(),
        report.record_count
    ));

    Ok(Json(sanitized(&report.groups)))
}

/// Question operation: answer about one date's records.
async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ServerError> {
    let request_id = Uuid::new_v4();
    log_info(format!("💬 POST /analyze [{}]", request_id));

    let Json(request) =
        payload.map_err(|_| ServerError::BadRequest("Missing JSON in request".to_string()))?;
    let (date, question) = request.validate()?;

    let report = run_summary(&state, request_id).await?;
    let records = report.groups.get(&date).ok_or_else(|| {
        log_warning(format!("[{}] No data for date {}", request_id, date));
        ServerError::DateNotFound(date.clone())
    })?;

    let generator = state
        .generator
        .as_ref()
        .ok_or_else(|| AiError::MissingApiKey("ANTHROPIC_API_KEY not set".to_string()))?;

    let block = format_records_block(records);
    let prompt = user_prompt(&date, &question, &block);
    let answer = generator.generate(&system_prompt(), &prompt).await.map_err(|e| {
        log_error(format!("[{}] Generation failed: {}", request_id, e));
        ServerError::from(e)
    })?;

    log_success(format!("[{}] Answered for {} ({} records)", request_id, date, records.len()));
    Ok(Json(AnswerResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AiResult;
    use axum::http::StatusCode;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SHEET: &str = "\
Date1,Type1,Heraldo,Score,CLS,LCP,SI,TBT,FCP,Date2,Type2,As,Score,CLS,LCP,SI,TBT,FCP
2024-01-01,Mobile,https://x,90,0.01,1.2,2.0,50,0.9,,Mobile,https://a,70,,,,,
2024-01-02,Desktop,https://x,95,,,,,,2024-01-02,Desktop,https://a,71,,,,,
";

    /// Answers with the prompt it received.
    struct EchoGenerator;

    impl AnswerGenerator for EchoGenerator {
        fn generate<'a>(&'a self, _system: &'a str, prompt: &'a str) -> BoxFuture<'a, AiResult<String>> {
            async move { Ok(prompt.to_string()) }.boxed()
        }
    }

    struct FailingGenerator;

    impl AnswerGenerator for FailingGenerator {
        fn generate<'a>(&'a self, _system: &'a str, _prompt: &'a str) -> BoxFuture<'a, AiResult<String>> {
            async move { Err(AiError::ApiError("overloaded".to_string())) }.boxed()
        }
    }

    fn sheet_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SHEET).unwrap();
        file
    }

    fn state(file: &NamedTempFile) -> AppState {
        AppState::new(
            TableSource::File(file.path().to_path_buf()),
            OutletCatalog::shared_default(),
        )
    }

    fn ask(date: &str, question: &str) -> Result<Json<AnalyzeRequest>, JsonRejection> {
        Ok(Json(AnalyzeRequest {
            date: Some(date.to_string()),
            question: Some(question.to_string()),
        }))
    }

    #[tokio::test]
    async fn test_summary_groups_by_date() {
        let file = sheet_file();
        let Json(shape) = summary(State(state(&file))).await.unwrap();

        let value = serde_json::to_value(&shape).unwrap();
        let first_day = value["2024-01-01"].as_array().unwrap();
        assert_eq!(first_day.len(), 1);
        assert_eq!(first_day[0]["Outlet"], "Heraldo");
        assert_eq!(value["2024-01-02"][1]["Outlet"], "As");
        assert!(value["2024-01-02"][0]["CLS"].is_null());
    }

    #[tokio::test]
    async fn test_summary_source_failure_is_500() {
        let state = AppState::new(
            TableSource::File("/nonexistent/sheet.csv".into()),
            OutletCatalog::shared_default(),
        );
        let err = summary(State(state)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Server error:"));
    }

    #[tokio::test]
    async fn test_analyze_answers_with_date_block() {
        let file = sheet_file();
        let state = state(&file).with_generator(Arc::new(EchoGenerator));

        let Json(response) = analyze(State(state), ask("2024-01-02", "Who is faster?"))
            .await
            .unwrap();

        assert!(response.answer.contains("📊 Heraldo (Desktop)"));
        assert!(response.answer.contains("📊 As (Desktop)"));
        assert!(response.answer.ends_with("Question: Who is faster?"));
    }

    #[tokio::test]
    async fn test_analyze_unknown_date_is_not_found() {
        let file = sheet_file();
        let state = state(&file).with_generator(Arc::new(EchoGenerator));

        let err = analyze(State(state), ask("2030-01-01", "?")).await.unwrap_err();
        assert!(matches!(err, ServerError::DateNotFound(ref d) if d == "2030-01-01"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analyze_numeric_date_is_not_found() {
        let file = sheet_file();
        let state = state(&file).with_generator(Arc::new(EchoGenerator));
        let request: AnalyzeRequest =
            serde_json::from_value(json!({ "date": 20240101, "question": "q" })).unwrap();

        let err = analyze(State(state), Ok(Json(request))).await.unwrap_err();
        assert!(matches!(err, ServerError::DateNotFound(ref d) if d == "20240101"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analyze_missing_question_is_bad_request() {
        let file = sheet_file();
        let err = analyze(State(state(&file)), ask("2024-01-01", " "))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing date or question");
    }

    #[tokio::test]
    async fn test_analyze_without_generator_is_500() {
        let file = sheet_file();
        let err = analyze(State(state(&file)), ask("2024-01-01", "?"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Ai(AiError::MissingApiKey(_))));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_analyze_generation_failure_is_500() {
        let file = sheet_file();
        let state = state(&file).with_generator(Arc::new(FailingGenerator));
        let err = analyze(State(state), ask("2024-01-01", "?")).await.unwrap_err();
        assert_eq!(err.to_string(), "Server error: API error: overloaded");
    }

    #[test]
    fn test_router_origin_validation() {
        let file = sheet_file();
        assert!(router(state(&file), "http://localhost:3000").is_ok());
        assert!(router(state(&file), "*").is_ok());
        assert!(matches!(
            router(state(&file), "bad\norigin"),
            Err(ConfigError::InvalidValue { name: "ALLOWED_ORIGIN", .. })
        ));
    }
}
