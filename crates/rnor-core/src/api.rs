//! Wire contract and client for the remote calculation service.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::classifier::{classify, classify_with, Residency, Weighted, YearResult};
use crate::date::CalendarDate;

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to calculate RNOR status. Please check if the backend server is running.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub departure: String,
    #[serde(rename = "return")]
    pub return_date: String,
    pub avg_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctc: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive_income: Option<u64>,
}

impl CalculationRequest {
    pub fn new(departure: CalendarDate, return_date: CalendarDate, avg_days: u32) -> Self {
        Self {
            departure: departure.to_iso_string(),
            return_date: return_date.to_iso_string(),
            avg_days,
            ctc: None,
            passive_income: None,
        }
    }

    pub fn with_extras(mut self, ctc: Option<u64>, passive_income: Option<u64>) -> Self {
        self.ctc = ctc;
        self.passive_income = passive_income;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FyEntry {
    pub fy: String,
    pub status: Residency,
}

impl From<FyEntry> for YearResult {
    fn from(entry: FyEntry) -> Self {
        YearResult {
            financial_year: entry.fy,
            status: entry.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub status: String,
    #[serde(default)]
    pub output: Vec<FyEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsResponse {
    pub sheets: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned HTTP {status}")]
    Status { status: u16, message: Option<String> },
    #[error("backend calculation failed")]
    Rejected { message: Option<String> },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Text for the error banner: the server's own `message` when it sent one.
    pub fn user_message(&self) -> String {
        let message = match self {
            ApiError::Status { message, .. } | ApiError::Rejected { message } => message.as_deref(),
            _ => None,
        };
        match message.map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Anything that can turn a request into per-year results.
pub trait CalculationService {
    fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> impl Future<Output = Result<Vec<YearResult>, ApiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rnor/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn list_sheets(&self) -> Result<Vec<String>, ApiError> {
        let response = self.http.get(self.endpoint("sheets")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        let parsed: SheetsResponse = serde_json::from_str(&body)?;
        Ok(parsed.sheets)
    }

    async fn post_calculation(&self, request: &CalculationRequest) -> Result<Vec<YearResult>, ApiError> {
        let url = self.endpoint("calculate");
        debug!(
            %url,
            departure = %request.departure,
            return_date = %request.return_date,
            avg_days = request.avg_days,
            "sending calculation request"
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let err = status_error(status, &body);
            warn!(%status, "calculation request failed");
            return Err(err);
        }

        let parsed: CalculationResponse = serde_json::from_str(&body)?;
        if parsed.status != "success" {
            warn!(status = %parsed.status, "backend rejected calculation");
            return Err(ApiError::Rejected {
                message: parsed.message,
            });
        }

        debug!(years = parsed.output.len(), "received calculation results");
        Ok(parsed.output.into_iter().map(YearResult::from).collect())
    }
}

fn status_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message);
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

impl CalculationService for ApiClient {
    async fn calculate(&self, request: &CalculationRequest) -> Result<Vec<YearResult>, ApiError> {
        self.post_calculation(request).await
    }
}

/// Offline stand-in that runs the local classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClassifier;

impl LocalClassifier {
    pub fn run(&self, request: &CalculationRequest) -> Result<Vec<YearResult>, ApiError> {
        let departure = parse_iso(&request.departure)?;
        let return_date = parse_iso(&request.return_date)?;
        Ok(classify(departure, return_date, request.avg_days))
    }
}

fn parse_iso(text: &str) -> Result<CalendarDate, ApiError> {
    chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(CalendarDate::from)
        .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", text, e)))
}

impl CalculationService for LocalClassifier {
    async fn calculate(&self, request: &CalculationRequest) -> Result<Vec<YearResult>, ApiError> {
        self.run(request)
    }
}

/// Local classifier using the weighted random overrides, reproducible per seed.
#[derive(Debug, Clone, Copy)]
pub struct SeededClassifier {
    seed: u64,
}

impl SeededClassifier {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn run(&self, request: &CalculationRequest) -> Result<Vec<YearResult>, ApiError> {
        let departure = parse_iso(&request.departure)?;
        let return_date = parse_iso(&request.return_date)?;
        let mut policy = Weighted::new(StdRng::seed_from_u64(self.seed));
        Ok(classify_with(departure, return_date, request.avg_days, &mut policy))
    }
}

impl CalculationService for SeededClassifier {
    async fn calculate(&self, request: &CalculationRequest) -> Result<Vec<YearResult>, ApiError> {
        self.run(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn spawn_stub(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind to random port");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        format!("http://{}", addr)
    }

    fn request() -> CalculationRequest {
        CalculationRequest::new(
            CalendarDate::from_ymd(2021, 4, 1).unwrap(),
            CalendarDate::from_ymd(2022, 4, 1).unwrap(),
            50,
        )
    }

    #[test]
    fn test_request_wire_shape() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(
            value,
            json!({ "departure": "2021-04-01", "return": "2022-04-01", "avg_days": 50 })
        );

        let extended = serde_json::to_value(request().with_extras(Some(1_000_000), Some(0))).unwrap();
        assert_eq!(extended["ctc"], 1_000_000);
        assert_eq!(extended["passive_income"], 0);
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Rejected {
            message: Some("Sheet is locked".into()),
        };
        assert_eq!(err.user_message(), "Sheet is locked");

        let err = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = ApiError::Rejected {
            message: Some("   ".into()),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_calculate_success() {
        let app = Router::new().route(
            "/calculate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["departure"], "2021-04-01");
                assert_eq!(body["return"], "2022-04-01");
                assert_eq!(body["avg_days"], 50);
                Json(json!({
                    "status": "success",
                    "output": [
                        { "fy": "FY 2021-22", "status": "NR" },
                        { "fy": "FY 2022-23", "status": "RNOR" }
                    ]
                }))
            }),
        );
        let base = spawn_stub(app).await;

        let client = ApiClient::new(format!("{}/", base));
        let results = client.calculate(&request()).await.unwrap();
        assert_eq!(
            results,
            vec![
                YearResult {
                    financial_year: "FY 2021-22".into(),
                    status: Residency::Nr
                },
                YearResult {
                    financial_year: "FY 2022-23".into(),
                    status: Residency::Rnor
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_calculate_rejected_by_backend() {
        let app = Router::new().route(
            "/calculate",
            post(|| async { Json(json!({ "status": "error", "message": "Dates out of range" })) }),
        );
        let base = spawn_stub(app).await;

        let err = ApiClient::new(base).calculate(&request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { .. }));
        assert_eq!(err.user_message(), "Dates out of range");
    }

    #[tokio::test]
    async fn test_calculate_http_error() {
        let app = Router::new().route(
            "/calculate",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Worker crashed" })),
                )
            }),
        );
        let base = spawn_stub(app).await;

        let err = ApiClient::new(base).calculate(&request()).await.unwrap_err();
        match &err {
            ApiError::Status { status, .. } => assert_eq!(*status, 500),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), "Worker crashed");
    }

    #[tokio::test]
    async fn test_calculate_unknown_status_is_decode_error() {
        let app = Router::new().route(
            "/calculate",
            post(|| async {
                Json(json!({ "status": "success", "output": [{ "fy": "FY 2021-22", "status": "XYZ" }] }))
            }),
        );
        let base = spawn_stub(app).await;

        let err = ApiClient::new(base).calculate(&request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_network_failure() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = ApiClient::new(format!("http://{}", addr))
            .calculate(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_list_sheets() {
        let app = Router::new().route(
            "/sheets",
            get(|| async { Json(json!({ "sheets": ["Sheet1", "Audit"] })) }),
        );
        let base = spawn_stub(app).await;

        let sheets = ApiClient::new(base).list_sheets().await.unwrap();
        assert_eq!(sheets, vec!["Sheet1".to_string(), "Audit".to_string()]);
    }

    #[tokio::test]
    async fn test_local_classifier_service() {
        let results = LocalClassifier.calculate(&request()).await.unwrap();
        assert_eq!(results[0].financial_year, "FY 2021-22");
        assert_eq!(results[0].status, Residency::Ror);

        let mut bad = request();
        bad.departure = "01/04/2021".into();
        let err = LocalClassifier.calculate(&bad).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_seeded_classifier_is_reproducible() {
        let first = SeededClassifier::new(42).calculate(&request()).await.unwrap();
        let second = SeededClassifier::new(42).calculate(&request()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].status, Residency::Ror);
        assert_eq!(first.len(), LocalClassifier.run(&request()).unwrap().len());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("https://example.test///");
        assert_eq!(client.base_url(), "https://example.test");
        assert_eq!(client.endpoint("calculate"), "https://example.test/calculate");
    }
}
