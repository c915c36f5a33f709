use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderValue, Method},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{
    config::Config,
    error::AppError,
    models::SummaryPayload,
    services::csv::{build_summary, load_table},
    AppState,
};

pub fn routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload-csv/", post(upload_csv))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(config))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unparseable origin {:?}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

#[axum::debug_handler]
async fn upload_csv(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SummaryPayload>, AppError> {
    let start = std::time::Instant::now();

    let mut file_data: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(e.to_string()))?
    {
        if field.name() == Some("csv_file") {
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidUpload(e.to_string()))?,
            );
            break;
        }
    }
    let file_data = file_data.ok_or(AppError::MissingFile)?;

    tracing::info!("Received csv_file upload, size: {}KB", file_data.len() / 1024);

    let table = load_table(&file_data)?;
    tracing::info!(
        "Parsed {} rows x {} columns in {:?}",
        table.row_count(),
        table.columns.len(),
        start.elapsed()
    );

    let payload = build_summary(&table, state.config.column_dupes);
    tracing::info!("Summary built in {:?}", start.elapsed());

    Ok(Json(payload))
}

#[cfg(test)]
pub mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    const BOUNDARY: &str = "----dashboard-test-boundary";

    fn test_config() -> Config {
        Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            allowed_origins: vec!["*".to_string()],
            max_upload_bytes: 1024 * 1024,
            column_dupes: true,
        }
    }

    pub fn test_app() -> Router {
        app_with_config(test_config())
    }

    fn app_with_config(config: Config) -> Router {
        Router::new()
            .merge(crate::routes::routes(&config))
            .with_state(Arc::new(AppState::new(config)))
    }

    fn multipart_body(field_name: &str, content: &str) -> Body {
        Body::from(format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field_name}\"; filename=\"data.csv\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        ))
    }

    fn upload_request(field_name: &str, content: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload-csv/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart_body(field_name, content))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upload_returns_summary_payload() {
        let response = test_app()
            .oneshot(upload_request("csv_file", "a,b\n1,2\n1,2\n,4\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;

        assert_eq!(body["columns"], serde_json::json!(["a", "b"]));
        assert_eq!(body["rows"], 3);
        assert_eq!(body["nulos"]["values"], serde_json::json!([1, 0]));
        assert_eq!(body["dupes"]["unique"], 2);
        assert_eq!(body["dupes"]["duplicates"], 1);
        assert_eq!(body["otras"]["labels"], serde_json::json!(["Únicas", "Duplicadas"]));
        assert_eq!(body["otras"]["values"], serde_json::json!([2, 1]));

        let mean_b = body["statsTable"]["values"][1][1].as_f64().unwrap();
        assert!((mean_b - 8.0 / 3.0).abs() < 1e-9);

        // column_dupes is on in the test config
        assert_eq!(body["dupes_by_column"]["counts"], serde_json::json!([2, 2]));
    }

    #[tokio::test]
    async fn missing_field_returns_400_with_fixed_detail() {
        let response = test_app()
            .oneshot(upload_request("other_file", "a,b\n1,2\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["detail"], "Falta el archivo 'csv_file'.");
    }

    #[tokio::test]
    async fn unparseable_csv_returns_400() {
        let response = test_app()
            .oneshot(upload_request("csv_file", "a,b\n1\n1,2,3\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["detail"].as_str().unwrap().contains("CSV"));
    }

    #[tokio::test]
    async fn column_dupes_flag_controls_payload_shape() {
        let config = Config {
            column_dupes: false,
            ..test_config()
        };
        let response = app_with_config(config)
            .oneshot(upload_request("csv_file", "a,b\n1,2\n"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body.get("dupes_by_column").is_none());
    }
}
