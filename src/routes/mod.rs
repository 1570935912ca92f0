pub mod health;
pub mod location;
pub mod pages;
pub mod predict;
pub mod predictions;
pub mod pv_config;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// All application routes, without docs, static files or middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/predict", post(predict::predict))
        .route(
            "/location",
            get(location::show_location).post(location::submit_location),
        )
        .route("/api/v1/coordinates", get(location::get_coordinates))
        .route("/submit_pv", post(pv_config::submit_pv))
        .route("/check_pv_config", get(pv_config::check_pv_config))
        .route("/energy_data", get(predictions::get_energy_data))
        .route("/results", get(predictions::show_results))
        .route(
            "/data/HourOrderAndEstimated.csv",
            get(predictions::download_predictions_csv),
        )
        .route(
            "/data/solar_radiation_data.csv",
            get(predictions::download_irradiance_csv),
        )
        .route("/api/v1/health", get(health::health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::prediction_file::write_predictions;
    use crate::state::test_support::state_in;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Any upstream URL that is never contacted.
    const UNUSED_UPSTREAM: &str = "http://127.0.0.1:9";

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        serde_json::from_str(&body_string(resp).await).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn energy_data_missing_file_is_structured_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), UNUSED_UPSTREAM));

        let resp = app.oneshot(get_request("/energy_data")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn energy_data_lists_rows_in_hour_order() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), UNUSED_UPSTREAM);
        write_predictions(&state.predictions_csv, &[1.0, 2.5, 0.5]).unwrap();

        let resp = router(state)
            .oneshot(get_request("/energy_data"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            serde_json::json!([
                { "Hour": 1, "Estimated_Energy": 1.0 },
                { "Hour": 2, "Estimated_Energy": 2.5 },
                { "Hour": 3, "Estimated_Energy": 0.5 },
            ])
        );
    }

    #[tokio::test]
    async fn results_page_shows_total() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), UNUSED_UPSTREAM);
        write_predictions(&state.predictions_csv, &[1.0, 2.5, 0.5]).unwrap();

        let resp = router(state).oneshot(get_request("/results")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_string(resp).await;
        assert!(html.contains(">4.00</th>"));
        assert!(html.contains("<tr><td>3</td><td>0.5</td></tr>"));
    }

    #[tokio::test]
    async fn results_page_missing_file_renders_error_view() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), UNUSED_UPSTREAM));

        let resp = app.oneshot(get_request("/results")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
        assert!(body_string(resp).await.contains("Something went wrong"));
    }

    #[tokio::test]
    async fn csv_download_self_heals_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), UNUSED_UPSTREAM);
        let app = router(state.clone());

        let first = app
            .clone()
            .oneshot(get_request("/data/HourOrderAndEstimated.csv"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers()[header::CONTENT_TYPE], "text/csv");
        let first = body_string(first).await;

        let second = app
            .oneshot(get_request("/data/HourOrderAndEstimated.csv"))
            .await
            .unwrap();
        let second = body_string(second).await;

        assert_eq!(first, "Hour,Estimated Energy\n");
        assert_eq!(first, second);
        assert!(state.predictions_csv.exists());
    }

    #[tokio::test]
    async fn irradiance_csv_download_self_heals() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), UNUSED_UPSTREAM));

        let resp = app
            .oneshot(get_request("/data/solar_radiation_data.csv"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "timestamp,solar_radiation\n");
    }

    #[tokio::test]
    async fn pv_config_submit_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), UNUSED_UPSTREAM));

        let before = app
            .clone()
            .oneshot(get_request("/check_pv_config"))
            .await
            .unwrap();
        assert_eq!(body_json(before).await, serde_json::json!({ "exists": false }));

        let resp = app
            .clone()
            .oneshot(json_request(
                "/submit_pv",
                serde_json::json!({ "area": 1.6, "panel_efficiency": "18", "inverter_efficiency": 96 }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let after = app.oneshot(get_request("/check_pv_config")).await.unwrap();
        assert_eq!(body_json(after).await, serde_json::json!({ "exists": true }));

        let saved = std::fs::read_to_string(dir.path().join("pv_config.txt")).unwrap();
        assert_eq!(
            saved,
            "Panel Area: 1.6\nPanel Efficiency: 18\nInverter Efficiency: 96\n"
        );
    }

    #[tokio::test]
    async fn pv_config_missing_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), UNUSED_UPSTREAM));

        let resp = app
            .oneshot(json_request(
                "/submit_pv",
                serde_json::json!({ "area": 1.6, "panel_efficiency": 18 }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("pv_config.txt").exists());
    }

    #[tokio::test]
    async fn location_form_saves_valid_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), UNUSED_UPSTREAM));

        let resp = app
            .clone()
            .oneshot(form_request("/location", "latitude=13.75&longitude=100.5"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp)
            .await
            .contains("Coordinates saved successfully!"));

        let page = app.clone().oneshot(get_request("/location")).await.unwrap();
        let html = body_string(page).await;
        assert!(html.contains("value=\"13.75\""));
        assert!(html.contains("value=\"100.5\""));

        let json = app
            .oneshot(get_request("/api/v1/coordinates"))
            .await
            .unwrap();
        assert_eq!(
            body_json(json).await,
            serde_json::json!({ "status": "found", "latitude": "13.75", "longitude": "100.5" })
        );
    }

    #[tokio::test]
    async fn location_form_rejects_out_of_range_without_write() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(dir.path(), UNUSED_UPSTREAM);
        let app = router(state.clone());

        let resp = app
            .clone()
            .oneshot(form_request("/location", "latitude=91&longitude=0"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(resp).await.contains("between -90 to 90"));

        let resp = app
            .oneshot(form_request("/location", "latitude=&longitude=0"))
            .await
            .unwrap();
        assert!(body_string(resp)
            .await
            .contains("Please enter both latitude and longitude."));

        assert!(!dir.path().join("coords.txt").exists());
    }

    #[tokio::test]
    async fn coordinates_absent_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), UNUSED_UPSTREAM));

        let resp = app
            .clone()
            .oneshot(get_request("/api/v1/coordinates"))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await, serde_json::json!({ "status": "absent" }));

        std::fs::write(dir.path().join("coords.txt"), "not a record").unwrap();
        let resp = app
            .clone()
            .oneshot(get_request("/api/v1/coordinates"))
            .await
            .unwrap();
        assert_eq!(
            body_json(resp).await,
            serde_json::json!({ "status": "malformed" })
        );

        let page = app.oneshot(get_request("/location")).await.unwrap();
        assert_eq!(page.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn predict_rejects_non_numeric_before_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), UNUSED_UPSTREAM));

        let resp = app
            .oneshot(json_request(
                "/predict",
                serde_json::json!({
                    "latitude": "north",
                    "longitude": 100.5,
                    "start_datetime": "2025-06-01T00:00",
                    "end_datetime": "2025-06-01T03:00",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("coords.txt").exists());
    }

    #[tokio::test]
    async fn predict_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hourly": {
                    "time": ["2025-06-01T00:00", "2025-06-01T01:00", "2025-06-01T02:00"],
                    "shortwave_radiation": [0.0, 250.0, 750.0]
                }
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), &server.uri()));

        let resp = app
            .clone()
            .oneshot(json_request(
                "/submit_pv",
                serde_json::json!({ "area": 2, "panel_efficiency": 0.5, "inverter_efficiency": 1 }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(json_request(
                "/predict",
                serde_json::json!({
                    "latitude": 13.75,
                    "longitude": 100.5,
                    "start_datetime": "2025-06-01T00:00",
                    "end_datetime": "2025-06-01T02:00",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "Prediction completed successfully.");
        assert_eq!(body["hours"], 3);

        // 2 m² × 0.5 × 1.0 / 1000 → 0.001 kWh per W/m²
        let resp = app.oneshot(get_request("/energy_data")).await.unwrap();
        assert_eq!(
            body_json(resp).await,
            serde_json::json!([
                { "Hour": 1, "Estimated_Energy": 0.0 },
                { "Hour": 2, "Estimated_Energy": 0.25 },
                { "Hour": 3, "Estimated_Energy": 0.75 },
            ])
        );
    }

    #[tokio::test]
    async fn predict_and_results_beyond_decimal_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hourly": { "time": ["2025-06-01T12:00"], "shortwave_radiation": [500.0] }
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let app = router(state_in(dir.path(), &server.uri()));

        let resp = app
            .clone()
            .oneshot(json_request(
                "/submit_pv",
                serde_json::json!({ "area": "1e40", "panel_efficiency": 0.2, "inverter_efficiency": 0.9 }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(json_request(
                "/predict",
                serde_json::json!({
                    "latitude": 47.37,
                    "longitude": 8.54,
                    "start_datetime": "2025-06-01T12:00",
                    "end_datetime": "2025-06-01T12:00",
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["hours"], 1);

        let resp = app.oneshot(get_request("/results")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains("id=\"total-energy\""));
    }
}
