//! Manual coordinate entry.
//!
//! - GET /location: form prefilled with the stored coordinates
//! - POST /location: validate and save, re-render with a message
//! - GET /api/v1/coordinates: stored coordinates as JSON

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;

use crate::state::AppState;
use crate::store::coordinates::{Coordinate, CoordinateLookup};
use crate::views::{render_error, render_location, LocationPage};

#[derive(Debug, Deserialize)]
pub struct LocationForm {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Location page with the last saved coordinates, if readable.
pub async fn show_location(State(state): State<AppState>) -> Html<String> {
    let lookup = state.coordinates.load();
    let (latitude, longitude) = lookup.display_fields();
    Html(render_location(&LocationPage {
        latitude,
        longitude,
        ..Default::default()
    }))
}

/// Save coordinates from the location form.
///
/// Invalid input re-renders the form with the error and leaves the stored
/// record untouched.
pub async fn submit_location(
    State(state): State<AppState>,
    Form(form): Form<LocationForm>,
) -> Response {
    let latitude = form.latitude.as_deref();
    let longitude = form.longitude.as_deref();

    let coordinate = match Coordinate::parse(latitude, longitude) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("Rejected location input: {}", e);
            let page = render_location(&LocationPage {
                latitude,
                longitude,
                error: Some(&e.to_string()),
                success: None,
            });
            return (StatusCode::BAD_REQUEST, Html(page)).into_response();
        }
    };

    if let Err(e) = state.coordinates.save(coordinate) {
        tracing::error!("Failed to save coordinates: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render_error(&e.to_string())),
        )
            .into_response();
    }

    let lat = coordinate.latitude.to_string();
    let lon = coordinate.longitude.to_string();
    Html(render_location(&LocationPage {
        latitude: Some(&lat),
        longitude: Some(&lon),
        error: None,
        success: Some("Coordinates saved successfully!"),
    }))
    .into_response()
}

/// Get the stored coordinates.
///
/// Distinguishes a missing record from an unreadable one; neither is an error.
#[utoipa::path(
    get,
    path = "/api/v1/coordinates",
    tag = "Location",
    responses(
        (status = 200, description = "Stored coordinate record", body = CoordinateLookup),
    )
)]
pub async fn get_coordinates(State(state): State<AppState>) -> Json<CoordinateLookup> {
    Json(state.coordinates.load())
}
