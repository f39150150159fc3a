use axum::{
    extract::{FromRequestParts, Path, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::ErrorResponse;
use crate::weather::{Coordinates, LocationQuery};

/// Query parameters accepted by the weather/forecast passthrough endpoints
#[derive(Debug, Deserialize)]
pub struct LocationQueryParams {
    /// City name
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Location taken from the `{city}` path segment, `?city=`, or `?lat=&lon=`
///
/// Path wins over query. `None` means the caller gave no location and the
/// handler should fall back to the configured default.
#[derive(Debug)]
pub struct LocationParam(pub Option<LocationQuery>);

impl LocationParam {
    pub fn or_default(self, default: Coordinates) -> LocationQuery {
        self.0.unwrap_or(LocationQuery::Coordinates(default))
    }
}

impl<S> FromRequestParts<S> for LocationParam
where
    S: Send + Sync,
{
    type Rejection = LocationParamRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Path(city)) = Path::<String>::from_request_parts(parts, state).await {
            let city = city.trim();
            if !city.is_empty() {
                return Ok(LocationParam(Some(LocationQuery::City(city.to_string()))));
            }
        }

        let Query(query) = Query::<LocationQueryParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| LocationParamRejection(e.body_text()))?;

        match (query.city, query.lat, query.lon) {
            (Some(city), _, _) if !city.trim().is_empty() => Ok(LocationParam(Some(
                LocationQuery::City(city.trim().to_string()),
            ))),
            (_, Some(lat), Some(lon)) => Coordinates::new(lat, lon)
                .map(|c| LocationParam(Some(LocationQuery::Coordinates(c))))
                .ok_or_else(|| {
                    LocationParamRejection(format!(
                        "Coordinates out of range: lat={}, lon={}",
                        lat, lon
                    ))
                }),
            (_, Some(_), None) | (_, None, Some(_)) => Err(LocationParamRejection(
                "Both lat and lon are required".to_string(),
            )),
            _ => Ok(LocationParam(None)),
        }
    }
}

/// Rejection for malformed location parameters
#[derive(Debug)]
pub struct LocationParamRejection(pub String);

impl IntoResponse for LocationParamRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_code(self.0, "INVALID_LOCATION")),
        )
            .into_response()
    }
}
