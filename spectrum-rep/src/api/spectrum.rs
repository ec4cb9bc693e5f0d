//! Spectrum chart export

use axum::{extract::State, Json};

use crate::spectrum::{spectrum_points, SpectrumSeries};
use crate::AppState;

/// GET /api/spectrum
pub async fn get_spectrum(State(state): State<AppState>) -> Json<SpectrumSeries> {
    let entries = state.store.snapshot().await;
    let points = spectrum_points(&entries, state.directory.as_ref());
    Json(SpectrumSeries::from(points))
}
