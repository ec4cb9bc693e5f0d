//! Population export for the spectrum chart
//!
//! Rendering happens elsewhere; this module produces the three parallel
//! sequences the renderer consumes.

use crate::metrics::spectrum_coordinates;
use crate::resolver::HostingContext;
use serde::Serialize;
use spectrum_common::{IdentityId, ScoreVector};

/// One identity's position on the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Order-correlated, equal-length renderer input
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpectrumSeries {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub labels: Vec<String>,
}

impl From<Vec<SpectrumPoint>> for SpectrumSeries {
    fn from(points: Vec<SpectrumPoint>) -> Self {
        let mut series = SpectrumSeries::default();
        for point in points {
            series.xs.push(point.x);
            series.ys.push(point.y);
            series.labels.push(point.label);
        }
        series
    }
}

/// Points for every tracked identity the hosting context can name
///
/// Identities without a member entry have no label and are left out.
pub fn spectrum_points(
    entries: &[(IdentityId, ScoreVector)],
    ctx: &dyn HostingContext,
) -> Vec<SpectrumPoint> {
    entries
        .iter()
        .filter_map(|(id, scores)| {
            let member = ctx.find_by_id(id)?;
            let (x, y) = spectrum_coordinates(scores);
            Some(SpectrumPoint {
                x,
                y,
                label: member.display_name,
            })
        })
        .collect()
}
