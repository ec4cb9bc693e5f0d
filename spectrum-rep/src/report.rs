//! Per-identity check report

use crate::metrics::Percentages;
use serde::Serialize;
use spectrum_common::{IdentityId, ScoreVector};

/// Derived view of one identity's standing
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub identity: IdentityId,
    pub display_name: String,
    pub scores: ScoreVector,
    pub percentages: Percentages,
    /// e.g. "raines is 20.0% autistic and 0.0% toxic."
    pub headline: String,
}

impl CheckReport {
    pub fn new(identity: IdentityId, display_name: String, scores: ScoreVector) -> Self {
        let percentages = Percentages::from_scores(&scores);

        // Ties go to the first label on each axis
        let identity_axis = if percentages.autism >= percentages.normie {
            format!("{:.1}% autistic", percentages.autism)
        } else {
            format!("{:.1}% normie", percentages.normie)
        };
        let affect_axis = if percentages.toxic >= percentages.nice {
            format!("{:.1}% toxic", percentages.toxic)
        } else {
            format!("{:.1}% nice", percentages.nice)
        };
        let headline = format!("{} is {} and {}.", display_name, identity_axis, affect_axis);

        Self {
            identity,
            display_name,
            scores,
            percentages,
            headline,
        }
    }
}
