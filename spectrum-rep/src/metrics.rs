//! Derived percentages and spectrum coordinates
//!
//! Every percentage is `(p - q) / (p + q) * 100` over one bipolar pair of
//! counters, with the dominant counter first. A pair summing to zero yields
//! `0.0` for all four metrics.

use serde::Serialize;
use spectrum_common::ScoreVector;

/// Signed share of `p` over the pair `(p, q)`, in percent
pub fn percent(p: i64, q: i64) -> f64 {
    let sum = p + q;
    if sum == 0 {
        return 0.0;
    }
    (p - q) as f64 / sum as f64 * 100.0
}

pub fn autism_percent(scores: &ScoreVector) -> f64 {
    percent(scores.autism, scores.normie)
}

pub fn normie_percent(scores: &ScoreVector) -> f64 {
    percent(scores.normie, scores.autism)
}

pub fn nice_percent(scores: &ScoreVector) -> f64 {
    percent(scores.nice, scores.toxic)
}

pub fn toxic_percent(scores: &ScoreVector) -> f64 {
    percent(scores.toxic, scores.nice)
}

/// All four derived percentages for one vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentages {
    pub autism: f64,
    pub normie: f64,
    pub nice: f64,
    pub toxic: f64,
}

impl Percentages {
    pub fn from_scores(scores: &ScoreVector) -> Self {
        Self {
            autism: autism_percent(scores),
            normie: normie_percent(scores),
            nice: nice_percent(scores),
            toxic: toxic_percent(scores),
        }
    }

    /// `(x, y)` position on the spectrum chart
    ///
    /// x runs abrasive (negative) to warm (positive); y runs conventional
    /// (negative) to distinctive (positive). Percentages in `[0, 100]` map
    /// into `[-10, 10]`.
    pub fn coordinates(&self) -> (f64, f64) {
        let x = if self.toxic > self.nice {
            -self.toxic / 10.0
        } else {
            self.nice / 10.0
        };
        let y = if self.normie > self.autism {
            -self.normie / 10.0
        } else {
            self.autism / 10.0
        };
        (x, y)
    }
}

/// Spectrum coordinates straight from a score vector
pub fn spectrum_coordinates(scores: &ScoreVector) -> (f64, f64) {
    Percentages::from_scores(scores).coordinates()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_zero_sum_is_zero() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(3, -3), 0.0);
    }

    #[test]
    fn test_percent_antisymmetric() {
        for p in -5..=8 {
            for q in -5..=8 {
                if p + q != 0 {
                    assert_eq!(percent(p, q), -percent(q, p), "p={} q={}", p, q);
                }
            }
        }
    }

    #[test]
    fn test_one_autism_reaction_is_twenty_percent() {
        let v = ScoreVector::new(3, 2, 2, 2);
        assert!((autism_percent(&v) - 20.0).abs() < 1e-9);
        assert!((normie_percent(&v) + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_fresh_vector_is_neutral() {
        let p = Percentages::from_scores(&ScoreVector::prior());
        assert_eq!(p.autism, 0.0);
        assert_eq!(p.normie, 0.0);
        assert_eq!(p.nice, 0.0);
        assert_eq!(p.toxic, 0.0);
        assert_eq!(p.coordinates(), (0.0, 0.0));
    }

    #[test]
    fn test_zero_sum_pair_is_uniform_across_all_four() {
        let p = Percentages::from_scores(&ScoreVector::new(0, 0, 1, -1));
        assert_eq!(p.autism, 0.0);
        assert_eq!(p.normie, 0.0);
        assert_eq!(p.nice, 0.0);
        assert_eq!(p.toxic, 0.0);
    }

    #[test]
    fn test_coordinates_signs() {
        // toxic and conventional
        let (x, y) = spectrum_coordinates(&ScoreVector::new(2, 6, 2, 6));
        assert!((x + 5.0).abs() < 1e-9);
        assert!((y + 5.0).abs() < 1e-9);

        // nice and distinctive
        let (x, y) = spectrum_coordinates(&ScoreVector::new(6, 2, 6, 2));
        assert!((x - 5.0).abs() < 1e-9);
        assert!((y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_coordinates_bounded_for_non_negative_counters() {
        for a in 0..6 {
            for b in 0..6 {
                for c in 0..6 {
                    for d in 0..6 {
                        let (x, y) = spectrum_coordinates(&ScoreVector::new(a, b, c, d));
                        assert!((-10.0..=10.0).contains(&x), "x={} for {:?}", x, (a, b, c, d));
                        assert!((-10.0..=10.0).contains(&y), "y={} for {:?}", y, (a, b, c, d));
                    }
                }
            }
        }
    }

    #[test]
    fn test_coordinates_from_extreme_percentages() {
        let p = Percentages {
            autism: 0.0,
            normie: 100.0,
            nice: 0.0,
            toxic: 100.0,
        };
        assert_eq!(p.coordinates(), (-10.0, -10.0));
    }
}
