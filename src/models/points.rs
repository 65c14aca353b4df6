//! Fixed-point score arithmetic.
//!
//! Tournament scores have half-point granularity but accumulate over many
//! increments and retractions. They are held as integer milli-points
//! (1.0 point == 1000) so repeated arithmetic never drifts; conversion to
//! and from floats happens only at the serialization boundary, rounded to
//! three decimal digits.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A score value in milli-points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Points(i64);

impl Points {
    /// No points.
    pub const ZERO: Points = Points(0);
    /// Half a point (a draw).
    pub const HALF: Points = Points(500);
    /// One full point (a win, or a full-point bye).
    pub const ONE: Points = Points(1000);

    /// Build from raw milli-points.
    pub fn from_millis(millis: i64) -> Self {
        Points(millis)
    }

    /// Raw milli-points.
    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Build from a float, rounded to three decimal digits.
    pub fn from_f64(value: f64) -> Self {
        Points((value * 1000.0).round() as i64)
    }

    /// Float view for display and serialization.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Half of this value (used for Sonneborn-Berger draw credit).
    pub fn halved(&self) -> Points {
        Points(self.0 / 2)
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

impl Sub for Points {
    type Output = Points;

    fn sub(self, rhs: Points) -> Points {
        Points(self.0 - rhs.0)
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Points) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Points {
    fn sub_assign(&mut self, rhs: Points) {
        self.0 -= rhs.0;
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Points {
        iter.fold(Points::ZERO, |acc, p| acc + p)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Points::from_f64(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_constants() {
        assert_eq!(Points::ZERO.millis(), 0);
        assert_eq!(Points::HALF.millis(), 500);
        assert_eq!(Points::ONE.millis(), 1000);
    }

    #[test]
    fn test_points_arithmetic() {
        let mut score = Points::ZERO;
        score += Points::ONE;
        score += Points::HALF;
        assert_eq!(score, Points::from_millis(1500));

        score -= Points::ONE;
        assert_eq!(score, Points::HALF);
    }

    #[test]
    fn test_points_repeated_halves_do_not_drift() {
        // 0.1 + 0.2 style drift is impossible in milli-points
        let mut score = Points::ZERO;
        for _ in 0..11 {
            score += Points::HALF;
        }
        assert_eq!(score, Points::from_f64(5.5));
    }

    #[test]
    fn test_points_sum() {
        let total: Points = vec![Points::ONE, Points::HALF, Points::HALF]
            .into_iter()
            .sum();
        assert_eq!(total, Points::from_millis(2000));
    }

    #[test]
    fn test_points_from_f64_rounds_to_three_decimals() {
        assert_eq!(Points::from_f64(0.5004).millis(), 500);
        assert_eq!(Points::from_f64(0.4996).millis(), 500);
    }

    #[test]
    fn test_points_halved() {
        assert_eq!(Points::ONE.halved(), Points::HALF);
        assert_eq!(Points::from_f64(1.5).halved(), Points::from_millis(750));
    }

    #[test]
    fn test_points_ordering() {
        assert!(Points::ONE > Points::HALF);
        assert!(Points::HALF > Points::ZERO);
    }

    #[test]
    fn test_points_serialization() {
        let json = serde_json::to_string(&Points::from_f64(2.5)).unwrap();
        assert_eq!(json, "2.5");

        let parsed: Points = serde_json::from_str("1.5").unwrap();
        assert_eq!(parsed, Points::from_millis(1500));
    }

    #[test]
    fn test_points_display() {
        assert_eq!(format!("{}", Points::from_f64(3.5)), "3.5");
        assert_eq!(format!("{}", Points::ONE), "1");
    }
}
