//! Control algorithms under comparison

use crate::error::AnovaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Robotic control algorithm whose control error is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    /// Proportional-integral-derivative controller
    Pid,
    /// Linear-quadratic regulator
    Lqr,
    /// Model predictive control
    Mpc,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Pid, Algorithm::Lqr, Algorithm::Mpc];

    /// Canonical upper-case label used in data files and reports
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Pid => "PID",
            Algorithm::Lqr => "LQR",
            Algorithm::Mpc => "MPC",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = AnovaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PID" => Ok(Algorithm::Pid),
            "LQR" => Ok(Algorithm::Lqr),
            "MPC" => Ok(Algorithm::Mpc),
            _ => Err(AnovaError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = AnovaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.label().to_string()
    }
}
