use crate::columns::{ALKALINITY, HARDNESS, PH};
use serde::{Deserialize, Serialize};

/// Inclusive acceptable range for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterLimit {
    pub lower: f64,
    pub upper: f64,
}

impl ParameterLimit {
    pub fn new(lower: f64, upper: f64) -> Self {
        ParameterLimit { lower, upper }
    }

    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn half_range(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }

    /// True when `reading` lies within `[lower, upper]`.
    pub fn contains(&self, reading: f64) -> bool {
        reading >= self.lower && reading <= self.upper
    }
}

/// Ordered table of parameter name to acceptable range.
///
/// The default table covers pH (6.5-8.5), Hardness (0-300) and
/// Alkalinity (0-200). Other measured columns (TDS, Nitrate, ...) are not
/// scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterLimits(Vec<(String, ParameterLimit)>);

impl ParameterLimits {
    /// An empty table.
    pub fn empty() -> Self {
        ParameterLimits(Vec::new())
    }

    /// Add or replace the limit for `name`, keeping first-insertion order.
    pub fn with_limit(mut self, name: &str, lower: f64, upper: f64) -> Self {
        let limit = ParameterLimit::new(lower, upper);
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = limit,
            None => self.0.push((name.to_string(), limit)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParameterLimit> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, l)| l)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterLimit)> {
        self.0.iter().map(|(n, l)| (n.as_str(), l))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ParameterLimits {
    fn default() -> Self {
        ParameterLimits::empty()
            .with_limit(PH, 6.5, 8.5)
            .with_limit(HARDNESS, 0.0, 300.0)
            .with_limit(ALKALINITY, 0.0, 200.0)
    }
}
