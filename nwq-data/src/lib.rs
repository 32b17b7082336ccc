//! Water quality computations over loaded survey data.
//!
//! This crate scores samples against their acceptable ranges, links
//! samples across survey years by location, and reduces annotated
//! datasets (and the IoT sensor series) to summary statistics.

pub mod seasonal;
pub mod statistics;

/// Water Quality Index scoring.
pub mod wqi {
    use nwq_core::{ParameterLimit, ParameterLimits, WaterSample, WqiScore, YearDataset};

    /// Full marks for a reading inside its range.
    pub const MAX_SCORE: f64 = 100.0;

    /// Score a single reading against its limit.
    ///
    /// In range (inclusive) scores 100. Out of range scores
    /// `100 - |reading - midpoint| / half_range * 100`, floored at 0.
    pub fn parameter_score(reading: f64, limit: &ParameterLimit) -> f64 {
        if limit.contains(reading) {
            return MAX_SCORE;
        }
        let half_range = limit.half_range();
        if half_range <= 0.0 {
            return 0.0;
        }
        let penalty = (reading - limit.midpoint()).abs() / half_range * MAX_SCORE;
        (MAX_SCORE - penalty).max(0.0)
    }

    /// Compute the WQI and exceedance count for one sample.
    ///
    /// Only parameters present in both the sample and `limits` are
    /// evaluated. With nothing to evaluate the score is `None`.
    pub fn score_sample(sample: &WaterSample, limits: &ParameterLimits) -> WqiScore {
        let mut total = 0.0;
        let mut evaluated = 0usize;
        let mut exceeding = Vec::new();
        for (name, limit) in limits.iter() {
            let Some(reading) = sample.reading(name).filter(|r| r.is_finite()) else {
                continue;
            };
            total += parameter_score(reading, limit);
            evaluated += 1;
            if !limit.contains(reading) {
                exceeding.push(name.to_string());
            }
        }
        WqiScore {
            wqi: (evaluated > 0).then(|| total / evaluated as f64),
            exceeding_count: exceeding.len(),
            evaluated,
            exceeding,
        }
    }

    /// Attach a fresh score to every sample, replacing any previous one.
    pub fn annotate_dataset(dataset: &mut YearDataset, limits: &ParameterLimits) {
        for sample in &mut dataset.samples {
            sample.score = Some(score_sample(sample, limits));
        }
        let undefined = dataset.iter().filter(|s| s.wqi().is_none()).count();
        if undefined > 0 {
            log::warn!(
                "wqi: {} of {} samples in {} have no scored parameters",
                undefined,
                dataset.len(),
                dataset.year
            );
        }
    }

}

/// Year-over-year location matching.
///
/// Distances are Euclidean in raw degree space, which is only a stand-in
/// for physical distance at the scale of a single village. Every base
/// point scans the whole target dataset, O(|A|*|B|).
pub mod matcher {
    use nwq_core::{WaterSample, YearDataset};
    use serde::Serialize;

    /// Default tolerance in degrees (near-exact coincidence).
    pub const DEFAULT_TOLERANCE: f64 = 0.0001;

    /// The target-year sample found for one base-year sample.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct SampleMatch {
        /// Index into the target dataset's samples
        pub target_index: usize,
        pub target_sample_id: String,
        /// Coordinate distance in degrees
        pub distance: f64,
    }

    /// Count of matched and unmatched base samples.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct MatchSummary {
        pub matched: usize,
        pub unmatched: usize,
    }

    /// Matches from a base year into a target year. `matches[i]` belongs
    /// to the base dataset's sample `i`.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct MatchSet {
        pub base_year: String,
        pub target_year: String,
        pub tolerance: f64,
        pub matches: Vec<Option<SampleMatch>>,
    }

    impl MatchSet {
        pub fn get(&self, base_index: usize) -> Option<&SampleMatch> {
            self.matches.get(base_index).and_then(Option::as_ref)
        }

        pub fn summary(&self) -> MatchSummary {
            let matched = self.matches.iter().filter(|m| m.is_some()).count();
            MatchSummary {
                matched,
                unmatched: self.matches.len() - matched,
            }
        }
    }

    /// `sqrt(dlat^2 + dlon^2)` in degrees.
    pub fn coordinate_distance(a: &WaterSample, b: &WaterSample) -> f64 {
        let d_lat = a.latitude - b.latitude;
        let d_lon = a.longitude - b.longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }

    /// Closest target sample and its distance. On ties the earliest
    /// sample in target order wins.
    pub fn nearest(point: &WaterSample, target: &YearDataset) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in target.iter().enumerate() {
            let distance = coordinate_distance(point, candidate);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best
    }

    /// Nearest target sample, reported only when within `tolerance`.
    pub fn find_match(
        point: &WaterSample,
        target: &YearDataset,
        tolerance: f64,
    ) -> Option<SampleMatch> {
        let tolerance = tolerance.max(0.0);
        nearest(point, target)
            .filter(|(_, distance)| *distance <= tolerance)
            .map(|(target_index, distance)| SampleMatch {
                target_index,
                target_sample_id: target.samples[target_index].sample_id.clone(),
                distance,
            })
    }

    /// Match every base sample against the target dataset.
    pub fn match_datasets(base: &YearDataset, target: &YearDataset, tolerance: f64) -> MatchSet {
        let matches = base
            .iter()
            .map(|point| find_match(point, target, tolerance))
            .collect();
        let set = MatchSet {
            base_year: base.year.clone(),
            target_year: target.year.clone(),
            tolerance,
            matches,
        };
        let summary = set.summary();
        log::debug!(
            "matcher: {} -> {}: {} matched, {} unmatched (tolerance {})",
            set.base_year,
            set.target_year,
            summary.matched,
            summary.unmatched,
            tolerance
        );
        set
    }

}
