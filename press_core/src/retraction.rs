//! Arm-retraction tracking against a startup baseline.

use crate::config::RetractionCfg;
use crate::error::PressError;
use crate::sample::DistanceSample;

/// Compares live distance against a baseline captured once at startup.
///
/// The baseline is immutable after construction. Invalid samples leave the
/// retraction flag untouched (stale-but-safe): one missed echo must not
/// gate the valve shut on its own.
#[derive(Debug, Clone)]
pub struct RetractionTracker {
    baseline_mm: f32,
    tolerance_mm: f32,
    retracted: bool,
}

impl RetractionTracker {
    /// Build from startup calibration samples: the baseline is the mean of
    /// the valid ones. Zero valid samples is a fatal calibration error —
    /// proceeding with a zero baseline would require the arm to sit at
    /// 0 mm to ever count as retracted.
    pub fn from_samples(
        samples: &[DistanceSample],
        cfg: &RetractionCfg,
    ) -> Result<Self, PressError> {
        let valid: Vec<f32> = samples
            .iter()
            .filter(|s| s.valid)
            .map(|s| s.millimeters)
            .collect();
        if valid.is_empty() {
            return Err(PressError::Calibration(format!(
                "no valid distance samples out of {} during baseline capture",
                samples.len()
            )));
        }
        let baseline_mm = valid.iter().sum::<f32>() / valid.len() as f32;
        tracing::info!(
            baseline_mm,
            valid = valid.len(),
            total = samples.len(),
            "retraction baseline captured"
        );
        Ok(Self {
            baseline_mm,
            tolerance_mm: cfg.tolerance_mm,
            retracted: true,
        })
    }

    /// Apply one live sample. Valid samples recompute the flag; invalid
    /// samples hold the previous value.
    pub fn update(&mut self, sample: &DistanceSample) -> bool {
        if sample.valid {
            self.retracted = (sample.millimeters - self.baseline_mm).abs() <= self.tolerance_mm;
        }
        self.retracted
    }

    pub fn baseline_mm(&self) -> f32 {
        self.baseline_mm
    }

    pub fn is_retracted(&self) -> bool {
        self.retracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(baseline: f32, tolerance: f32) -> RetractionTracker {
        RetractionTracker::from_samples(
            &[DistanceSample::valid(baseline)],
            &RetractionCfg {
                tolerance_mm: tolerance,
                ..RetractionCfg::default()
            },
        )
        .expect("one valid sample")
    }

    #[test]
    fn baseline_is_mean_of_valid_samples_only() {
        let samples = [
            DistanceSample::valid(100.0),
            DistanceSample::invalid(),
            DistanceSample::valid(102.0),
        ];
        let t = RetractionTracker::from_samples(&samples, &RetractionCfg::default())
            .expect("two valid samples");
        assert_eq!(t.baseline_mm(), 101.0);
    }

    #[test]
    fn all_invalid_samples_is_a_calibration_error() {
        let samples = [DistanceSample::invalid(); 5];
        let err = RetractionTracker::from_samples(&samples, &RetractionCfg::default())
            .expect_err("no valid samples");
        assert!(matches!(err, PressError::Calibration(_)));
    }

    #[test]
    fn within_tolerance_is_retracted() {
        let mut t = tracker(100.0, 2.0);
        assert!(t.update(&DistanceSample::valid(101.0)));
        assert!(!t.update(&DistanceSample::valid(105.0)));
        assert!(t.update(&DistanceSample::valid(98.5)));
    }

    #[test]
    fn invalid_sample_holds_previous_value() {
        let mut t = tracker(100.0, 2.0);
        t.update(&DistanceSample::valid(150.0));
        assert!(!t.is_retracted());
        t.update(&DistanceSample::invalid());
        assert!(!t.is_retracted());

        t.update(&DistanceSample::valid(100.0));
        assert!(t.is_retracted());
        t.update(&DistanceSample::invalid());
        assert!(t.is_retracted());
    }
}
