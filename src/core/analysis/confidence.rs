use serde::{Deserialize, Serialize};

/// Descending threshold ladder: the first step whose threshold the input
/// meets decides the score, `floor` applies below every step.
///
/// Ladders have no neutral default, so a config file replaces a ladder whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub steps: Vec<(f64, f64)>,
    pub floor: f64,
}

impl Ladder {
    pub fn new(steps: &[(f64, f64)], floor: f64) -> Self {
        Self {
            steps: steps.to_vec(),
            floor,
        }
    }

    pub fn score(&self, input: f64) -> f64 {
        self.steps
            .iter()
            .find(|(threshold, _)| input >= *threshold)
            .map(|(_, score)| *score)
            .unwrap_or(self.floor)
    }
}

/// Relative weight of each confidence factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub dominance: f64,
    pub consistency: f64,
    pub saturation: f64,
    pub brightness: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            dominance: 0.30,
            consistency: 0.25,
            saturation: 0.25,
            brightness: 0.20,
        }
    }
}

/// Minimum confidence by color regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeFloors {
    /// s > 30 and v > 30
    pub vivid: f64,
    /// s < 15 and v < 25
    pub dark_or_gray: f64,
    pub other: f64,
}

impl Default for RegimeFloors {
    fn default() -> Self {
        Self {
            vivid: 0.55,
            dark_or_gray: 0.50,
            other: 0.45,
        }
    }
}

/// Heuristic confidence model
///
/// Each factor is bucketed through a ladder rather than used continuously,
/// so scores move in coarse steps. Achromatic and very dark colors keep a
/// non-zero floor on their saturation/brightness factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceModel {
    pub weights: FactorWeights,
    pub dominance: Ladder,
    pub saturation: Ladder,
    pub brightness: Ladder,
    /// Multiplier for clearly defined colors
    pub boost: f64,
    /// Saturation and value must both exceed this for the boost
    pub boost_threshold: f64,
    pub floors: RegimeFloors,
}

impl Default for ConfidenceModel {
    fn default() -> Self {
        let tone_ladder = Ladder::new(
            &[(50.0, 1.0), (30.0, 0.9), (20.0, 0.8), (10.0, 0.7), (5.0, 0.6)],
            0.5,
        );
        Self {
            weights: FactorWeights::default(),
            dominance: Ladder::new(&[(30.0, 1.0), (20.0, 0.9), (15.0, 0.8), (10.0, 0.7)], 0.6),
            saturation: tone_ladder.clone(),
            brightness: tone_ladder,
            boost: 1.05,
            boost_threshold: 25.0,
            floors: RegimeFloors::default(),
        }
    }
}

impl ConfidenceModel {
    /// Base confidence for a cluster
    ///
    /// * `dominance` - share of sampled pixels in percent
    /// * `consistency` - intra-cluster agreement in [0, 1]
    /// * `saturation`, `value` - HSV percentages of the centroid
    pub fn confidence(&self, dominance: f64, consistency: f64, saturation: f64, value: f64) -> f64 {
        let consistency = if consistency.is_nan() { 0.0 } else { consistency.clamp(0.0, 1.0) };

        let base = self.dominance.score(dominance) * self.weights.dominance
            + consistency * self.weights.consistency
            + self.saturation.score(saturation) * self.weights.saturation
            + self.brightness.score(value) * self.weights.brightness;

        let boost = if saturation > self.boost_threshold && value > self.boost_threshold {
            self.boost
        } else {
            1.0
        };

        clamp_unit(base * boost)
    }

    /// Minimum confidence for a color in the given saturation/value regime
    pub fn regime_floor(&self, saturation: f64, value: f64) -> f64 {
        if saturation > 30.0 && value > 30.0 {
            self.floors.vivid
        } else if saturation < 15.0 && value < 25.0 {
            self.floors.dark_or_gray
        } else {
            self.floors.other
        }
    }

    /// Base confidence raised to the regime floor
    pub fn floored_confidence(&self, dominance: f64, consistency: f64, saturation: f64, value: f64) -> f64 {
        let base = self.confidence(dominance, consistency, saturation, value);
        clamp_unit(base.max(self.regime_floor(saturation, value)))
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ladders() {
        let model = ConfidenceModel::default();
        assert_eq!(model.dominance.score(100.0), 1.0);
        assert_eq!(model.dominance.score(30.0), 1.0);
        assert_eq!(model.dominance.score(25.0), 0.9);
        assert_eq!(model.dominance.score(15.0), 0.8);
        assert_eq!(model.dominance.score(12.0), 0.7);
        assert_eq!(model.dominance.score(3.0), 0.6);

        assert_eq!(model.saturation.score(60.0), 1.0);
        assert_eq!(model.saturation.score(35.0), 0.9);
        assert_eq!(model.saturation.score(5.0), 0.6);
        assert_eq!(model.saturation.score(0.0), 0.5);
    }

    #[test]
    fn test_full_confidence_scenario() {
        let model = ConfidenceModel::default();
        // 1.0*0.3 + 1.0*0.25 + 1.0*0.25 + 1.0*0.2 = 1.0, boosted then clamped
        assert!(approx(model.confidence(100.0, 1.0, 60.0, 60.0), 1.0));
    }

    #[test]
    fn test_gray_keeps_nonzero_confidence() {
        let model = ConfidenceModel::default();
        // 0.6*0.3 + 0.5*0.25 + 0.5*0.25 + 0.5*0.2 = 0.53
        let score = model.confidence(5.0, 0.5, 0.0, 0.0);
        assert!(approx(score, 0.53), "{}", score);
    }

    #[test]
    fn test_boost_requires_both_channels() {
        let model = ConfidenceModel::default();
        // 0.7*0.3 + 0.5*0.25 + 0.9*0.25 + 0.9*0.2 = 0.74, then x1.05
        let boosted = model.confidence(10.0, 0.5, 30.0, 30.0);
        assert!(approx(boosted, 0.74 * 1.05), "{}", boosted);

        // 0.21 + 0.125 + 0.8*0.25 + 0.18 = 0.715, saturation 25 is not above the threshold
        let only_value = model.confidence(10.0, 0.5, 25.0, 30.0);
        assert!(approx(only_value, 0.715), "{}", only_value);
    }

    #[test]
    fn test_consistency_is_clamped() {
        let model = ConfidenceModel::default();
        let high = model.confidence(5.0, 7.0, 0.0, 0.0);
        let one = model.confidence(5.0, 1.0, 0.0, 0.0);
        assert!(approx(high, one));
        let nan = model.confidence(5.0, f64::NAN, 0.0, 0.0);
        assert!((0.0..=1.0).contains(&nan));
    }

    #[test]
    fn test_regime_floor() {
        let model = ConfidenceModel::default();
        assert_eq!(model.regime_floor(50.0, 50.0), 0.55);
        assert_eq!(model.regime_floor(5.0, 10.0), 0.50);
        assert_eq!(model.regime_floor(20.0, 80.0), 0.45);
    }

    #[test]
    fn test_floored_confidence_never_below_floor() {
        let model = ConfidenceModel::default();
        let score = model.floored_confidence(1.0, 0.0, 40.0, 40.0);
        assert!(score >= 0.55);
        assert!(score <= 1.0);
    }
}
