use gesturecore::prelude::{ClassificationResult, GestureLabel};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for generating a synthetic classification script.
///
/// The script stands in for the camera classifier during offline runs: each
/// gesture is held for a fixed number of frames, optionally interrupted by
/// scripted flicker, with empty frames between gestures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub gestures: Vec<GestureLabel>,
    pub frames_per_gesture: usize,
    /// Every Nth held frame becomes an empty observation; 0 disables flicker.
    pub flicker_every: usize,
    pub gap_frames: usize,
    pub seed: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            gestures: GestureLabel::SIGNALABLE.to_vec(),
            frames_per_gesture: 8,
            flicker_every: 0,
            gap_frames: 3,
            seed: 0,
        }
    }
}

/// Builds the scripted frame sequence, reproducible per seed.
pub fn build_script(config: &ScriptConfig) -> Vec<ClassificationResult> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut frames = Vec::new();

    for &gesture in &config.gestures {
        for held in 0..config.frames_per_gesture {
            if config.flicker_every > 0 && (held + 1) % config.flicker_every == 0 {
                frames.push(ClassificationResult::empty());
            } else {
                let confidence = rng.gen_range(0.6..1.0);
                frames.push(ClassificationResult::new(gesture, confidence));
            }
        }
        for _ in 0..config.gap_frames {
            frames.push(ClassificationResult::empty());
        }
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_holds_each_gesture_for_configured_frames() {
        let config = ScriptConfig {
            gestures: vec![GestureLabel::Victory, GestureLabel::Fist],
            frames_per_gesture: 6,
            flicker_every: 0,
            gap_frames: 2,
            seed: 0,
        };
        let frames = build_script(&config);
        assert_eq!(frames.len(), 2 * (6 + 2));
        assert!(frames[..6]
            .iter()
            .all(|frame| frame.label == GestureLabel::Victory));
        assert!(frames[6..8]
            .iter()
            .all(|frame| frame.label == GestureLabel::None));
    }

    #[test]
    fn flicker_replaces_scripted_positions_with_empty_frames() {
        let config = ScriptConfig {
            gestures: vec![GestureLabel::OpenPalm],
            frames_per_gesture: 6,
            flicker_every: 3,
            gap_frames: 0,
            seed: 7,
        };
        let frames = build_script(&config);
        assert_eq!(frames[2].label, GestureLabel::None);
        assert_eq!(frames[5].label, GestureLabel::None);
        assert_eq!(frames[0].label, GestureLabel::OpenPalm);
    }

    #[test]
    fn identical_seeds_build_identical_confidences() {
        let config = ScriptConfig {
            seed: 42,
            ..Default::default()
        };
        let first = build_script(&config);
        let second = build_script(&config);
        let confidences =
            |frames: &[ClassificationResult]| frames.iter().map(|f| f.confidence).collect::<Vec<_>>();
        assert_eq!(confidences(&first), confidences(&second));
    }
}
