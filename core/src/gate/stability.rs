use crate::telemetry::log::LogManager;

/// Frames a label must persist before the gate confirms it.
pub const DEFAULT_REQUIRED_FRAMES: u32 = 5;

/// Debounce state machine that suppresses flickering classifications.
///
/// Generic over any comparable label type. The gate must be driven by a
/// single sequential caller; classification results for one gesture stream
/// arrive in order on one logical consumer.
pub struct StabilityGate<T> {
    required_count: u32,
    current_count: u32,
    current_label: Option<T>,
    has_fired: bool,
    logger: LogManager,
}

impl<T: Copy + PartialEq + std::fmt::Debug> StabilityGate<T> {
    /// Panics when `required_count` is zero; that is a programming error,
    /// not a runtime condition.
    pub fn new(required_count: u32) -> Self {
        assert!(required_count >= 1, "required_count must be at least 1");
        Self {
            required_count,
            current_count: 0,
            current_label: None,
            has_fired: false,
            logger: LogManager::new(),
        }
    }

    /// Feeds one frame into the gate.
    ///
    /// Returns `Some(label)` exactly once per run of `required_count` or more
    /// identical positive labels; any non-positive frame resets the run.
    pub fn process(&mut self, label: T, is_positive: bool) -> Option<T> {
        if !is_positive {
            self.reset();
            return None;
        }

        if self.current_label == Some(label) {
            self.current_count += 1;
        } else {
            self.current_label = Some(label);
            self.current_count = 1;
            self.has_fired = false;
        }

        if self.current_count >= self.required_count && !self.has_fired {
            self.has_fired = true;
            self.logger.record(&format!(
                "StabilityGate confirmed {:?} after {} frames",
                label, self.current_count
            ));
            return Some(label);
        }
        None
    }

    /// Clears the run state. Idempotent.
    pub fn reset(&mut self) {
        self.current_count = 0;
        self.current_label = None;
        self.has_fired = false;
    }

    /// Fraction of the required run accumulated so far, clamped to `[0, 1]`.
    pub fn progress(&self) -> f32 {
        (self.current_count as f32 / self.required_count as f32).min(1.0)
    }

    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    pub fn current_label(&self) -> Option<T> {
        self.current_label
    }
}

impl<T: Copy + PartialEq + std::fmt::Debug> Default for StabilityGate<T> {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRED_FRAMES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureLabel;

    fn feed(gate: &mut StabilityGate<GestureLabel>, label: GestureLabel) -> Option<GestureLabel> {
        gate.process(label, label.is_positive())
    }

    #[test]
    fn fires_exactly_once_when_run_reaches_threshold() {
        let mut gate = StabilityGate::new(5);
        for _ in 0..4 {
            assert_eq!(feed(&mut gate, GestureLabel::Victory), None);
        }
        assert_eq!(feed(&mut gate, GestureLabel::Victory), Some(GestureLabel::Victory));
        // A sixth identical frame must not re-fire.
        assert_eq!(feed(&mut gate, GestureLabel::Victory), None);
        assert!(gate.has_fired());
    }

    #[test]
    fn non_positive_frame_resets_the_run() {
        let mut gate = StabilityGate::new(5);
        feed(&mut gate, GestureLabel::Victory);
        feed(&mut gate, GestureLabel::None);
        assert_eq!(gate.progress(), 0.0);
        assert_eq!(gate.current_label(), None);

        let mut fired = Vec::new();
        for _ in 0..5 {
            if let Some(label) = feed(&mut gate, GestureLabel::Victory) {
                fired.push(label);
            }
        }
        assert_eq!(fired, vec![GestureLabel::Victory]);
    }

    #[test]
    fn label_change_restarts_accumulation() {
        let mut gate = StabilityGate::new(3);
        feed(&mut gate, GestureLabel::Fist);
        feed(&mut gate, GestureLabel::Fist);
        feed(&mut gate, GestureLabel::OpenPalm);
        assert_eq!(gate.current_label(), Some(GestureLabel::OpenPalm));
        assert_eq!(feed(&mut gate, GestureLabel::OpenPalm), None);
        assert_eq!(feed(&mut gate, GestureLabel::OpenPalm), Some(GestureLabel::OpenPalm));
    }

    #[test]
    fn alternating_labels_never_fire() {
        let mut gate = StabilityGate::new(2);
        for _ in 0..10 {
            assert_eq!(feed(&mut gate, GestureLabel::Victory), None);
            assert_eq!(feed(&mut gate, GestureLabel::Fist), None);
        }
    }

    #[test]
    fn progress_grows_monotonically_and_clamps() {
        let mut gate = StabilityGate::new(4);
        assert_eq!(gate.progress(), 0.0);
        let mut last = 0.0;
        for _ in 0..4 {
            feed(&mut gate, GestureLabel::ThumbsUp);
            assert!(gate.progress() >= last);
            last = gate.progress();
        }
        assert_eq!(gate.progress(), 1.0);
        feed(&mut gate, GestureLabel::ThumbsUp);
        assert_eq!(gate.progress(), 1.0);
        gate.reset();
        assert_eq!(gate.progress(), 0.0);
    }

    #[test]
    fn same_label_can_fire_again_after_explicit_reset() {
        let mut gate = StabilityGate::new(2);
        feed(&mut gate, GestureLabel::Fist);
        assert_eq!(feed(&mut gate, GestureLabel::Fist), Some(GestureLabel::Fist));
        gate.reset();
        feed(&mut gate, GestureLabel::Fist);
        assert_eq!(feed(&mut gate, GestureLabel::Fist), Some(GestureLabel::Fist));
    }

    #[test]
    #[should_panic(expected = "required_count must be at least 1")]
    fn zero_threshold_is_rejected_at_construction() {
        let _ = StabilityGate::<GestureLabel>::new(0);
    }
}
