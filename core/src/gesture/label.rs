use serde::{Deserialize, Serialize};

/// Closed set of hand-pose classes recognized by the system.
///
/// `None` is a sentinel meaning "no gesture currently observed"; it is never
/// confirmed or placed on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    None,
    Victory,
    ThumbsUp,
    ThumbsDown,
    OpenPalm,
    Fist,
}

impl GestureLabel {
    /// The five labels that can be confirmed and signaled.
    pub const SIGNALABLE: [GestureLabel; 5] = [
        GestureLabel::Victory,
        GestureLabel::ThumbsUp,
        GestureLabel::ThumbsDown,
        GestureLabel::OpenPalm,
        GestureLabel::Fist,
    ];

    pub fn is_positive(self) -> bool {
        self != GestureLabel::None
    }

    /// Lowercase snake_case name used on the wire; `None` for the sentinel.
    pub fn wire_name(self) -> Option<&'static str> {
        match self {
            GestureLabel::None => None,
            GestureLabel::Victory => Some("victory"),
            GestureLabel::ThumbsUp => Some("thumbs_up"),
            GestureLabel::ThumbsDown => Some("thumbs_down"),
            GestureLabel::OpenPalm => Some("open_palm"),
            GestureLabel::Fist => Some("fist"),
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            "victory" => Some(GestureLabel::Victory),
            "thumbs_up" => Some(GestureLabel::ThumbsUp),
            "thumbs_down" => Some(GestureLabel::ThumbsDown),
            "open_palm" => Some(GestureLabel::OpenPalm),
            "fist" => Some(GestureLabel::Fist),
            _ => None,
        }
    }

    /// Human-readable name for console output.
    pub fn display_name(self) -> &'static str {
        match self {
            GestureLabel::None => "No Gesture",
            GestureLabel::Victory => "Victory",
            GestureLabel::ThumbsUp => "Thumbs Up",
            GestureLabel::ThumbsDown => "Thumbs Down",
            GestureLabel::OpenPalm => "Open Palm",
            GestureLabel::Fist => "Fist",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_not_positive() {
        assert!(!GestureLabel::None.is_positive());
        for label in GestureLabel::SIGNALABLE {
            assert!(label.is_positive());
        }
    }

    #[test]
    fn wire_names_round_trip_for_signalable_labels() {
        for label in GestureLabel::SIGNALABLE {
            let name = label.wire_name().unwrap();
            assert_eq!(GestureLabel::from_wire_name(name), Some(label));
        }
    }

    #[test]
    fn sentinel_has_no_wire_name() {
        assert_eq!(GestureLabel::None.wire_name(), None);
        assert_eq!(GestureLabel::from_wire_name("wave"), None);
    }
}
