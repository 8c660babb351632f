pub mod classification;
pub mod label;

pub use classification::ClassificationResult;
pub use label::GestureLabel;
