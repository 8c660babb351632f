pub mod stability;

pub use stability::StabilityGate;
