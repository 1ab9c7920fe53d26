pub mod descriptor;
pub mod naming;
mod normalizer;

pub use naming::ImagesetName;
pub use normalizer::Correction;
pub use normalizer::NormalizeReport;
pub use normalizer::normalize;
