//! Style profiles: producing, storing and applying them.

mod analyzer;
mod store;
mod transformer;

pub use analyzer::{sample_transcript, StyleAnalyzer, SECTION_SEPARATOR};
pub use store::StyleStore;
pub use transformer::StyleTransformer;
