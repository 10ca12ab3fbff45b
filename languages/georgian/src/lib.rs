pub mod examples;
pub mod preprocessor;
pub mod preverbs;
pub mod reference;

pub use examples::HttpExampleGenerator;
pub use preprocessor::GeorgianPreprocessor;
pub use preverbs::{is_known_preverb, unknown_preverbs};
pub use reference::{ReferenceData, ReferenceError, ReferenceLoader};
