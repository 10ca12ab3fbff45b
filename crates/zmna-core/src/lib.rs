pub mod assembler;
pub mod autosave;
pub mod binding;
pub mod error;
pub mod pattern;
pub mod preprocess;
pub mod preverb;
pub mod record;
pub mod reference;
pub mod session;
pub mod store;
pub mod translation;
pub mod visibility;
