pub mod grammar;
pub mod types;

pub use grammar::{BindingField, Person, Role, Tense};
pub use types::{AppEvent, EditEvent, ScalarField};
