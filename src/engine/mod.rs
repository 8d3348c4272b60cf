//! The probing engine: candidate selection and the ordered check run.

pub mod errors;
pub mod selector;
pub mod sequence;

pub use errors::{RunError, SelectError};
pub use selector::{Chooser, FirstChooser, Selection, SelectionPolicy};
pub use sequence::{Configured, NullObserver, Observer, Warning};
