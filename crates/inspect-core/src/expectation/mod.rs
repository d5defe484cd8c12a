//! Operator-declared expectations for one inspection session

pub mod model;
pub mod prompt;

pub use model::{Expectation, ExpectationModel};
pub use prompt::{ConsolePrompt, CountPrompt, FnPrompt};
