// Core domain layer
pub mod inputs;
pub mod models;
pub mod resolver;
pub mod rules;

pub use inputs::*;
pub use models::*;
pub use resolver::*;
pub use rules::*;
