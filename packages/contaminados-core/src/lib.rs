pub mod models;
pub mod ordering;
pub mod phase;
pub mod resolver;
pub mod rules;

pub use models::*;
pub use ordering::*;
pub use phase::*;
pub use resolver::*;
pub use rules::*;
