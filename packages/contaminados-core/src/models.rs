pub mod game;
pub mod round;

pub use game::*;
pub use round::*;
