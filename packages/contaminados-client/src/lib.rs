pub mod api_client;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod polling;
pub mod session;
pub mod view;

pub use api_client::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use models::*;
pub use polling::*;
pub use session::*;
pub use view::*;
