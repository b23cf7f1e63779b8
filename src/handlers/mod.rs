pub mod auth;
pub mod health;
pub mod history;
pub mod verify;

pub use auth::*;
pub use health::*;
pub use history::*;
pub use verify::*;
