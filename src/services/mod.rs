pub mod auth_service;
pub mod search_service;
pub mod trust_service;
pub mod verify_service;

pub use auth_service::*;
pub use search_service::*;
pub use trust_service::*;
pub use verify_service::*;
