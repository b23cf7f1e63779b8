pub mod history;
pub mod requests;
pub mod responses;

pub use history::*;
pub use requests::*;
pub use responses::*;
