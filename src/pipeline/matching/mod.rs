pub mod keyword;
pub mod service;
pub mod types;

pub use keyword::*;
pub use service::*;
pub use types::*;
