pub mod response;
pub mod transaction;

pub use response::*;
pub use transaction::*;
