pub mod domain;
pub mod error;
pub mod store;
pub mod traits;

pub use domain::*;
pub use error::*;
pub use store::*;
pub use traits::*;
