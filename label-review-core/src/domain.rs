pub mod ids;
pub mod change_log;
pub mod item;
pub mod fields;
pub mod metadata;

pub use ids::*;
pub use change_log::*;
pub use item::*;
pub use fields::*;
pub use metadata::*;
