pub mod tabular;
pub mod snapshot;
pub mod backup;

pub use tabular::*;
pub use snapshot::*;
pub use backup::*;
