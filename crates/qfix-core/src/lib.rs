pub mod finding;
pub mod manifest;
pub mod outcome;
pub mod safety;
pub mod snapshot;

pub use finding::*;
pub use manifest::*;
pub use outcome::*;
pub use safety::*;
pub use snapshot::*;
