pub mod model;
pub mod store;
pub mod version;

pub use model::{NewRelease, Release};
pub use store::ReleaseStore;
pub use version::{Version, VersionStatus};
