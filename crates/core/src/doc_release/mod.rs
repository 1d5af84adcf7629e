pub mod model;
pub mod store;

pub use model::{DocumentRelease, ReleaseStatus, DEV_VERSION};
pub use store::DocumentReleaseStore;
