pub mod model;
pub mod path;
pub mod search;
pub mod store;
pub mod sync;
pub mod validate;

pub use model::{Breadcrumb, Document, DocumentMetadata, NewDocument, SearchText};
pub use path::DocumentPath;
pub use search::{DocumentSearch, SearchHit, START_SEL, STOP_SEL};
pub use store::DocumentStore;
pub use sync::{prepare_documents, PageRecord, SyncReport};
pub use validate::{validate_page_fields, SkipReason};
