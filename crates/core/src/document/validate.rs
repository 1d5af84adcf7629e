//! Checks deciding whether a built page becomes a document.
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("page has no title")]
    MissingTitle,
    #[error("page has no body")]
    MissingBody,
    #[error("page title and body are both empty")]
    Empty,
    #[error("page path is excluded from indexing")]
    Excluded,
}

/// Validate that a page carries content worth storing.
///
/// Pages built without a title or body (partial translations, generated
/// indexes) are not documents; neither are pages whose sanitised title and
/// body are both blank.
pub fn validate_page_fields(
    title: Option<&str>,
    body: Option<&str>,
) -> Result<(), SkipReason> {
    let title = title.ok_or(SkipReason::MissingTitle)?;
    let body = body.ok_or(SkipReason::MissingBody)?;
    if title.trim().is_empty() && body.trim().is_empty() {
        return Err(SkipReason::Empty);
    }
    Ok(())
}
