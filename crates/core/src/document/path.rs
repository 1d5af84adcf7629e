//! Document path utilities.
//!
//! Built page names follow conventions:
//! - Page: `topics/http/generic-views`
//! - Section index: `topics/http/index`, stored as `topics/http`

const INDEX_SUFFIX: &str = "/index";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Normalize a built page name into the stored path.
    pub fn parse(page_name: &str) -> Self {
        let path = page_name.strip_suffix(INDEX_SUFFIX).unwrap_or(page_name);
        DocumentPath(path.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Last path segment.
    pub fn slug(&self) -> &str {
        self.segments().last().unwrap_or("")
    }

    /// Segments above the slug, joined by spaces.
    pub fn parents(&self) -> String {
        let segments: Vec<&str> = self.segments().collect();
        match segments.split_last() {
            Some((_, parents)) => parents.join(" "),
            None => String::new(),
        }
    }

    /// Paths of every ancestor section, nearest to the root first.
    pub fn ancestors(&self) -> Vec<String> {
        let segments: Vec<&str> = self.segments().collect();
        (1..segments.len())
            .map(|depth| segments[..depth].join("/"))
            .collect()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
