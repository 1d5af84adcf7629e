//! Lookups in the built documentation tree on disk.

use std::path::{Path, PathBuf};

use crate::doc_release::DEV_VERSION;
use crate::error::Result;
use crate::release::Version;

/// Directory holding the built JSON pages of one language and version.
pub fn doc_root(build_root: &Path, lang: &str, version: &str) -> PathBuf {
    build_root.join(lang).join(version).join("_built").join("json")
}

/// The built page for `subpath` under `docroot`: `{subpath}/index.fjson`,
/// then `{subpath}.fjson`. `None` when neither file exists.
pub async fn doc_path(docroot: &Path, subpath: &str) -> Option<PathBuf> {
    let bits: Vec<&str> = subpath
        .split('/')
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .collect();

    let mut index = docroot.to_path_buf();
    for bit in &bits {
        index.push(bit);
    }
    index.push("index.fjson");
    if is_file(&index).await {
        return Some(index);
    }

    let (last, parents) = bits.split_last()?;
    let mut page = docroot.to_path_buf();
    for bit in parents {
        page.push(bit);
    }
    page.push(format!("{last}.fjson"));
    is_file(&page).await.then_some(page)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

/// Versions offered by the version switcher: every version directory of
/// `lang` that contains a built tree, oldest first, then `"dev"`.
pub async fn all_doc_versions(build_root: &Path, lang: &str) -> Result<Vec<String>> {
    let lang_root = build_root.join(lang);
    let mut found: Vec<(Version, String)> = Vec::new();

    let mut entries = match tokio::fs::read_dir(&lang_root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(vec![DEV_VERSION.to_string()]);
        }
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(version) = Version::parse(&name) else {
            continue;
        };
        if tokio::fs::metadata(doc_root(build_root, lang, &name))
            .await
            .is_ok_and(|m| m.is_dir())
        {
            found.push((version, name));
        }
    }

    found.sort();
    let mut versions: Vec<String> = found.into_iter().map(|(_, name)| name).collect();
    versions.push(DEV_VERSION.to_string());
    Ok(versions)
}
