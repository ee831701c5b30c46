//! Deterministic target filenames derived from source URLs

use std::path::{Path, PathBuf};

/// Separator substituted for `/` in derived filenames
pub const PATH_DELIMITER: char = '-';

/// Derives a stable filename stem from a URL
///
/// The scheme prefix is dropped and every path separator becomes
/// [`PATH_DELIMITER`], so the same URL always maps to the same name.
/// Distinct URLs may collide (e.g. `a/b` and `a-b`); callers decide what
/// to do about that.
///
/// # Examples
///
/// ```
/// use link_harvest::job::file_stem_for_url;
///
/// assert_eq!(
///     file_stem_for_url("https://example.com/blog/post"),
///     "example.com-blog-post"
/// );
/// ```
pub fn file_stem_for_url(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    without_scheme
        .chars()
        .map(|c| if c == '/' || c == '\\' { PATH_DELIMITER } else { c })
        .collect()
}

/// Full target path for a URL inside `output_dir`
pub fn target_path_for_url(output_dir: &Path, url: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", file_stem_for_url(url), extension))
}
