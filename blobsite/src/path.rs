//! Canonical lookup keys for site resources.
//!
//! Every key stored in or looked up from the [`ResourceRegistry`] goes through
//! [`normalize`] first. The canonical form is:
//!
//! - exactly one leading `/`
//! - no trailing `/` unless the whole path is the root `/`
//! - no query string and no fragment
//!
//! Percent-encoding and letter case are preserved as given.
//!
//! [`ResourceRegistry`]: crate::registry::ResourceRegistry

use url::Url;

/// The root path. Never reduced any further.
pub const ROOT_PATH: &str = "/";

/// Canonicalizes a full URL or a bare path into a registry key.
///
/// Full URLs (a scheme that `url` can parse on its own, with a hierarchical
/// path) keep only their path component. Everything else is a bare path and
/// has any `?query` or `#fragment` suffix cut off by hand, so a colon in a
/// file name such as `about:team.html` stays part of the key.
///
/// # Example
///
/// ```
/// use blobsite::path::normalize;
///
/// assert_eq!(normalize("https://site.test/app.js?v=2"), "/app.js");
/// assert_eq!(normalize("docs/"), "/docs");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(input: &str) -> String {
    let raw_path = match Url::parse(input) {
        Ok(url) if !url.cannot_be_a_base() => url.path().to_string(),
        _ => strip_suffixes(input).to_string(),
    };

    let trimmed = raw_path.trim_start_matches('/');
    let mut path = String::with_capacity(trimmed.len() + 1);
    path.push('/');
    path.push_str(trimmed);

    // Collapse every trailing separator so a second pass is a no-op.
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    path
}

/// Cuts a bare path at the first `?` or `#`.
fn strip_suffixes(input: &str) -> &str {
    match input.find(['?', '#']) {
        Some(idx) => &input[..idx],
        None => input,
    }
}
