//! Request path resolution against an optional base URL.

use url::Url;

use crate::clients::errors::RestError;
use crate::clients::http_request::QueryParams;
use crate::config::BaseUrl;

/// Ensures a base URL string ends with exactly one trailing `/`.
///
/// Without the trailing slash, standard URL resolution would replace the last
/// path segment of the base instead of appending to it.
#[must_use]
pub fn normalize_base(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

/// Resolves a request path into an absolute URL.
///
/// Exactly one leading `/` is stripped from `path`, so `/users` and `users`
/// resolve identically. With a base URL, the path is joined onto it using
/// standard URL resolution (query and fragment in `path` survive). Without
/// one, `path` must itself be an absolute URL.
///
/// # Errors
///
/// Returns [`RestError::InvalidUrl`] if the result is not a valid URL.
///
/// # Example
///
/// ```rust
/// use rest_api::{resolve_url, BaseUrl};
///
/// let base = BaseUrl::new("https://api.example.com/v1").unwrap();
/// let url = resolve_url("/users", Some(&base)).unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/v1/users");
///
/// assert!(resolve_url("users", None).is_err());
/// ```
pub fn resolve_url(path: &str, base: Option<&BaseUrl>) -> Result<Url, RestError> {
    let relative = path.strip_prefix('/').unwrap_or(path);

    let resolved = match base {
        Some(base) => base.as_url().join(relative),
        None => Url::parse(relative),
    };

    resolved.map_err(|source| RestError::InvalidUrl {
        url: path.to_string(),
        source,
    })
}

/// Appends every parameter onto the URL's own query string.
///
/// Values already present in the URL are kept; parameters are additive and
/// never replace existing entries.
pub fn append_params(url: &mut Url, params: &QueryParams) {
    if params.is_empty() {
        return;
    }
    let mut pairs = url.query_pairs_mut();
    for (name, value) in params {
        pairs.append_pair(name, value);
    }
}
