//! Query-string stripping.
//!
//! Everything from the first `?` on is dropped. No parameter is ever kept:
//! tracking parameters routinely carry the recipient's address or number.

/// Removes the query string (and anything after it) from `url`.
pub fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(index) => &url[..index],
        None => url,
    }
}

/// True when `url` carries a query string.
pub fn has_query_params(url: &str) -> bool {
    url.contains('?')
}
