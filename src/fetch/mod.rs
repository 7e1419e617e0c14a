//! Link resolution over HTTP.
//!
//! - `redirects`: the hop-by-hop resolver and the [`ResolveLink`] seam
//! - `meta_refresh`: client-side redirect detection in HTML bodies
//! - `request`: browser-like request headers

mod meta_refresh;
mod redirects;
mod request;

pub use redirects::{parse_candidate, resolve_link, HttpResolver, ResolveLink, Resolution};
