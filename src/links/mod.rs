//! Link handling: query stripping, extraction from campaign content, and
//! coarse classification.

mod extract;
mod strip;

pub use extract::{classify_link, extract_email_links, extract_sms_links};
pub use strip::{has_query_params, strip_query};
