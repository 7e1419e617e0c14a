//! Record id and share-token generation.

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::config::{ID_RANDOM_SUFFIX_LENGTH, SHARE_TOKEN_LENGTH};

fn random_lowercase(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Generates a record id that sorts by creation time.
///
/// The id is the creation time in milliseconds as 12 hex digits followed by a
/// random suffix, so cursor pagination by id visits records oldest first.
pub fn new_record_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0);
    format!("{:012x}{}", millis, random_lowercase(ID_RANDOM_SUFFIX_LENGTH))
}

/// Generates an opaque share-link token.
pub fn new_share_token() -> String {
    random_lowercase(SHARE_TOKEN_LENGTH)
}
