// storage/mod.rs
// Database operations module

pub mod migrations;
pub mod pending;
pub mod pool;
pub mod records;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use migrations::run_migrations;
pub use pending::{
    count_pending, find_link_record, load_pending_page, save_link_updates, LinkRecord, LinkUpdate,
};
pub use pool::init_db_pool_with_path;
pub use records::{
    get_campaign, get_sms, insert_campaign, insert_share_link, insert_sms, record_exists,
    Campaign, ShareLink, ShareTarget, SmsMessage,
};
