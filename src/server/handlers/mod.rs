//! API server HTTP handlers.

mod content;
mod status;
mod unwrap;

pub use content::{
    create_campaign_handler, create_share_link_handler, create_sms_handler, get_campaign_handler,
    get_sms_handler,
};
pub use status::status_handler;
pub use unwrap::{batch_handler, record_handler, test_url_handler};
