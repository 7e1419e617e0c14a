//! Core data types shared by the resolver, the orchestrator and the API.

use serde::{Deserialize, Serialize};

/// Coarse classification of a call-to-action link, assigned at extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Donation,
    Petition,
    Event,
    Volunteer,
    #[default]
    #[serde(other)]
    Other,
}

/// One call-to-action URL owned by a campaign or SMS record.
///
/// `url` is what was extracted from the content and never changes. Only
/// `final_url` is written by unwrapping, and it never carries a query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(rename = "type", default)]
    pub link_type: LinkType,
}

impl Link {
    pub fn new(url: impl Into<String>, link_type: LinkType) -> Self {
        Self {
            url: url.into(),
            final_url: None,
            link_type,
        }
    }

    /// True while the link has not been meaningfully resolved: no final URL
    /// yet, or a final URL identical to the original.
    pub fn needs_unwrap(&self) -> bool {
        match &self.final_url {
            None => true,
            Some(final_url) => final_url == &self.url,
        }
    }
}

/// How a single hop's response was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectKind {
    /// 301 or 308 with a `Location` header
    Permanent,
    /// 302, 303 or 307 with a `Location` header
    Temporary,
    /// 2xx HTML page that redirects through a meta tag or script
    MetaRefresh,
    /// Anything that ends the chain normally
    Terminal,
    /// The request failed before a response arrived
    Error,
}

impl RedirectKind {
    pub fn is_redirect(self) -> bool {
        matches!(
            self,
            RedirectKind::Permanent | RedirectKind::Temporary | RedirectKind::MetaRefresh
        )
    }
}

/// One hop of a resolution trace. Produced per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectStep {
    /// 1-based position in the chain
    pub step_index: usize,
    pub requested_url: String,
    /// Absent when the request failed before a response
    pub status_code: Option<u16>,
    pub elapsed_millis: u64,
    pub redirect_kind: RedirectKind,
    /// Where this hop pointed next, for redirect kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Diagnostic note when the chain was aborted at this hop
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resume point between batch invocations. Held by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCursor {
    #[serde(default, alias = "lastEmailId")]
    pub last_processed_email_id: Option<String>,
    #[serde(default, alias = "lastSmsId")]
    pub last_processed_sms_id: Option<String>,
}

impl BatchCursor {
    pub fn start() -> Self {
        Self::default()
    }
}

/// Which table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Email,
    Sms,
}

impl ContentKind {
    pub(crate) fn table(self) -> &'static str {
        match self {
            ContentKind::Email => "campaigns",
            ContentKind::Sms => "sms_messages",
        }
    }

    /// Column reported as the human-readable identifying field in errors.
    pub(crate) fn identifying_column(self) -> &'static str {
        match self {
            ContentKind::Email => "subject",
            ContentKind::Sms => "phone_number",
        }
    }
}
