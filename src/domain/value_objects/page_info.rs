use serde::{Deserialize, Serialize};

/// Upstream pagination metadata, the contract both the loader's peers and
/// the backup crawler depend on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub last_visible_page: u32,
    pub per_page: u32,
    /// Items on the current page.
    pub count: u32,
    /// Items across all pages.
    pub total_items: u64,
}

/// One upstream catalog page with its records kept verbatim, so the backup
/// store never loses fields the typed schema does not model.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub records: Vec<serde_json::Value>,
    pub pagination: Option<PageInfo>,
}
