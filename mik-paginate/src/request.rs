//! Binding pagination parameters from incoming requests.
//!
//! Both request types derive `Deserialize`, so they can be read straight
//! from a query string or JSON body and applied onto a config built by the
//! service. Values the client may not override (sorting, codec) stay on the
//! config.

use serde::Deserialize;

use crate::paginator::{CursorConfig, OffsetConfig};

/// Client-controlled cursor parameters.
///
/// ```
/// use mik_paginate::{CursorConfig, CursorRequest};
///
/// let json = r#"{"after": "ZGO8BD==", "limit": 3}"#;
/// let request: CursorRequest = serde_json::from_str(json).unwrap();
/// let base = CursorConfig::new().primary_sort("n", "asc").backup_sort("id", "asc");
/// let config = request.apply(base);
/// assert_eq!(config.after_token(), Some("ZGO8BD=="));
/// assert_eq!(config.page_size(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CursorRequest {
    /// Token of the page to resume after.
    pub after: Option<String>,
    /// Token of the page to resume before.
    pub before: Option<String>,
    /// Requested page size.
    #[serde(alias = "perPage", alias = "per_page")]
    pub limit: Option<i64>,
}

impl CursorRequest {
    /// Apply onto `config`. Absent fields leave the config untouched.
    pub fn apply(self, mut config: CursorConfig) -> CursorConfig {
        if let Some(after) = self.after {
            config = config.after(after);
        }
        if let Some(before) = self.before {
            config = config.before(before);
        }
        if let Some(limit) = self.limit {
            config = config.limit(limit);
        }
        config
    }
}

/// Client-controlled offset parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OffsetRequest {
    /// 1-based page index.
    pub page: Option<i64>,
    /// Rows per page.
    #[serde(alias = "perPage", alias = "limit")]
    pub per_page: Option<i64>,
}

impl OffsetRequest {
    /// Apply onto `config`. Absent fields leave the config untouched.
    pub fn apply(self, mut config: OffsetConfig) -> OffsetConfig {
        if let Some(page) = self.page {
            config = config.page(page);
        }
        if let Some(per_page) = self.per_page {
            config = config.per_page(per_page);
        }
        config
    }
}
