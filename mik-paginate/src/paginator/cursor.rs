//! Keyset ("cursor") pagination.
//!
//! A page is addressed by the sort key of a boundary row. `after` resumes
//! strictly after that row, `before` strictly before it. The main query
//! fetches one page; two single-row probes decide whether neighbouring pages
//! exist without fetching them.
//!
//! Backward scans run the query with both sort directions inverted, so the
//! rows nearest the boundary come first, and then flip the page back into
//! logical order.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::keyset::{KeysetCondition, Motion};
use super::{Items, Page, Paginator};
use crate::error::{ConfigError, PaginationError};
use crate::query::{Query, Row, Value};
use crate::result::PaginationResult;
use crate::sort::{IntoSortDirection, SortSpec, Sorting};
use crate::token::{ObfuscatedCodec, PageToken, PlainCodec, TokenCodec};

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Rewrites a boundary key pair before it is bound to a query.
///
/// Runs on decoded tokens and on probe anchors alike. Typical use is type
/// coercion when stored and external representations differ.
pub type KeysProcessor = Arc<dyn Fn(Value, Value) -> (Value, Value) + Send + Sync>;

/// Immutable cursor pagination settings.
///
/// # Example
///
/// ```
/// use mik_paginate::{CursorConfig, MemoryQuery, Row, paginate_cursor};
///
/// let query = MemoryQuery::new((1..=11).map(|i: i64| {
///     Row::new().with("uniqueCol", i).with("nonUniqueCol", i + i % 2)
/// }));
///
/// let config = CursorConfig::new()
///     .primary_sort("nonUniqueCol", "asc")
///     .backup_sort("uniqueCol", "asc")
///     .limit(3)
///     .encode_tokens(false);
///
/// let first = paginate_cursor(&query, &config).unwrap();
/// assert_eq!(first.result.next().map(String::as_str), Some("4|3"));
///
/// let second = paginate_cursor(&query, &config.after("4|3")).unwrap();
/// assert_eq!(second.result.previous().map(String::as_str), Some("4|4"));
/// assert_eq!(second.result.next().map(String::as_str), Some("6|6"));
/// ```
#[derive(Clone)]
pub struct CursorConfig {
    sorting: Sorting,
    after: Option<String>,
    before: Option<String>,
    limit: u64,
    reverse_results: bool,
    codec: Arc<dyn TokenCodec>,
    keys_processor: Option<KeysProcessor>,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            sorting: Sorting::default(),
            after: None,
            before: None,
            limit: DEFAULT_PER_PAGE,
            reverse_results: false,
            codec: Arc::new(ObfuscatedCodec),
            keys_processor: None,
        }
    }
}

impl fmt::Debug for CursorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorConfig")
            .field("sorting", &self.sorting)
            .field("after", &self.after)
            .field("before", &self.before)
            .field("limit", &self.limit)
            .field("reverse_results", &self.reverse_results)
            .field("codec", &self.codec)
            .field("keys_processor", &self.keys_processor.is_some())
            .finish()
    }
}

impl CursorConfig {
    /// Defaults: 20 rows per page, obfuscated tokens, no boundary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary sort column.
    pub fn primary_sort(
        mut self,
        column: impl Into<String>,
        direction: impl IntoSortDirection,
    ) -> Self {
        self.sorting = self.sorting.primary(column, direction);
        self
    }

    /// Set the tie-breaking sort column. Must be unique for stable pages.
    pub fn backup_sort(
        mut self,
        column: impl Into<String>,
        direction: impl IntoSortDirection,
    ) -> Self {
        self.sorting = self.sorting.backup(column, direction);
        self
    }

    /// Resume after this token. An empty token means "from the start".
    pub fn after(mut self, token: impl Into<String>) -> Self {
        self.after = non_empty(token.into());
        self
    }

    /// Resume before this token; takes precedence over [`after`](Self::after).
    pub fn before(mut self, token: impl Into<String>) -> Self {
        self.before = non_empty(token.into());
        self
    }

    /// Page size. Non-positive values keep the current size.
    pub fn limit(mut self, limit: i64) -> Self {
        if let Ok(limit @ 1..) = u64::try_from(limit) {
            self.limit = limit;
        }
        self
    }

    /// Expose rows in the opposite order. Tokens are unaffected.
    pub fn reverse_results(mut self) -> Self {
        self.reverse_results = true;
        self
    }

    /// `true` (default) selects [`ObfuscatedCodec`], `false` selects
    /// [`PlainCodec`] so tokens read as `primary|backup`.
    pub fn encode_tokens(mut self, encode: bool) -> Self {
        self.codec = if encode {
            Arc::new(ObfuscatedCodec)
        } else {
            Arc::new(PlainCodec)
        };
        self
    }

    /// Use a custom token codec.
    pub fn codec(mut self, codec: impl TokenCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Rewrite boundary key pairs before they reach the query.
    pub fn keys_processor(
        mut self,
        processor: impl Fn(Value, Value) -> (Value, Value) + Send + Sync + 'static,
    ) -> Self {
        self.keys_processor = Some(Arc::new(processor));
        self
    }

    /// Sort configuration.
    pub const fn sorting(&self) -> &Sorting {
        &self.sorting
    }

    /// Configured page size.
    pub const fn page_size(&self) -> u64 {
        self.limit
    }

    /// The `after` token, if set.
    pub fn after_token(&self) -> Option<&str> {
        self.after.as_deref()
    }

    /// The `before` token, if set.
    pub fn before_token(&self) -> Option<&str> {
        self.before.as_deref()
    }

    /// Active token and scan direction: `before` wins over `after`.
    fn boundary(&self) -> (Option<&str>, Motion) {
        match (&self.before, &self.after) {
            (Some(before), _) => (Some(before), Motion::Backward),
            (None, Some(after)) => (Some(after), Motion::Forward),
            (None, None) => (None, Motion::Forward),
        }
    }

    fn process(&self, keys: (Value, Value)) -> (Value, Value) {
        match &self.keys_processor {
            Some(processor) => processor(keys.0, keys.1),
            None => keys,
        }
    }
}

fn non_empty(token: String) -> Option<String> {
    (!token.is_empty()).then_some(token)
}

fn key_of(row: &Row, spec: &SortSpec) -> Result<Value, ConfigError> {
    row.get(spec.column())
        .cloned()
        .ok_or_else(|| ConfigError::MissingSortColumn(spec.column().to_string()))
}

/// Fetch one cursor page from `query`.
///
/// `query` is cloned for the main fetch and for each probe; it is never
/// modified. Configuration and token errors are reported before any query
/// runs.
pub fn paginate_cursor<Q: Query>(
    query: &Q,
    config: &CursorConfig,
) -> Result<Page<String>, PaginationError<Q::Error>> {
    let primary = config.sorting.primary_spec()?;
    let backup = config
        .sorting
        .backup_spec()?
        .ok_or(ConfigError::MissingBackupSort)?;

    let (current, motion) = config.boundary();
    debug!(
        target: "mik_paginate::cursor",
        direction = motion.as_str(),
        limit = config.limit,
        has_token = current.is_some(),
        "fetching cursor page"
    );

    let boundary = match current.map(|token| PageToken::decode(token, config.codec.as_ref())) {
        Some(Ok(token)) => Some(token),
        Some(Err(err)) => {
            debug!(target: "mik_paginate::cursor", error = %err, "rejected page token");
            return Err(err.into());
        }
        None => None,
    };

    let condition = KeysetCondition::new(primary, backup, motion);
    let mut main = query.clone();
    if let Some(token) = boundary {
        condition.constrain(&mut main, config.process(token.into_parts()));
    }
    condition.order(&mut main);
    main.set_limit(Some(config.limit));

    let mut rows = main.execute().map_err(PaginationError::Execution)?;
    if motion == Motion::Backward {
        // scanned nearest-first; restore logical order
        rows.reverse();
    }

    let (previous, next) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => {
            let previous = neighbour(query, config, primary, backup, first, Motion::Backward)?;
            let next = neighbour(query, config, primary, backup, last, Motion::Forward)?;
            (previous, next)
        }
        _ => (None, None),
    };

    if config.reverse_results {
        rows.reverse();
    }

    let result = PaginationResult::new(rows.len(), previous, current.map(str::to_string), next);
    debug!(
        target: "mik_paginate::cursor",
        count = result.results_count(),
        has_previous = result.has_previous(),
        has_next = result.has_next(),
        "cursor page fetched"
    );

    Ok(Page {
        result,
        items: rows,
    })
}

/// Token for the page beyond `anchor` in `motion`, if that page has rows.
fn neighbour<Q: Query>(
    query: &Q,
    config: &CursorConfig,
    primary: &SortSpec,
    backup: &SortSpec,
    anchor: &Row,
    motion: Motion,
) -> Result<Option<String>, PaginationError<Q::Error>> {
    let keys = (key_of(anchor, primary)?, key_of(anchor, backup)?);
    let token = PageToken::new(keys.0.clone(), keys.1.clone());

    let condition = KeysetCondition::new(primary, backup, motion);
    let mut probe = query.clone();
    condition.constrain(&mut probe, config.process(keys));
    condition.order(&mut probe);
    probe.set_limit(Some(1));

    trace!(
        target: "mik_paginate::cursor",
        direction = motion.as_str(),
        anchor = %token,
        "probing for adjacent page"
    );
    let found = !probe.execute().map_err(PaginationError::Execution)?.is_empty();

    Ok(found.then(|| token.encode(config.codec.as_ref())))
}

/// Stateful cursor paginator over a base query.
///
/// ```
/// use mik_paginate::{CursorConfig, CursorPaginator, MemoryQuery, Paginator, Row};
///
/// let query = MemoryQuery::new((1..=5).map(|i: i64| Row::new().with("id", i).with("rank", i)));
/// let mut paginator = CursorPaginator::new(
///     query,
///     CursorConfig::new().primary_sort("rank", "desc").backup_sort("id", "desc").limit(2),
/// );
///
/// let result = paginator.paginate().unwrap();
/// assert_eq!(result.results_count(), 2);
/// assert!(result.has_next());
/// assert_eq!(paginator.items().count(), 2);
/// ```
#[derive(Debug)]
pub struct CursorPaginator<Q> {
    query: Q,
    config: CursorConfig,
    items: Vec<Row>,
}

impl<Q: Query> CursorPaginator<Q> {
    /// Wrap a base query.
    pub const fn new(query: Q, config: CursorConfig) -> Self {
        Self {
            query,
            config,
            items: Vec::new(),
        }
    }

    /// Current configuration.
    pub const fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Replace the configuration for the next call.
    pub fn set_config(&mut self, config: CursorConfig) {
        self.config = config;
    }

    /// The base query.
    pub const fn query(&self) -> &Q {
        &self.query
    }
}

impl<Q: Query> Paginator for CursorPaginator<Q> {
    type Position = String;
    type Error = Q::Error;

    fn paginate(&mut self) -> Result<PaginationResult<String>, PaginationError<Q::Error>> {
        let (result, items) = paginate_cursor(&self.query, &self.config)?.into_parts();
        self.items = items;
        Ok(result)
    }

    fn items(&self) -> Items<'_> {
        self.items.iter()
    }

    fn take_items(&mut self) -> Vec<Row> {
        std::mem::take(&mut self.items)
    }
}
