//! In-memory query cache.
//!
//! Entries are keyed by fixed table-name strings and expire on a TTL. The
//! engine is single-threaded per refresh, so there is no locking; a miss is
//! filled by the caller re-fetching.

use std::collections::HashMap;

use crate::backend::TablePage;
use crate::logging::{json_log_at, obj, v_num, v_str, Domain, Level};

struct Entry {
    fetched_ts: u64,
    page: TablePage,
}

pub struct QueryCache {
    ttl_secs: u64,
    entries: HashMap<&'static str, Entry>,
}

impl QueryCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl_secs,
            entries: HashMap::new(),
        }
    }

    /// Fresh entry for `key`, if one exists and has not expired.
    pub fn get(&self, key: &str, now_ts: u64) -> Option<&TablePage> {
        let entry = self.entries.get(key)?;
        if now_ts.saturating_sub(entry.fetched_ts) > self.ttl_secs {
            return None;
        }
        json_log_at(
            Level::Debug,
            Domain::Cache,
            "hit",
            obj(&[
                ("key", v_str(key)),
                ("age_secs", v_num(now_ts.saturating_sub(entry.fetched_ts) as f64)),
            ]),
        );
        Some(&entry.page)
    }

    pub fn put(&mut self, key: &'static str, now_ts: u64, page: TablePage) {
        self.entries.insert(key, Entry { fetched_ts: now_ts, page });
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
