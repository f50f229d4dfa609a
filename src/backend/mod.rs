use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::Config;

mod supabase;

pub use supabase::SupabaseRest;

pub const T_OCCUPATIONS: &str = "occupations";
pub const T_CASES: &str = "workforce_reskilling_cases";
pub const T_EVENTS: &str = "workforce_reskilling_events";
pub const T_PROFILES: &str = "employee_profile";
pub const T_JOB_RISK: &str = "job_risk";

pub const CANONICAL_TABLES: [&str; 5] = [T_OCCUPATIONS, T_CASES, T_EVENTS, T_PROFILES, T_JOB_RISK];

#[derive(Clone, Copy, Debug)]
pub enum BackendKind {
    Supabase,
}

impl BackendKind {
    pub fn from_env() -> Self {
        // Single hosted backend today; the enum keeps the seam the views
        // program against.
        BackendKind::Supabase
    }

    pub fn build(self, cfg: &Config) -> Result<Box<dyn Backend + Send + Sync>> {
        match self {
            BackendKind::Supabase => Ok(Box::new(SupabaseRest::new(cfg)?)),
        }
    }
}

/// Read-only query shape: select columns, optional equality filters, optional
/// order and limit. No pagination.
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub select: Option<&'static str>,
    pub filters: Vec<(String, String)>,
    pub order: Option<(String, bool)>, // (column, descending)
    pub limit: Option<u32>,
}

impl TableQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &'static str) -> Self {
        self.select = Some(columns);
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some((column.to_string(), false));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some((column.to_string(), true));
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }
}

/// One fetched table page: undecoded rows plus a fingerprint of the raw body.
#[derive(Debug, Clone, Default)]
pub struct TablePage {
    pub rows: Vec<serde_json::Value>,
    pub raw_len: usize,
    pub fingerprint: String,
}

#[async_trait]
pub trait Backend {
    async fn fetch_table(&self, table: &str, query: &TableQuery) -> Result<TablePage>;
}

/// Decode a fetched page row-by-row. Rows that do not match the expected
/// shape are skipped and counted, never fatal.
pub fn decode_rows<T: DeserializeOwned>(page: &TablePage) -> (Vec<T>, u64) {
    let mut rows = Vec::with_capacity(page.rows.len());
    let mut bad = 0u64;
    for raw in &page.rows {
        match serde_json::from_value::<T>(raw.clone()) {
            Ok(row) => rows.push(row),
            Err(_) => bad += 1,
        }
    }
    (rows, bad)
}
