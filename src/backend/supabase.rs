use anyhow::{anyhow, Result};
use reqwest::Client;
use url::Url;

use crate::backend::{Backend, TablePage, TableQuery};
use crate::config::Config;
use crate::quality::fingerprint_bytes;

/// PostgREST client for a hosted Supabase project. Read-only: every request
/// is a GET against `/rest/v1/{table}` with the anon key in both the
/// `apikey` and `Authorization` headers.
pub struct SupabaseRest {
    client: Client,
    base: String,
    anon_key: String,
}

impl SupabaseRest {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base: cfg.supabase_url.trim_end_matches('/').to_string(),
            anon_key: cfg.supabase_anon_key.clone(),
        })
    }

    fn table_url(&self, table: &str, query: &TableQuery) -> Result<Url> {
        if self.base.is_empty() {
            return Err(anyhow!("SUPABASE_URL is not set"));
        }
        let mut url = Url::parse(&format!("{}/rest/v1/{}", self.base, table))
            .map_err(|e| anyhow!("bad backend url for {}: {}", table, e))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", query.select.unwrap_or("*"));
            for (column, value) in &query.filters {
                pairs.append_pair(column, &format!("eq.{}", value));
            }
            if let Some((column, descending)) = &query.order {
                let dir = if *descending { "desc" } else { "asc" };
                pairs.append_pair("order", &format!("{}.{}", column, dir));
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Backend for SupabaseRest {
    async fn fetch_table(&self, table: &str, query: &TableQuery) -> Result<TablePage> {
        let url = self.table_url(table, query)?;
        let resp = self
            .client
            .get(url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            return Err(anyhow!(
                "{} fetch failed: {} - {}",
                table,
                status,
                String::from_utf8_lossy(&body)
            ));
        }

        let rows: Vec<serde_json::Value> = serde_json::from_slice(&body)
            .map_err(|e| anyhow!("{} returned non-array body: {}", table, e))?;

        Ok(TablePage {
            raw_len: body.len(),
            fingerprint: fingerprint_bytes(&body),
            rows,
        })
    }
}
