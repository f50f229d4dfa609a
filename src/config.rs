use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Comma-separated view slugs, or "all".
    pub views: String,
    /// 0 renders once and exits; otherwise re-fetch and re-render on this cadence.
    pub refresh_secs: u64,
    pub cache_ttl_secs: u64,
    pub min_headcount: u64,
    pub default_success_rate: f64,
    pub budget_cut_pct: f64,
    pub completion_target: f64,
    pub top_roles: usize,
    pub fetch_limit: Option<u32>,
    pub export_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            supabase_url: env::var("SUPABASE_URL").unwrap_or_default(),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or_default(),
            views: env::var("VIEWS").unwrap_or_else(|_| "all".to_string()),
            refresh_secs: env::var("REFRESH_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(0),
            cache_ttl_secs: env::var("CACHE_TTL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(300),
            min_headcount: env::var("MIN_HEADCOUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(5),
            default_success_rate: env::var("DEFAULT_SUCCESS_RATE").ok().and_then(|v| v.parse().ok()).unwrap_or(70.0),
            budget_cut_pct: env::var("BUDGET_CUT_PCT").ok().and_then(|v| v.parse().ok()).unwrap_or(0.30),
            completion_target: env::var("COMPLETION_TARGET").ok().and_then(|v| v.parse().ok()).unwrap_or(80.0),
            top_roles: env::var("TOP_ROLES").ok().and_then(|v| v.parse().ok()).unwrap_or(7),
            fetch_limit: env::var("FETCH_LIMIT").ok().and_then(|v| v.parse().ok()),
            export_dir: env::var("EXPORT_DIR").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Seconds until the next refresh boundary, aligned to the cadence.
    pub fn sleep_until_next_refresh(&self, now_ts: u64) -> u64 {
        if self.refresh_secs == 0 {
            return 0;
        }
        let next = ((now_ts / self.refresh_secs) + 1) * self.refresh_secs;
        next.saturating_sub(now_ts)
    }
}

pub fn now_ts() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_alignment() {
        let mut cfg = Config::from_env();
        cfg.refresh_secs = 300;
        assert_eq!(cfg.sleep_until_next_refresh(600), 300);
        assert_eq!(cfg.sleep_until_next_refresh(601), 299);
        assert_eq!(cfg.sleep_until_next_refresh(899), 1);
    }

    #[test]
    fn test_one_shot_never_sleeps() {
        let mut cfg = Config::from_env();
        cfg.refresh_secs = 0;
        assert_eq!(cfg.sleep_until_next_refresh(12345), 0);
    }
}
