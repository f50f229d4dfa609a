//! Structured JSON-line logging.
//!
//! Every log entry is a single JSON object on stderr so the rendered reports
//! on stdout stay machine-separable from diagnostics. Level and domain
//! filtering come from the environment (`LOG_LEVEL`, `LOG_DOMAINS`).

use chrono::Utc;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("debug") => Level::Debug,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Log domains (categories for filtering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Fetch,     // Backend requests, row counts
    Cache,     // Query-cache hits and expiries
    Analytics, // Aggregation runs
    View,      // View builds, exports
    Quality,   // Dataset quality findings
    System,    // Startup, shutdown, refresh ticks
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Fetch => "fetch",
            Domain::Cache => "cache",
            Domain::Analytics => "analytics",
            Domain::View => "view",
            Domain::Quality => "quality",
            Domain::System => "system",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS is a comma-separated list, or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

pub fn ts_now() -> String {
    Utc::now().to_rfc3339()
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub fn v_bool(b: bool) -> Value {
    Value::Bool(b)
}

pub fn obj(fields: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in fields {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn json_log(domain: Domain, event: &str, fields: Map<String, Value>) {
    json_log_at(Level::Info, domain, event, fields);
}

pub fn json_log_at(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let mut entry = Map::new();
    entry.insert("ts".to_string(), Value::String(ts_now()));
    entry.insert("level".to_string(), Value::String(level.as_str().to_string()));
    entry.insert(
        "domain".to_string(),
        Value::String(domain.as_str().to_string()),
    );
    entry.insert("event".to_string(), Value::String(event.to_string()));
    for (k, v) in fields {
        entry.insert(k, v);
    }
    eprintln!("{}", Value::Object(entry));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_obj_preserves_fields() {
        let map = obj(&[("a", v_num(1.0)), ("b", v_str("x"))]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["b"], Value::String("x".to_string()));
    }

    #[test]
    fn test_v_num_rejects_nan() {
        assert_eq!(v_num(f64::NAN), Value::Null);
    }
}
