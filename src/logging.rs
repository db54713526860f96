//! Structured JSON-line event logging for the fetch pipeline.
//!
//! One JSON object per line on stdout: timestamp, level, module, free-form
//! fields. Level comes from `LOG_LEVEL`, module filtering from `LOG_MODULES`
//! (comma-separated list or "all").

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

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

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

fn module_enabled(module: &str) -> bool {
    match std::env::var("LOG_MODULES").as_deref() {
        Ok("all") | Err(_) => true,
        Ok(modules) => modules.split(',').any(|m| m.trim() == module),
    }
}

pub fn ts_now() -> String {
    Utc::now().to_rfc3339()
}

/// Emit one event line if its level and module pass the filters.
pub fn log(level: Level, module: &str, event: &str, mut fields: Map<String, Value>) {
    if level < Level::from_env() || !module_enabled(module) {
        return;
    }
    fields.insert("ts".into(), Value::String(ts_now()));
    fields.insert("seq".into(), Value::from(next_seq()));
    fields.insert("level".into(), Value::String(level.as_str().into()));
    fields.insert("module".into(), Value::String(module.into()));
    fields.insert("event".into(), Value::String(event.into()));
    println!("{}", Value::Object(fields));
}

pub fn json_log(module: &str, event: &str, fields: Map<String, Value>) {
    log(Level::Info, module, event, fields);
}

pub fn warn_log(module: &str, event: &str, fields: Map<String, Value>) {
    log(Level::Warn, module, event, fields);
}

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut m = Map::new();
    for (k, v) in pairs {
        m.insert((*k).to_string(), v.clone());
    }
    m
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
