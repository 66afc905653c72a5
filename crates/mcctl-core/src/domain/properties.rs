//! Subset of `server.properties` shown to operators.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Values read from the server's `server.properties`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProperties {
    entries: HashMap<String, String>,
}

impl ServerProperties {
    /// Parse Java properties text.
    ///
    /// Supports `key=value` and `key:value` pairs, `#` and `!` comments and
    /// blank lines. Line continuations and unicode escapes are not handled.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .filter_map(|line| {
                let split = line.find(['=', ':'])?;
                let key = line[..split].trim();
                let value = line[split + 1..].trim();
                (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Query port, used to build the auto-detected access point.
    pub fn query_port(&self) -> Option<u16> {
        self.get("query.port").and_then(|p| p.parse().ok())
    }

    pub fn difficulty(&self) -> Option<&str> {
        self.get("difficulty")
    }

    pub fn gamemode(&self) -> Option<&str> {
        self.get("gamemode")
    }

    pub fn hardcore(&self) -> Option<bool> {
        self.get("hardcore").and_then(|v| v.parse().ok())
    }
}
