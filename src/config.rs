use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

/// Tags that must be present in every network-configuration file.
pub const MANDATORY_TAGS: [&str; 2] = ["NET_CFG_IFACE", "NET_CFG_BOOT_PROT"];

/// Tags that may be present. Any other NET_CFG_ key is rejected.
pub const OPTIONAL_TAGS: [&str; 8] = [
    "NET_CFG_IFACE_OPTS",
    "NET_CFG_SELF_IP",
    "NET_CFG_NETMASK",
    "NET_CFG_MAC_ADDR",
    "NET_CFG_GATEWAY_IP",
    "NET_CFG_DOMAINNAME",
    "NET_CFG_DNS_IP",
    "NET_CFG_NTP_IP",
];

const TAG_PREFIX: &str = "NET_CFG_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("network config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to read network config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line} in network config: `{text}`")]
    Parse { line: usize, text: String },

    #[error("unrecognized tag `{key}` on line {line}")]
    InvalidKey { key: String, line: usize },

    #[error("mandatory tag `{tag}` missing from network config")]
    MissingMandatory { tag: &'static str },
}

/// Validated network configuration: one value per recognized tag.
///
/// Built fresh for every invocation and never mutated afterwards. Consumers
/// only look tags up by name, so file order is irrelevant.
#[derive(Debug, Clone, Default)]
pub struct ConfigSet {
    entries: HashMap<String, String>,
}

impl ConfigSet {
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries.get(tag).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Recognized tags present in this set, sorted for stable output.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

fn is_known_tag(key: &str) -> bool {
    MANDATORY_TAGS.contains(&key) || OPTIONAL_TAGS.contains(&key)
}

/// Load and validate a network-configuration file.
pub fn load(path: &Path) -> Result<ConfigSet, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let cfg = parse(&content)?;
    debug!(path = %path.display(), tags = cfg.len(), "network config loaded");
    Ok(cfg)
}

/// Parse network-configuration text, line by line.
///
/// Grammar per non-blank line: `NET_CFG_<TAG> = <value> [# comment]`.
/// Blank and comment-only lines are skipped. Anything else that does not
/// start with the NET_CFG_ prefix is a hard error, not silently ignored.
/// A repeated tag overwrites the earlier value.
pub fn parse(content: &str) -> Result<ConfigSet, ConfigError> {
    let mut entries = HashMap::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let effective = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let effective = effective.trim();
        if effective.is_empty() {
            continue;
        }
        if !effective.starts_with(TAG_PREFIX) {
            return Err(ConfigError::Parse {
                line,
                text: raw.to_string(),
            });
        }
        // Exactly one `=` separates tag and value.
        let mut parts = effective.splitn(3, '=');
        let (key, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => (key.trim(), value.trim()),
            _ => {
                return Err(ConfigError::Parse {
                    line,
                    text: raw.to_string(),
                })
            }
        };
        if !is_known_tag(key) {
            return Err(ConfigError::InvalidKey {
                key: key.to_string(),
                line,
            });
        }
        entries.insert(key.to_string(), value.to_string());
    }

    for tag in MANDATORY_TAGS {
        if !entries.contains_key(tag) {
            return Err(ConfigError::MissingMandatory { tag });
        }
    }

    Ok(ConfigSet { entries })
}
