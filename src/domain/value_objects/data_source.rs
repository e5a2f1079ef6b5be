use serde::{Deserialize, Serialize};

/// Configured routing strategy, re-read from the environment on every call
/// so runtime reconfiguration takes effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceMode {
    /// Serve from the in-memory catalog snapshot only.
    Primary,
    /// Always call the upstream API directly, bypassing the snapshot.
    External,
    /// Prefer the snapshot, fall back to upstream on failure.
    Hybrid,
}

impl DataSourceMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "primary" => Some(Self::Primary),
            "external" => Some(Self::External),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataSourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Primary => "primary",
            Self::External => "external",
            Self::Hybrid => "hybrid",
        };
        write!(f, "{}", name)
    }
}

/// The feed that actually answered a routed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Catalog,
    Upstream,
}

/// Routing outcome: the data plus which feed produced it and whether the
/// fallback path was taken. Router behavior is asserted on these fields
/// directly instead of on exception flow.
#[derive(Debug, Clone)]
pub struct Routed<T> {
    pub data: T,
    pub source: DataSource,
    pub fell_back: bool,
}

impl<T> Routed<T> {
    pub fn primary(data: T) -> Self {
        Self {
            data,
            source: DataSource::Catalog,
            fell_back: false,
        }
    }

    pub fn external(data: T, fell_back: bool) -> Self {
        Self {
            data,
            source: DataSource::Upstream,
            fell_back,
        }
    }
}

/// Snapshot of the currently resolved routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceInfo {
    pub mode: DataSourceMode,
    pub force_external: bool,
    pub configured_mode: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_modes_only() {
        assert_eq!(DataSourceMode::parse("Primary"), Some(DataSourceMode::Primary));
        assert_eq!(DataSourceMode::parse(" hybrid "), Some(DataSourceMode::Hybrid));
        assert_eq!(DataSourceMode::parse("mongodb"), None);
    }
}
