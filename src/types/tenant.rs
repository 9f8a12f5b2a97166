use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an isolated tenant context.
///
/// Always trimmed, lowercased and non-empty, so the same tenant reached through a
/// header or a host name maps to the same storage row and cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(String);

impl TenantId {
    /// Returns `None` when the raw value is blank.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_ascii_lowercase()))
    }

    /// Tenant named by the first DNS label of a host name (`acme.example.com` -> `acme`).
    /// Any `:port` suffix is ignored.
    pub fn from_host(host: &str) -> Option<Self> {
        let hostname = host.split(':').next().unwrap_or_default();
        let label = hostname.split('.').next().unwrap_or_default();
        Self::parse(label)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_blank_values() {
        assert!(TenantId::parse("").is_none());
        assert!(TenantId::parse("   ").is_none());
    }

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let tenant = TenantId::parse("  Acme ").expect("tenant");
        assert_eq!(tenant.as_str(), "acme");
    }

    #[test]
    fn from_host_uses_first_label_without_port() {
        let tenant = TenantId::from_host("Acme.example.com:8000").expect("tenant");
        assert_eq!(tenant.as_str(), "acme");
        assert_eq!(TenantId::from_host("localhost").expect("tenant").as_str(), "localhost");
        assert!(TenantId::from_host(":8000").is_none());
    }
}
