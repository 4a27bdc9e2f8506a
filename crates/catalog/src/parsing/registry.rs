//! Global parser registry (spec §9): a name→factory table populated by an
//! explicit registration call at startup, not built-in parser discovery.

use async_trait::async_trait;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use super::item::ParsedSupplierItem;
use crate::error::{CatalogError, Result};

/// A parser reads a source described by an opaque JSON config and produces
/// parsed items. Parsers never touch the database.
#[async_trait]
pub trait ParserInterface: Send + Sync {
    async fn parse(&self, config: &JsonValue) -> Result<Vec<ParsedSupplierItem>>;

    /// Validates `config` without parsing; returns an error describing what
    /// is wrong rather than a bare `false`.
    fn validate_config(&self, config: &JsonValue) -> Result<()>;

    fn name(&self) -> &'static str;
}

static REGISTRY: Lazy<DashMap<String, Arc<dyn ParserInterface>>> = Lazy::new(DashMap::new);

/// Process-global registry facade. Registration happens once at startup
/// (spec §9: "registration is an explicit call, not built-in discovery").
pub struct ParserRegistry;

impl ParserRegistry {
    pub fn register(parser: Arc<dyn ParserInterface>) -> Result<()> {
        let name = parser.name().to_string();
        if REGISTRY.contains_key(&name) {
            return Err(CatalogError::parser(format!("parser '{name}' is already registered")));
        }
        REGISTRY.insert(name, parser);
        Ok(())
    }

    pub fn get(parser_type: &str) -> Result<Arc<dyn ParserInterface>> {
        REGISTRY.get(parser_type).map(|p| p.clone()).ok_or_else(|| {
            let available = Self::list_registered().join(", ");
            CatalogError::parser(format!(
                "no parser registered for '{parser_type}'; available: [{available}]"
            ))
        })
    }

    pub fn list_registered() -> Vec<String> {
        let mut names: Vec<String> = REGISTRY.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoopParser;

    #[async_trait]
    impl ParserInterface for NoopParser {
        async fn parse(&self, _config: &JsonValue) -> Result<Vec<ParsedSupplierItem>> {
            Ok(Vec::new())
        }

        fn validate_config(&self, _config: &JsonValue) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "test_noop"
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let _ = ParserRegistry::register(Arc::new(NoopParser));
        let second = ParserRegistry::register(Arc::new(NoopParser));
        assert!(second.is_err());
    }

    #[test]
    fn unknown_parser_lookup_names_available_parsers() {
        let err = ParserRegistry::get("does_not_exist").unwrap_err();
        assert!(err.to_string().contains("available"));
    }
}
