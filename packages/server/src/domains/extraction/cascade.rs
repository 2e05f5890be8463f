//! Ordered strategy cascade for field extraction.
//!
//! Strategies run in declaration order. The first one that yields a
//! value wins; a strategy error is logged and the cascade moves on.
//! A cascade itself never fails - an exhausted cascade is `None`.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// A value plus the name of the strategy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub method: &'static str,
}

#[async_trait]
pub trait ResolverStrategy<T>: Send + Sync {
    /// Short identifier recorded against the resolved value.
    fn method(&self) -> &'static str;

    /// Try to pull a value out of the text. `Ok(None)` means this
    /// strategy has nothing; `Err` means it broke and the next
    /// strategy should get a turn.
    async fn attempt(&self, text: &str) -> Result<Option<T>>;
}

pub struct Cascade<T> {
    field: &'static str,
    strategies: Vec<Box<dyn ResolverStrategy<T>>>,
}

impl<T> Cascade<T> {
    pub fn new(field: &'static str, strategies: Vec<Box<dyn ResolverStrategy<T>>>) -> Self {
        Self { field, strategies }
    }

    pub async fn resolve(&self, text: &str) -> Option<Resolved<T>> {
        for strategy in &self.strategies {
            match strategy.attempt(text).await {
                Ok(Some(value)) => {
                    debug!(field = self.field, method = strategy.method(), "field resolved");
                    return Some(Resolved {
                        value,
                        method: strategy.method(),
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        field = self.field,
                        method = strategy.method(),
                        error = %e,
                        "strategy failed, trying next"
                    );
                }
            }
        }
        debug!(field = self.field, "cascade exhausted");
        None
    }
}
