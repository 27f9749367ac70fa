// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::config::SearchConfig;
use crate::errors::FieldResult;
use crate::field::FiniteField;
use crate::numbertheory::prime_power;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Cache of built fields keyed by order.
///
/// Extension fields are built on top of the registry's own prime field, so all
/// fields of one characteristic share a base instance and its memo tables.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    config: SearchConfig,
    fields: Mutex<HashMap<u64, Arc<FiniteField>>>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            fields: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Return GF(order), building it and its base field on first use.
    pub fn get(&self, order: u64) -> FieldResult<Arc<FiniteField>> {
        if let Some(field) = self.cached(order) {
            return Ok(field);
        }
        let (p, m) = prime_power(order)?;
        let field = if m == 1 {
            FiniteField::prime_with_config(p, self.config)?
        } else {
            let base = self.get(p)?;
            FiniteField::extension_of(base, m, self.config)?
        };
        debug!("registered {}", field);
        let mut fields = self.fields.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(fields.entry(order).or_insert(field).clone())
    }

    pub fn contains(&self, order: u64) -> bool {
        self.cached(order).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, order: u64) -> Option<Arc<FiniteField>> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&order)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldError;

    #[test]
    fn test_registry_reuses_fields() {
        let registry = FieldRegistry::new();
        assert!(registry.is_empty());
        let gf8 = registry.get(8).unwrap();
        assert!(registry.contains(2));
        assert!(registry.contains(8));
        assert_eq!(registry.len(), 2);

        let again = registry.get(8).unwrap();
        assert!(Arc::ptr_eq(&gf8, &again));
        let base = registry.get(2).unwrap();
        assert!(Arc::ptr_eq(gf8.base().unwrap(), &base));
    }

    #[test]
    fn test_registry_rejects_bad_orders() {
        let registry = FieldRegistry::new();
        assert!(matches!(
            registry.get(12),
            Err(FieldError::InvalidFieldOrder { order: 12, .. })
        ));
        assert!(registry.is_empty());
    }
}
