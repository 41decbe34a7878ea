use std::sync::{Arc, RwLock};

use domain::Discount;

use super::{DiscountPersistence, decode, encode};
use crate::error::PersistenceError;

/// Persistence kept in process memory.
///
/// Stores the encoded payload rather than the value so tests can plant
/// arbitrary stored data. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    slot: Arc<RwLock<Option<String>>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates persistence already holding `discount`.
    pub fn with_discount(discount: &Discount) -> Result<Self, PersistenceError> {
        let persistence = Self::new();
        persistence.save(Some(discount))?;
        Ok(persistence)
    }

    /// Returns the raw stored payload.
    pub fn raw(&self) -> Option<String> {
        self.slot.read().unwrap().clone()
    }

    /// Overwrites the raw stored payload.
    pub fn set_raw(&self, raw: Option<&str>) {
        *self.slot.write().unwrap() = raw.map(str::to_string);
    }
}

impl DiscountPersistence for InMemoryPersistence {
    fn load(&self) -> Option<Discount> {
        self.slot.read().unwrap().as_deref().and_then(decode)
    }

    fn save(&self, discount: Option<&Discount>) -> Result<(), PersistenceError> {
        let raw = discount.map(encode).transpose()?;
        *self.slot.write().unwrap() = raw;
        Ok(())
    }
}
