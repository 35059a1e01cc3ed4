//! Process-lifetime weighted variant selector
//!
//! One random source is seeded once and shared by every draw.

#![allow(clippy::result_large_err)]

use lander_core::model::Variant;
use lander_core::selection::select_weighted;
use lander_store::errors::Result;
use lander_store::repo::VariantRepo;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rusqlite::Connection;

#[derive(Debug)]
pub struct VariantSelector {
    rng: Mutex<StdRng>,
}

impl VariantSelector {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic selector for tests and reproducible previews
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Draw one active variant
    ///
    /// The lock only covers the draw, not the store read.
    ///
    /// # Errors
    /// `NoActiveVariants` when nothing is active; `Persistence` on store failure.
    pub fn select(&self, conn: &Connection) -> Result<Variant> {
        let active = VariantRepo::list_active(conn)?;
        let mut rng = self.rng.lock();
        select_weighted(&active, &mut *rng).cloned()
    }
}

impl Default for VariantSelector {
    fn default() -> Self {
        Self::from_entropy()
    }
}
