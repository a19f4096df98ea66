use std::collections::HashSet;

use rand::RngCore;
use uuid::Uuid;

use crate::errors::GenerationError;

/// Default number of draws before a colliding identifier is treated as fatal.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

/// Source of random v4 identifiers that never repeats within one batch.
///
/// Identifiers are drawn from the batch RNG, so seeded batches reproduce the
/// same identifiers.
#[derive(Debug)]
pub struct UniqueIdSource {
    seen: HashSet<Uuid>,
    max_attempts: u32,
}

impl UniqueIdSource {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            seen: HashSet::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn with_capacity(capacity: usize, max_attempts: u32) -> Self {
        Self {
            seen: HashSet::with_capacity(capacity),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn next_id(&mut self, rng: &mut impl RngCore) -> Result<Uuid, GenerationError> {
        for _ in 0..self.max_attempts {
            let id = random_v4(rng);
            if self.seen.insert(id) {
                return Ok(id);
            }
        }
        Err(GenerationError::IdentifierExhausted {
            attempts: self.max_attempts,
        })
    }

    pub fn issued(&self) -> usize {
        self.seen.len()
    }
}

impl Default for UniqueIdSource {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

fn random_v4(rng: &mut impl RngCore) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}
