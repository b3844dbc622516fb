use std::sync::{Mutex, MutexGuard};

use crate::error::RelayError;

/// Ordered candidate models plus a shared cursor.
///
/// The cursor outlives individual requests: a model that failed for one
/// caller stays skipped for every later caller until rotation wraps back.
pub struct ModelRotor {
    models: Vec<String>,
    cursor: Mutex<usize>,
}

impl ModelRotor {
    pub fn new(models: Vec<String>) -> Result<Self, RelayError> {
        if models.is_empty() {
            return Err(RelayError::configuration("model list is empty"));
        }
        Ok(Self {
            models,
            cursor: Mutex::new(0),
        })
    }

    pub fn current(&self) -> String {
        let idx = self.lock();
        self.models[*idx].clone()
    }

    /// Moves the cursor one step forward (wrapping) and returns the new model.
    pub fn advance(&self) -> String {
        let mut idx = self.lock();
        *idx = (*idx + 1) % self.models.len();
        self.models[*idx].clone()
    }

    pub fn size(&self) -> usize {
        self.models.len()
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    // The guarded value is a plain index that is always written whole, so a
    // poisoned lock still holds a valid cursor.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.cursor.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
