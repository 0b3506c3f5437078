//! Collision-checked short code allocation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheKey, CacheService};
use crate::utils::code_generator::{
    generate_code, is_reserved_code, normalize_code, validate_custom_code,
};
use crate::utils::deadline::{Deadlines, cache_call, store_call};

/// Attempts made before giving up on random generation.
pub const MAX_GENERATION_ATTEMPTS: usize = 3;

/// Source of candidate codes.
pub trait CodeSource: Send + Sync {
    /// Draws a fresh candidate of `length` characters, already lowercase.
    fn draw(&self, length: usize) -> Result<String, getrandom::Error>;
}

/// Candidates from the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeSource;

impl CodeSource for RandomCodeSource {
    fn draw(&self, length: usize) -> Result<String, getrandom::Error> {
        generate_code(length)
    }
}

/// Hands out codes that are free in both the cache and the durable store.
///
/// A code counts as taken when any of these holds, checked cheapest first:
///
/// 1. the cache has a mapping for it
/// 2. the store has a row for it
/// 3. another creator already holds its reservation
///
/// Winning step 3 leaves a short-lived reservation in the cache, which the
/// caller releases once the durable write is done. If the cache is down the
/// cache steps are skipped and the store's unique index is the only guard.
pub struct CodeGenerator<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    source: Box<dyn CodeSource>,
    code_length: usize,
    reservation_ttl: std::time::Duration,
    deadlines: Deadlines,
}

impl<R: LinkRepository + ?Sized> CodeGenerator<R> {
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        code_length: usize,
        reservation_ttl: std::time::Duration,
        deadlines: Deadlines,
    ) -> Self {
        Self {
            repository,
            cache,
            source: Box::new(RandomCodeSource),
            code_length,
            reservation_ttl,
            deadlines,
        }
    }

    /// Replaces the entropy source.
    pub fn with_source(mut self, source: Box<dyn CodeSource>) -> Self {
        self.source = source;
        self
    }

    /// Draws random codes until one is claimed for `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeGenerationExhausted`] after
    /// [`MAX_GENERATION_ATTEMPTS`] collisions. Store failures during the check
    /// are returned as-is.
    pub async fn generate(&self, owner_id: &str) -> Result<String, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = match self.source.draw(self.code_length) {
                Ok(code) => code,
                Err(e) => {
                    warn!(attempt, error = %e, "Failed to draw short code");
                    continue;
                }
            };

            if !is_reserved_code(&code) && self.claim(&code, owner_id).await? {
                return Ok(code);
            }

            debug!(attempt, code = %code, "Generated short code collided");
        }

        Err(AppError::CodeGenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Validates, normalizes and claims a caller-chosen code.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidCode`] before any I/O if the code is malformed
    /// - [`AppError::CodeTaken`] if the code is in use or reserved
    pub async fn claim_custom(&self, raw: &str, owner_id: &str) -> Result<String, AppError> {
        validate_custom_code(raw)?;
        let code = normalize_code(raw);

        if self.claim(&code, owner_id).await? {
            Ok(code)
        } else {
            Err(AppError::CodeTaken(code))
        }
    }

    /// Two-stage existence check without reserving.
    pub async fn is_taken(&self, code: &str) -> Result<bool, AppError> {
        match cache_call(
            self.deadlines.cache,
            self.cache.exists(&CacheKey::url(code)),
        )
        .await
        {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => debug!(code, error = %e, "Cache existence check failed, asking store"),
        }

        store_call(self.deadlines.store, self.repository.exists_by_code(code)).await
    }

    /// Returns `true` if `code` is now reserved for `owner_id`.
    async fn claim(&self, code: &str, owner_id: &str) -> Result<bool, AppError> {
        if self.is_taken(code).await? {
            return Ok(false);
        }

        match cache_call(
            self.deadlines.cache,
            self.cache.set_if_absent(
                &CacheKey::reservation(code),
                owner_id,
                self.reservation_ttl,
            ),
        )
        .await
        {
            Ok(reserved) => Ok(reserved),
            Err(e) => {
                warn!(code, error = %e, "Cache reservation failed, relying on store uniqueness");
                Ok(true)
            }
        }
    }

    /// Drops the reservation taken by a successful claim.
    pub async fn release(&self, code: &str) {
        if let Err(e) = cache_call(
            self.deadlines.cache,
            self.cache.delete(&CacheKey::reservation(code)),
        )
        .await
        {
            debug!(code, error = %e, "Failed to release code reservation");
        }
    }
}
