//! In-memory link storage.
//!
//! Lost on shutdown. Backs the integration tests and local experiments.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// An in-memory link store keyed by code.
///
/// Insertion goes through the map's entry API, so a code can only ever be
/// inserted once, matching the unique index of the SQL schema.
#[derive(Debug)]
pub struct MemoryLinkRepository {
    links: DashMap<String, ShortLink>,
    next_id: AtomicI64,
}

impl Default for MemoryLinkRepository {
    fn default() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::CodeTaken(new_link.code)),
            Entry::Vacant(vacant) => {
                let now = Utc::now();
                let link = ShortLink::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed),
                    new_link.code,
                    new_link.owner_id,
                    new_link.destination,
                    0,
                    now,
                    now,
                );
                vacant.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(code).map(|link| link.clone()))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(code))
    }

    async fn find_by_owner_paginated(
        &self,
        owner_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ShortLink>, i64), AppError> {
        let mut owned: Vec<ShortLink> = self
            .links
            .iter()
            .filter(|link| link.is_owned_by(owner_id))
            .map(|link| link.clone())
            .collect();

        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = owned.len() as i64;
        let offset = (page - 1).max(0).saturating_mul(page_size.max(0)) as usize;
        let items = owned
            .into_iter()
            .skip(offset)
            .take(page_size.max(0) as usize)
            .collect();

        Ok((items, total))
    }

    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
    ) -> Result<ShortLink, AppError> {
        let mut link = self.links.get_mut(code).ok_or(AppError::NotFound)?;
        link.destination = destination.to_string();
        link.updated_at = Utc::now();
        Ok(link.clone())
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        if let Some(mut link) = self.links.get_mut(code) {
            link.clicks += 1;
            link.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, code: &str, owner_id: &str) -> Result<bool, AppError> {
        Ok(self
            .links
            .remove_if(code, |_, link| link.is_owned_by(owner_id))
            .is_some())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
