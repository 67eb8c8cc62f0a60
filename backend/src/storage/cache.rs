//! Staleness-window cache over baby profile loads.
//!
//! Profile data changes rarely but is read on every screen, so loads go
//! through this cache: a hit inside the staleness window skips the
//! underlying store, anything older is re-fetched. The reference time is
//! passed in by the caller, which keeps staleness decisions deterministic
//! and testable. Mutations write through and invalidate.
//!
//! Caching lives here, outside the derivation engine: the engine only ever
//! sees already-loaded values.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::models::baby::Baby as DomainBaby;
use crate::storage::traits::BabyStorage;

/// Default staleness window
pub const DEFAULT_TTL_SECONDS: i64 = 300;

struct Slot {
    baby: DomainBaby,
    cached_at: DateTime<Utc>,
}

/// Read cache around a [`BabyStorage`] implementation.
pub struct CachedBabyStore<S: BabyStorage> {
    inner: S,
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot>>,
    list_slot: Mutex<Option<(Vec<DomainBaby>, DateTime<Utc>)>>,
}

impl<S: BabyStorage> CachedBabyStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, Duration::seconds(DEFAULT_TTL_SECONDS))
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            slots: Mutex::new(HashMap::new()),
            list_slot: Mutex::new(None),
        }
    }

    /// Load a baby, serving from cache while the cached copy is fresh
    /// relative to `now`.
    pub fn load_baby(&self, baby_id: &str, now: DateTime<Utc>) -> Result<Option<DomainBaby>> {
        {
            let slots = self.slots.lock().unwrap();
            if let Some(slot) = slots.get(baby_id) {
                if now - slot.cached_at < self.ttl {
                    debug!("Cache hit for {}", baby_id);
                    return Ok(Some(slot.baby.clone()));
                }
            }
        }

        let loaded = self.inner.get_baby(baby_id)?;
        if let Some(baby) = &loaded {
            let mut slots = self.slots.lock().unwrap();
            slots.insert(
                baby_id.to_string(),
                Slot {
                    baby: baby.clone(),
                    cached_at: now,
                },
            );
        }
        Ok(loaded)
    }

    /// Load the full baby list, cached as one unit
    pub fn load_babies(&self, now: DateTime<Utc>) -> Result<Vec<DomainBaby>> {
        {
            let list_slot = self.list_slot.lock().unwrap();
            if let Some((babies, cached_at)) = list_slot.as_ref() {
                if now - *cached_at < self.ttl {
                    debug!("Cache hit for baby list");
                    return Ok(babies.clone());
                }
            }
        }

        let babies = self.inner.list_babies()?;
        *self.list_slot.lock().unwrap() = Some((babies.clone(), now));
        Ok(babies)
    }

    /// Drop the cached copy of one baby (and the list, which contains it)
    pub fn invalidate(&self, baby_id: &str) {
        self.slots.lock().unwrap().remove(baby_id);
        *self.list_slot.lock().unwrap() = None;
        debug!("Invalidated cache for {}", baby_id);
    }

    /// Drop everything cached
    pub fn invalidate_all(&self) {
        self.slots.lock().unwrap().clear();
        *self.list_slot.lock().unwrap() = None;
        debug!("Invalidated baby cache");
    }

    /// Write through to the store and invalidate
    pub fn store_baby(&self, baby: &DomainBaby) -> Result<()> {
        self.inner.store_baby(baby)?;
        self.invalidate(&baby.id);
        Ok(())
    }

    /// Write through to the store and invalidate
    pub fn update_baby(&self, baby: &DomainBaby) -> Result<()> {
        self.inner.update_baby(baby)?;
        self.invalidate(&baby.id);
        Ok(())
    }

    /// Write through to the store and invalidate
    pub fn delete_baby(&self, baby_id: &str) -> Result<()> {
        self.inner.delete_baby(baby_id)?;
        self.invalidate(baby_id);
        Ok(())
    }
}
