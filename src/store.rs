//! Persistent store of operator-approved field variants.
//!
//! The store is an append-only knowledge base mapping (product code, field)
//! to the list of readings an operator has approved as acceptable alternate
//! forms. It is persisted as a single human-diffable JSON document; the
//! document on disk is the sole source of truth.
//!
//! Every mutation is a full read-modify-write of the document, serialized by
//! the store's internal mutex so that concurrent approvals (including a
//! reviewer approving while a pipeline run is in flight) cannot lose
//! updates. The replace itself goes through a temp file and an atomic
//! rename, so readers never observe a half-written document.

use crate::core::{InspectError, InspectResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// `product code → field name → approved variants`, in approval order.
type VariantMap = HashMap<String, HashMap<String, Vec<String>>>;

/// The variant knowledge base.
pub struct VariantStore {
    path: PathBuf,
    state: Mutex<VariantMap>,
}

impl VariantStore {
    /// Opens the store backed by the given document path.
    ///
    /// A missing document is an empty store; a document that exists but
    /// cannot be parsed is a configuration error; corrupt data is never
    /// silently discarded.
    pub fn open(path: impl Into<PathBuf>) -> InspectResult<Self> {
        let path = path.into();
        let state = read_document(&path)?;
        debug!(
            path = %path.display(),
            products = state.len(),
            "variant store opened"
        );
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Re-reads the persisted document, replacing the in-memory state.
    pub fn reload(&self) -> InspectResult<()> {
        let fresh = read_document(&self.path)?;
        *self.lock()? = fresh;
        Ok(())
    }

    /// The approved variants for a (product code, field) bucket, in
    /// approval order. Absent buckets are empty, never an error.
    pub fn variants_for(&self, product_code: &str, field: &str) -> Vec<String> {
        self.lock()
            .ok()
            .and_then(|state| {
                state
                    .get(product_code)
                    .and_then(|fields| fields.get(field))
                    .cloned()
            })
            .unwrap_or_default()
    }

    /// Inserts a variant into its bucket unless it is already present.
    ///
    /// Re-reads the persisted document under the store mutex before
    /// mutating, and persists only when the insert actually changed the
    /// state. Returns whether an insert happened.
    pub fn add_if_absent(
        &self,
        product_code: &str,
        field: &str,
        value: &str,
    ) -> InspectResult<bool> {
        let mut state = self.lock()?;
        *state = read_document(&self.path)?;

        let bucket = state
            .entry(product_code.to_string())
            .or_default()
            .entry(field.to_string())
            .or_default();
        if bucket.iter().any(|v| v == value) {
            return Ok(false);
        }
        bucket.push(value.to_string());

        persist(&self.path, &state)?;
        Ok(true)
    }

    /// Records a reviewer-approved reading as an acceptable variant.
    ///
    /// Entry point for the asynchronous manual-approval workflow; safe to
    /// call while pipeline runs are in flight.
    pub fn approve(&self, product_code: &str, field: &str, value: &str) -> InspectResult<bool> {
        let added = self.add_if_absent(product_code, field, value)?;
        if added {
            info!(product_code, field, value, "variant approved");
        }
        Ok(added)
    }

    fn lock(&self) -> InspectResult<std::sync::MutexGuard<'_, VariantMap>> {
        self.state
            .lock()
            .map_err(|_| InspectError::config("variant store lock poisoned"))
    }
}

fn read_document(path: &Path) -> InspectResult<VariantMap> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text).map_err(|source| InspectError::StoreCorrupt {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(VariantMap::new()),
        Err(e) => Err(e.into()),
    }
}

/// Writes the whole document atomically: temp file in the same directory,
/// then rename over the target.
fn persist(path: &Path, state: &VariantMap) -> InspectResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(state)
        .map_err(|e| InspectError::config(format!("serialize variant store: {e}")))?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
