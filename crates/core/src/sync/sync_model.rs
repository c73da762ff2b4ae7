use serde::{Deserialize, Serialize};

/// Result of an upsert: the stored record and whether it was newly inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upserted<T> {
    pub record: T,
    pub created: bool,
}

impl<T> Upserted<T> {
    pub fn created(record: T) -> Self {
        Self {
            record,
            created: true,
        }
    }

    pub fn updated(record: T) -> Self {
        Self {
            record,
            created: false,
        }
    }
}

/// Per-entity counts of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    /// Identifiers that could not be mirrored.
    pub failed: Vec<String>,
}

impl SyncSummary {
    pub fn record<T>(&mut self, upserted: &Upserted<T>) {
        if upserted.created {
            self.created += 1;
        } else {
            self.updated += 1;
        }
    }

    pub fn fail(&mut self, id: impl Into<String>) {
        self.failed.push(id.into());
    }

    pub fn total(&self) -> usize {
        self.created + self.updated + self.failed.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSyncSummary {
    pub plans: SyncSummary,
    pub add_ons: SyncSummary,
    pub discounts: SyncSummary,
}
