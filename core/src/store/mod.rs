//! Record store: an ordered, fully-persisted collection of warranty records
//! with create, filtered-read, update, and delete operations.
//!
//! The store exclusively owns the collection and its slot; the presentation
//! layer only ever holds the draft it is composing. Editing is a two-phase
//! operation (`begin_edit` then `commit_edit`) with at most one active
//! session.

use crate::backend::error::BackendError;
use crate::backend::{self, FileSlot, MemorySlot, Slot};
use crate::filter::{self, FilterQuery};
use crate::types::{Config, Draft, FieldName, Record, RecordId};
use error::StoreError;
use std::time::SystemTime;
use tracing::{debug, warn};

pub mod error {
    use crate::backend::error::BackendError;
    use crate::types::{RecordId, UnknownEstado};
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StoreError {
        /// Some required field is empty. Deliberately coarse: callers only
        /// learn that a field is missing, not which one.
        #[error("some required field is empty")]
        MissingRequiredField,

        #[error("record not found: {0}")]
        NotFound(RecordId),

        #[error("no active edit session")]
        NoActiveEdit,

        #[error(transparent)]
        UnknownEstado(#[from] UnknownEstado),

        #[error("backend error: {0}")]
        Backend(#[from] BackendError),
    }
}

pub struct RecordStore<S: Slot> {
    slot: S,
    records: Vec<Record>,
    draft: Draft,
    edit_target: Option<RecordId>,
}

/// Lifecycle.
impl<S: Slot> RecordStore<S> {
    /// Opens a store over the given slot, reading the persisted collection
    /// once. A missing slot, an unreadable slot, or an undecodable blob all
    /// yield an empty collection rather than an error.
    pub fn open(slot: S) -> Self {
        let records = match slot.read() {
            Ok(Some(blob)) => backend::decode(&blob).unwrap_or_else(|| {
                warn!("undecodable record collection, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "failed to read record slot, starting empty");
                Vec::new()
            }
        };

        Self {
            slot,
            records,
            draft: Draft::new(),
            edit_target: None,
        }
    }

    /// Consumes the store, returning its slot. Reopening over the returned
    /// slot reloads the same collection.
    pub fn into_slot(self) -> S {
        self.slot
    }
}

impl RecordStore<FileSlot> {
    /// Opens the store over the records file in the configured data
    /// directory.
    pub fn open_in(config: &Config) -> Self {
        Self::open(FileSlot::new(config.records_path()))
    }
}

impl RecordStore<MemorySlot> {
    /// A fresh, empty, in-memory store.
    pub fn in_memory() -> Self {
        Self::open(MemorySlot::new())
    }
}

/// Read operations.
impl<S: Slot> RecordStore<S> {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Case-insensitive substring filter over one field, in insertion order.
    /// Records whose value for the field is empty never match.
    pub fn filter<'a>(
        &'a self,
        query: &FilterQuery,
    ) -> impl Iterator<Item = &'a Record> + use<'a, S> {
        filter::apply(&self.records, query)
    }
}

/// Create operations.
impl<S: Slot> RecordStore<S> {
    /// Validates and appends a new record.
    ///
    /// Every field in `Draft::REQUIRED` must be non-empty. On success the
    /// record gets a fresh unique id, `fecha_del_dia` is set to the current
    /// date, the store draft is cleared, and the whole collection is
    /// persisted.
    pub fn add(&mut self, candidate: Draft, now: SystemTime) -> Result<Record, StoreError> {
        if candidate.missing_required() {
            return Err(StoreError::MissingRequiredField);
        }

        let id = self.next_id(now);
        let record = candidate.into_record(id, now);
        self.records.push(record.clone());
        self.draft = Draft::new();
        self.persist()?;

        debug!(%id, "record added");
        Ok(record)
    }

    /// Next free id: the creation timestamp in milliseconds, bumped past any
    /// id already in the collection.
    fn next_id(&self, now: SystemTime) -> RecordId {
        let mut id = RecordId::from_timestamp(now);
        while self.records.iter().any(|r| r.id == id) {
            id = id.next();
        }
        id
    }
}

/// Edit-session operations. At most one record is editable at a time.
impl<S: Slot> RecordStore<S> {
    /// Starts editing `id`, copying the record into the draft.
    ///
    /// Starting a new session while another is active discards the unsaved
    /// draft without warning. Callers that want to prompt first can check
    /// `edit_target` before calling.
    pub fn begin_edit(&mut self, id: RecordId) -> Result<&Record, StoreError> {
        let record = self
            .records
            .iter()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(previous) = self.edit_target {
            debug!(%previous, "discarding unsaved edit draft");
        }

        self.draft = Draft::from_record(record);
        self.edit_target = Some(id);
        Ok(record)
    }

    /// Merges one field into the draft, uppercased unless it is `estado`.
    pub fn update_draft_field(&mut self, field: FieldName, value: &str) -> Result<(), StoreError> {
        self.draft.set(field, value)?;
        Ok(())
    }

    /// Writes the draft back onto the edit target in place and persists.
    ///
    /// Fields absent from the draft keep their previous value; the id and
    /// registration date are never touched. Required fields are not
    /// re-checked on commit.
    pub fn commit_edit(&mut self) -> Result<Record, StoreError> {
        let id = self.edit_target.ok_or(StoreError::NoActiveEdit)?;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        self.draft.apply_to(record);
        let committed = record.clone();

        self.draft = Draft::new();
        self.edit_target = None;
        self.persist()?;

        debug!(%id, "edit committed");
        Ok(committed)
    }

    /// Abandons the active edit session, if any.
    pub fn cancel_edit(&mut self) {
        self.draft = Draft::new();
        self.edit_target = None;
    }

    pub fn edit_target(&self) -> Option<RecordId> {
        self.edit_target
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Takes the composed draft, leaving an empty one. Used by the
    /// presentation layer to hand a new-record draft to `add`.
    pub fn take_draft(&mut self) -> Draft {
        std::mem::take(&mut self.draft)
    }
}

/// Delete operations.
impl<S: Slot> RecordStore<S> {
    /// Removes a record permanently. There is no undo and no soft delete;
    /// the destructive-action confirmation belongs to the presentation
    /// layer. An edit session targeting the record is cancelled.
    pub fn remove(&mut self, id: RecordId) -> Result<(), StoreError> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        self.records.remove(pos);
        if self.edit_target == Some(id) {
            self.cancel_edit();
        }
        self.persist()?;

        debug!(%id, "record removed");
        Ok(())
    }
}

/// Persistence. The whole collection is re-serialized after every mutation;
/// a failed write surfaces to the caller but the in-memory mutation stands.
impl<S: Slot> RecordStore<S> {
    fn persist(&mut self) -> Result<(), BackendError> {
        let blob = backend::encode(&self.records)?;
        self.slot.write(&blob)
    }
}

#[cfg(test)]
mod tests;
