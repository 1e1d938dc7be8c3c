//! In-memory record collections.
//!
//! Every CRUD page in the portal runs on a [`Collection`] of some
//! [`Record`] type. The record type supplies what differs per entity
//! (searchable fields, validation, where new rows go, what blocks a
//! delete); the collection supplies the operations.

pub mod validation;

use schoolcom_core::{IdGenerator, RecordId};
use thiserror::Error;

pub use validation::{FieldError, FieldErrorKind, FormFields, ValidationErrors};

/// Where `create` inserts a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Append,
    Prepend,
}

/// An entity stored in a [`Collection`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Input for create and update.
    type Draft: Send;

    /// Insert position for new records.
    const PLACEMENT: Placement = Placement::Append;

    fn id(&self) -> &RecordId;

    /// Field values a search term is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Report every problem with a draft.
    ///
    /// # Errors
    ///
    /// Returns all field errors found.
    fn validate(draft: &Self::Draft) -> Result<(), ValidationErrors>;

    /// Build a new record from a draft that passed `validate`.
    ///
    /// # Errors
    ///
    /// Returns the field error for a required value the draft lacks.
    fn from_draft(id: RecordId, draft: Self::Draft) -> Result<Self, ValidationErrors>;

    /// Overwrite the draft's fields, keeping the id and managed fields.
    ///
    /// # Errors
    ///
    /// Returns the field error for a required value the draft lacks.
    fn apply(&mut self, draft: Self::Draft) -> Result<(), ValidationErrors>;

    /// Translation key of the reason this record cannot be deleted, if any.
    fn delete_blocker(&self) -> Option<&'static str> {
        None
    }
}

/// Errors from collection operations.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("record {0} not found")]
    NotFound(RecordId),

    /// Carries the translation key of the reason.
    #[error("precondition failed: {0}")]
    Precondition(&'static str),
}

/// An ordered, in-memory set of records.
#[derive(Debug, Default)]
pub struct Collection<T> {
    items: Vec<T>,
    ids: IdGenerator,
}

impl<T: Record> Collection<T> {
    #[must_use]
    pub fn seeded(items: Vec<T>) -> Self {
        Self {
            items,
            ids: IdGenerator::new(),
        }
    }

    #[must_use]
    pub fn all(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: &RecordId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Records with any search field containing `term`, ignoring case.
    ///
    /// A blank term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&T> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| {
                item.search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Validate and insert a new record with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Validation` if the draft is invalid.
    pub fn create(&mut self, draft: T::Draft) -> Result<&T, RecordError> {
        T::validate(&draft)?;
        let record = T::from_draft(self.ids.next_id(), draft)?;
        let id = record.id().clone();
        match T::PLACEMENT {
            Placement::Append => self.items.push(record),
            Placement::Prepend => self.items.insert(0, record),
        }
        self.get(&id).ok_or(RecordError::NotFound(id))
    }

    /// Validate and apply a draft to an existing record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Validation` or `RecordError::NotFound`.
    pub fn update(&mut self, id: &RecordId, draft: T::Draft) -> Result<&T, RecordError> {
        T::validate(&draft)?;
        let record = self
            .get_mut(id)
            .ok_or_else(|| RecordError::NotFound(id.clone()))?;
        record.apply(draft)?;
        Ok(&*record)
    }

    /// Remove a record unless it reports a delete blocker.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotFound` or `RecordError::Precondition`.
    pub fn delete(&mut self, id: &RecordId) -> Result<T, RecordError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| RecordError::NotFound(id.clone()))?;
        if let Some(reason) = self.items.get(index).and_then(Record::delete_blocker) {
            return Err(RecordError::Precondition(reason));
        }
        Ok(self.items.remove(index))
    }
}
