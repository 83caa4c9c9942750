use crate::model::{ImageEntry, NewImageEntry};

/// A field of an existing entry that an upsert is allowed to overwrite.
/// `id` is never listed; it is the identity of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdatableField {
    Name,
    Tags,
}

impl UpdatableField {
    pub fn column(self) -> &'static str {
        match self {
            UpdatableField::Name => "name",
            UpdatableField::Tags => "tags",
        }
    }
}

/// The set of fields an upsert copies onto an entry that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatableFields(&'static [UpdatableField]);

impl UpdatableFields {
    /// Existing entries only ever get their tag set replaced
    pub const TAGS_ONLY: UpdatableFields = UpdatableFields(&[UpdatableField::Tags]);

    pub const fn new(fields: &'static [UpdatableField]) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &'static [UpdatableField] {
        self.0
    }

    pub fn contains(&self, field: UpdatableField) -> bool {
        self.0.contains(&field)
    }

    /// Pick the values from `candidate` that may be written over an existing entry.
    pub fn assignment_for(&self, candidate: &NewImageEntry) -> Assignment {
        Assignment {
            name: self
                .contains(UpdatableField::Name)
                .then(|| candidate.name.clone()),
            tags: self
                .contains(UpdatableField::Tags)
                .then(|| candidate.tags.clone()),
        }
    }
}

impl Default for UpdatableFields {
    fn default() -> Self {
        Self::TAGS_ONLY
    }
}

/// Values to write onto an entry that already exists. `None` leaves the
/// stored value untouched; `Some` replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Assignment {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.tags.is_none()
    }

    /// Apply to an in-memory entry. Timestamps are the caller's concern.
    pub fn apply(self, entry: &mut ImageEntry) {
        if let Some(name) = self.name {
            entry.name = name;
        }
        if let Some(tags) = self.tags {
            entry.tags = tags;
        }
    }
}
