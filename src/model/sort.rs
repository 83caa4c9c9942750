use std::cmp::Ordering;

use crate::model::ImageEntry;

/// Column a listing is ordered by. Listings are always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Id,
    Name,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl SortKey {
    /// Resolve a raw `sort` query value. Unknown or empty values fall back to
    /// `UpdatedAt`.
    pub fn resolve(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_default()
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(SortKey::Id),
            "name" => Some(SortKey::Name),
            "created_at" | "createdAt" => Some(SortKey::CreatedAt),
            "updated_at" | "updatedAt" => Some(SortKey::UpdatedAt),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
        }
    }

    /// Ascending comparison of two entries on this key
    pub fn compare(self, a: &ImageEntry, b: &ImageEntry) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}
