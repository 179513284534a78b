//! Generic filter/sort engine for directory listings.
//!
//! A listing is computed from a slice of records and a [`Criteria`] set:
//!
//! 1. keyword filter: case-insensitive substring match against the record
//!    type's searchable fields ([`Listable::SEARCHABLE`]); any field matching
//!    is enough
//! 2. category filter: exact match against [`Listable::category`], disabled
//!    by the [`ALL`] sentinel
//! 3. an optional extra predicate supplied by the caller
//! 4. a stable sort by the selected [`SortKey`]
//!
//! The engine never mutates its input; it returns a new vector of references
//! into the source slice.
//!
//! # Example
//!
//! ```rust
//! use dabot_core::listing::{self, Criteria, Keyword, Selection};
//! use dabot_core::{StoreSort, catalog};
//!
//! let stores = catalog::sample_stores();
//! let criteria = Criteria {
//!     keyword: Keyword::parse("渋谷"),
//!     category: Selection::parse(Some("関東")),
//!     sort: StoreSort::YearDesc,
//! };
//!
//! let view = listing::filter_sort(&stores, &criteria);
//! assert!(view.iter().all(|s| s.area == "関東"));
//! ```

pub mod brands;
pub mod collate;
pub mod stores;
pub mod view;

use std::cmp::Ordering;

pub use brands::{BrandQuery, BrandSort};
pub use stores::{StoreQuery, StoreSort};
pub use view::{Completion, LoadState, RequestTicket, ViewState};

/// Sentinel value that disables a category filter.
pub const ALL: &str = "all";

/// Accessor for one textual field of a record.
pub type FieldAccessor<T> = fn(&T) -> &str;

/// A record type that can be listed by the engine.
pub trait Listable: Sized + 'static {
    /// Fields searched by the keyword filter.
    const SEARCHABLE: &'static [FieldAccessor<Self>];

    /// Value compared by the category filter (area for stores).
    fn category(&self) -> &str;
}

/// A sort order over records of type `T`.
pub trait SortKey<T> {
    /// Compare two records. Must be a total order for the sort to be
    /// deterministic.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// A non-blank search keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    raw: String,
    folded: String,
}

impl Keyword {
    /// Parse a keyword, returning `None` for empty or whitespace-only input.
    ///
    /// The keyword is not trimmed: `" shop"` only matches text containing a
    /// space before `shop`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        if input.trim().is_empty() {
            return None;
        }
        Some(Self {
            raw: input.to_owned(),
            folded: input.to_lowercase(),
        })
    }

    /// Parse an optional keyword, treating absence like blank input.
    #[must_use]
    pub fn parse_opt(input: Option<&str>) -> Option<Self> {
        input.and_then(Self::parse)
    }

    /// The keyword as the user typed it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `text` contains the keyword, ignoring case.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.folded)
    }

    /// Whether any searchable field of `record` contains the keyword.
    #[must_use]
    pub fn matches_record<T: Listable>(&self, record: &T) -> bool {
        T::SEARCHABLE
            .iter()
            .any(|field| self.matches(field(record)))
    }
}

/// A single-value filter selection with an "everything" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Filter disabled.
    #[default]
    All,
    /// Only records whose value equals this one exactly.
    Only(String),
}

impl Selection {
    /// Parse a selection. Absent, blank and [`ALL`] values disable the filter.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None => Self::All,
            Some(v) if v.trim().is_empty() || v == ALL => Self::All,
            Some(v) => Self::Only(v.to_owned()),
        }
    }

    /// Whether `value` passes this selection.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    /// The selection as a query-string value ([`ALL`] when disabled).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(v) => v,
        }
    }

    /// Returns the selected value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }
}

/// The criteria applied to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Criteria<S> {
    pub keyword: Option<Keyword>,
    pub category: Selection,
    pub sort: S,
}

/// Filter and sort `records` by `criteria`.
#[must_use]
pub fn filter_sort<'a, T, S>(records: &'a [T], criteria: &Criteria<S>) -> Vec<&'a T>
where
    T: Listable,
    S: SortKey<T>,
{
    filter_sort_with(records, criteria, |_| true)
}

/// Filter and sort `records` by `criteria` plus an extra predicate.
///
/// The extra predicate is applied after the keyword and category filters and
/// before sorting.
#[must_use]
pub fn filter_sort_with<'a, T, S, P>(
    records: &'a [T],
    criteria: &Criteria<S>,
    extra: P,
) -> Vec<&'a T>
where
    T: Listable,
    S: SortKey<T>,
    P: Fn(&T) -> bool,
{
    let mut view: Vec<&'a T> = records
        .iter()
        .filter(|record| {
            criteria
                .keyword
                .as_ref()
                .is_none_or(|keyword| keyword.matches_record(*record))
        })
        .filter(|record| criteria.category.matches(record.category()))
        .filter(|record| extra(record))
        .collect();

    // sort_by is stable, so equal keys keep input order
    view.sort_by(|a, b| criteria.sort.compare(a, b));
    view
}

/// Distinct category values in order of first appearance.
#[must_use]
pub fn categories<T: Listable>(records: &[T]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for record in records {
        let value = record.category();
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
