//! Query identity and the parameters handed to the fetch collaborator.

use super::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// Explicit sort key plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field name to sort by (`_id` sorts by identity).
    pub key: String,
    /// Direction.
    pub order: SortOrder,
}

impl SortSpec {
    /// Ascending sort on `key`.
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            order: SortOrder::Asc,
        }
    }

    /// Descending sort on `key`.
    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            order: SortOrder::Desc,
        }
    }

    /// Next state of a column sort toggle: none → asc → desc → none.
    pub fn cycle(current: Option<&SortSpec>, key: &str) -> Option<SortSpec> {
        match current {
            Some(spec) if spec.key == key && spec.order == SortOrder::Asc => Some(Self::desc(key)),
            Some(spec) if spec.key == key => None,
            _ => Some(Self::asc(key)),
        }
    }
}

/// Identity of one logical paginated result set.
///
/// Two identities are equal iff every component is equal. Any change
/// invalidates the cursor and cached pages of the previous identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryIdentity {
    /// Settled (debounced) search text.
    pub search_text: String,
    /// Field the search text filters on.
    pub filter_field: String,
    /// Explicit sort, if any.
    pub sort: Option<SortSpec>,
}

impl QueryIdentity {
    /// Unfiltered, unsorted identity on the given filter field.
    pub fn new(filter_field: impl Into<String>) -> Self {
        Self {
            search_text: String::new(),
            filter_field: filter_field.into(),
            sort: None,
        }
    }

    /// Same identity with different search text.
    pub fn with_search(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = search_text.into();
        self
    }

    /// Same identity with a different sort.
    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// Parameters sent to the fetch collaborator.
    ///
    /// The field filter is omitted entirely when the search text is empty.
    pub fn params(&self) -> QueryParams {
        let filter = if self.search_text.is_empty() {
            None
        } else {
            Some(FieldFilter {
                field: self.filter_field.clone(),
                value: self.search_text.clone(),
            })
        };
        QueryParams {
            filter,
            sort: self.sort.clone(),
        }
    }
}

impl fmt::Display for QueryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{:?}", self.filter_field, self.search_text)?;
        if let Some(sort) = &self.sort {
            write!(f, " by {} {:?}", sort.key, sort.order)?;
        }
        Ok(())
    }
}

/// `field contains value` filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    /// Field to match on.
    pub field: String,
    /// Text the field must contain.
    pub value: String,
}

impl FieldFilter {
    /// Case-insensitive substring match against the record field.
    pub fn matches(&self, record: &Record) -> bool {
        record
            .field_text(&self.field)
            .to_lowercase()
            .contains(&self.value.to_lowercase())
    }
}

/// Query parameters as seen by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryParams {
    /// Optional field filter.
    pub filter: Option<FieldFilter>,
    /// Optional sort.
    pub sort: Option<SortSpec>,
}

/// Canonical ordering of records.
///
/// Ascending by identity unless a sort key is supplied; ties on the sort key
/// are broken by ascending identity so ordering is deterministic across
/// re-fetches. Numeric values compare numerically and sort before text.
pub fn compare_records(a: &Record, b: &Record, sort: Option<&SortSpec>) -> Ordering {
    let Some(spec) = sort else {
        return a.id().cmp(b.id());
    };

    let primary = compare_field_text(&a.field_text(&spec.key), &b.field_text(&spec.key));
    let primary = match spec.order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };

    primary.then_with(|| a.id().cmp(b.id()))
}

// Numbers sort before text so the order stays total on mixed columns
fn compare_field_text(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_differ_when_any_component_differs() {
        let base = QueryIdentity::new("_id");
        assert_eq!(base, QueryIdentity::new("_id"));
        assert_ne!(base, base.clone().with_search("ab"));
        assert_ne!(base, QueryIdentity::new("badgeType"));
        assert_ne!(base, base.clone().with_sort(Some(SortSpec::asc("_id"))));
        assert_ne!(
            base.clone().with_sort(Some(SortSpec::asc("_id"))),
            base.with_sort(Some(SortSpec::desc("_id")))
        );
    }

    #[test]
    fn params_omit_filter_for_empty_search() {
        let params = QueryIdentity::new("badgeType").params();
        assert_eq!(params.filter, None);
    }

    #[test]
    fn params_include_filter_for_non_empty_search() {
        let params = QueryIdentity::new("badgeType").with_search("emp").params();
        assert_eq!(
            params.filter,
            Some(FieldFilter {
                field: "badgeType".to_string(),
                value: "emp".to_string()
            })
        );
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let filter = FieldFilter {
            field: "owner".to_string(),
            value: "ADA".to_string(),
        };
        assert!(filter.matches(&Record::new(1u64).with_field("owner", "Ada Lovelace")));
        assert!(!filter.matches(&Record::new(2u64).with_field("owner", "Grace")));
    }

    #[test]
    fn default_ordering_is_by_identity() {
        let a = Record::new(2u64).with_field("name", "a");
        let b = Record::new(1u64).with_field("name", "b");
        assert_eq!(compare_records(&a, &b, None), Ordering::Greater);
    }

    #[test]
    fn sort_key_ties_are_broken_by_identity() {
        let a = Record::new(2u64).with_field("type", "Employee");
        let b = Record::new(1u64).with_field("type", "Employee");
        let spec = SortSpec::desc("type");
        assert_eq!(compare_records(&a, &b, Some(&spec)), Ordering::Greater);
    }

    #[test]
    fn numeric_field_values_compare_numerically() {
        let a = Record::new(1u64).with_field("ownerId", "9");
        let b = Record::new(2u64).with_field("ownerId", "10");
        let spec = SortSpec::asc("ownerId");
        assert_eq!(compare_records(&a, &b, Some(&spec)), Ordering::Less);
    }

    #[test]
    fn numbers_sort_before_text_on_mixed_fields() {
        let spec = SortSpec::asc("v");
        let nine = Record::new(1u64).with_field("v", "9");
        let ten = Record::new(2u64).with_field("v", "10");
        let text = Record::new(3u64).with_field("v", "1a");
        assert_eq!(compare_records(&nine, &ten, Some(&spec)), Ordering::Less);
        assert_eq!(compare_records(&ten, &text, Some(&spec)), Ordering::Less);
        assert_eq!(compare_records(&nine, &text, Some(&spec)), Ordering::Less);
    }

    #[test]
    fn nan_has_a_fixed_place_among_numbers() {
        let spec = SortSpec::asc("v");
        let nan = Record::new(1u64).with_field("v", "NaN");
        let two = Record::new(2u64).with_field("v", "2");
        assert_eq!(compare_records(&two, &nan, Some(&spec)), Ordering::Less);
        assert_eq!(compare_records(&nan, &two, Some(&spec)), Ordering::Greater);
    }

    #[test]
    fn sort_cycle_goes_none_asc_desc_none() {
        let asc = SortSpec::cycle(None, "name");
        assert_eq!(asc, Some(SortSpec::asc("name")));
        let desc = SortSpec::cycle(asc.as_ref(), "name");
        assert_eq!(desc, Some(SortSpec::desc("name")));
        assert_eq!(SortSpec::cycle(desc.as_ref(), "name"), None);
    }

    #[test]
    fn sort_cycle_on_other_key_restarts_ascending() {
        let current = SortSpec::desc("name");
        assert_eq!(
            SortSpec::cycle(Some(&current), "type"),
            Some(SortSpec::asc("type"))
        );
    }
}
