//! In-memory record source.

use super::RecordSource;
use crate::model::{compare_records, FetchError, FetchResponse, QueryParams, Record};
use std::thread;
use std::time::Duration;
use tracing::trace;

/// Serves pages from a fixed record list.
///
/// Filters with a case-insensitive substring match on the filter field and
/// orders with [`compare_records`], so results match what a backing service
/// with the same semantics would return.
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: Vec<Record>,
    page_size: usize,
    latency: Duration,
}

impl MemorySource {
    /// Create a source returning `page_size` records per fetch (at least 1).
    pub fn new(records: Vec<Record>, page_size: usize) -> Self {
        Self {
            records,
            page_size: page_size.max(1),
            latency: Duration::ZERO,
        }
    }

    /// Sleep this long before answering each fetch.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Records per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the source holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for MemorySource {
    fn fetch(&self, offset: usize, params: &QueryParams) -> Result<FetchResponse, FetchError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let mut matching: Vec<&Record> = self
            .records
            .iter()
            .filter(|record| params.filter.as_ref().is_none_or(|f| f.matches(record)))
            .collect();
        matching.sort_by(|a, b| compare_records(a, b, params.sort.as_ref()));

        let documents: Vec<Record> = matching
            .iter()
            .skip(offset)
            .take(self.page_size)
            .map(|record| (*record).clone())
            .collect();

        trace!(offset, returned = documents.len(), count = matching.len(), "Served page");

        Ok(FetchResponse {
            documents,
            count: matching.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldFilter, RecordId, SortSpec};

    fn groups() -> Vec<Record> {
        vec![
            Record::new(3u64).with_field("badgeType", "Contractor"),
            Record::new(1u64).with_field("badgeType", "Employee"),
            Record::new(2u64).with_field("badgeType", "employee"),
            Record::new(4u64).with_field("badgeType", "Visitor"),
        ]
    }

    fn ids(response: &FetchResponse) -> Vec<RecordId> {
        response.documents.iter().map(|r| r.id().clone()).collect()
    }

    #[test]
    fn pages_in_identity_order_by_default() {
        let source = MemorySource::new(groups(), 2);
        let first = source.fetch(0, &QueryParams::default()).unwrap();
        let second = source.fetch(2, &QueryParams::default()).unwrap();

        assert_eq!(ids(&first), vec![RecordId::from(1u64), RecordId::from(2u64)]);
        assert_eq!(ids(&second), vec![RecordId::from(3u64), RecordId::from(4u64)]);
        assert_eq!(first.count, 4);
    }

    #[test]
    fn offset_past_end_returns_empty_page_with_count() {
        let source = MemorySource::new(groups(), 2);
        let page = source.fetch(10, &QueryParams::default()).unwrap();
        assert!(page.documents.is_empty());
        assert_eq!(page.count, 4);
    }

    #[test]
    fn filter_is_case_insensitive_substring_and_count_reflects_it() {
        let source = MemorySource::new(groups(), 10);
        let params = QueryParams {
            filter: Some(FieldFilter {
                field: "badgeType".to_string(),
                value: "EMP".to_string(),
            }),
            sort: None,
        };
        let page = source.fetch(0, &params).unwrap();
        assert_eq!(ids(&page), vec![RecordId::from(1u64), RecordId::from(2u64)]);
        assert_eq!(page.count, 2);
    }

    #[test]
    fn sort_spec_orders_results() {
        let source = MemorySource::new(groups(), 10);
        let params = QueryParams {
            filter: None,
            sort: Some(SortSpec::desc("badgeType")),
        };
        let page = source.fetch(0, &params).unwrap();
        // Byte order puts lowercase after uppercase: employee, Visitor, Employee, Contractor
        assert_eq!(page.documents[0].id(), &RecordId::from(2u64));
        assert_eq!(page.documents[3].id(), &RecordId::from(3u64));
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        assert_eq!(MemorySource::new(groups(), 0).page_size(), 1);
    }
}
