//! Tests for FetchCursor state transitions.

use super::*;
use crate::model::FetchResponse;

fn cursor() -> FetchCursor {
    FetchCursor::new(QueryIdentity::new("_id"), Generation::new(1))
}

fn response(ids: std::ops::Range<u64>, count: usize) -> FetchResponse {
    FetchResponse {
        documents: ids.map(Record::new).collect(),
        count,
    }
}

/// Request the next page and complete it with ids `offset..offset+len`.
fn fetch_and_complete(cursor: &mut FetchCursor, len: u64, total: usize) -> CompletionOutcome {
    let request = cursor.fetch_next_page().expect("request should be issued");
    let start = request.offset() as u64;
    cursor.complete(request.ticket, Ok(response(start..start + len, total)))
}

mod fetching {
    use super::*;

    #[test]
    fn new_cursor_is_idle_with_unknown_total() {
        let cursor = cursor();
        assert_eq!(cursor.status(), &FetchStatus::Idle);
        assert_eq!(cursor.total_count(), None);
        assert_eq!(cursor.next_offset(), 0);
        assert!(!cursor.has_more());
    }

    #[test]
    fn first_fetch_requests_offset_zero_and_enters_fetching() {
        let mut cursor = cursor();
        let request = cursor.fetch_next_page().unwrap();
        assert_eq!(request.offset(), 0);
        assert_eq!(request.ticket.generation, Generation::new(1));
        assert!(cursor.is_fetching());
    }

    #[test]
    fn fetch_while_fetching_is_noop() {
        let mut cursor = cursor();
        assert!(cursor.fetch_next_page().is_some());
        assert!(cursor.fetch_next_page().is_none());
        assert!(cursor.fetch_next_page().is_none());
    }

    #[test]
    fn request_carries_identity_params() {
        let mut cursor = FetchCursor::new(
            QueryIdentity::new("badgeType").with_search("emp"),
            Generation::new(9),
        );
        let request = cursor.fetch_next_page().unwrap();
        assert_eq!(request.params.filter.unwrap().value, "emp");
    }
}

mod completion {
    use super::*;

    #[test]
    fn success_appends_page_and_advances_offset() {
        let mut cursor = cursor();
        let outcome = fetch_and_complete(&mut cursor, 10, 25);

        assert_eq!(
            outcome,
            CompletionOutcome::Applied {
                offset: 0,
                len: 10,
                total_count: 25
            }
        );
        assert_eq!(cursor.status(), &FetchStatus::Fetched);
        assert_eq!(cursor.next_offset(), 10);
        assert_eq!(cursor.total_count(), Some(25));
        assert_eq!(cursor.pages().len(), 1);
        assert!(cursor.has_more());
    }

    #[test]
    fn pages_stop_when_total_reached() {
        let mut cursor = cursor();
        fetch_and_complete(&mut cursor, 10, 25);
        fetch_and_complete(&mut cursor, 10, 25);
        fetch_and_complete(&mut cursor, 5, 25);

        let offsets: Vec<_> = cursor.pages().iter().map(|p| p.offset()).collect();
        assert_eq!(offsets, vec![0, 10, 20]);
        assert_eq!(cursor.next_offset(), 25);
        assert!(!cursor.has_more());
        assert!(cursor.fetch_next_page().is_none());
    }

    #[test]
    fn total_count_is_last_value_wins() {
        let mut cursor = cursor();
        fetch_and_complete(&mut cursor, 10, 25);
        fetch_and_complete(&mut cursor, 10, 40);
        assert_eq!(cursor.total_count(), Some(40));
    }

    #[test]
    fn empty_first_page_is_terminal_empty_result() {
        let mut cursor = cursor();
        let outcome = fetch_and_complete(&mut cursor, 0, 0);
        assert_eq!(
            outcome,
            CompletionOutcome::Applied {
                offset: 0,
                len: 0,
                total_count: 0
            }
        );
        assert_eq!(cursor.status(), &FetchStatus::Fetched);
        assert_eq!(cursor.total_count(), Some(0));
        assert!(cursor.pages().is_empty());
        assert!(cursor.fetch_next_page().is_none());
    }

    #[test]
    fn empty_page_with_stale_count_exhausts_cursor() {
        let mut cursor = cursor();
        fetch_and_complete(&mut cursor, 10, 25);
        // Server shrank: claims 25 but returns nothing at offset 10
        fetch_and_complete(&mut cursor, 0, 25);
        assert_eq!(cursor.total_count(), Some(10));
        assert!(cursor.fetch_next_page().is_none());
    }
}

mod failure {
    use super::*;

    #[test]
    fn failure_sets_error_without_touching_offsets() {
        let mut cursor = cursor();
        fetch_and_complete(&mut cursor, 10, 25);

        let request = cursor.fetch_next_page().unwrap();
        let err = FetchError::transport(10, "timeout");
        let outcome = cursor.complete(request.ticket, Err(err.clone()));

        assert_eq!(outcome, CompletionOutcome::Failed(err.clone()));
        assert_eq!(cursor.error(), Some(&err));
        assert_eq!(cursor.next_offset(), 10);
        assert_eq!(cursor.pages().len(), 1);
    }

    #[test]
    fn retry_after_failure_requests_same_offset() {
        let mut cursor = cursor();
        fetch_and_complete(&mut cursor, 10, 25);
        let request = cursor.fetch_next_page().unwrap();
        cursor.complete(request.ticket, Err(FetchError::transport(10, "timeout")));

        let retry = cursor.fetch_next_page().unwrap();
        assert_eq!(retry.offset(), 10);
        assert!(cursor.is_fetching());
    }

    #[test]
    fn first_page_failure_can_be_retried_with_unknown_total() {
        let mut cursor = cursor();
        let request = cursor.fetch_next_page().unwrap();
        cursor.complete(request.ticket, Err(FetchError::transport(0, "offline")));
        assert_eq!(cursor.total_count(), None);
        assert_eq!(cursor.fetch_next_page().map(|r| r.offset()), Some(0));
    }
}

mod stale {
    use super::*;

    #[test]
    fn completion_from_other_generation_is_stale() {
        let mut cursor = cursor();
        let request = cursor.fetch_next_page().unwrap();
        let foreign = FetchTicket {
            generation: Generation::new(0),
            offset: request.offset(),
        };
        let outcome = cursor.complete(foreign, Ok(response(0..10, 25)));

        assert_eq!(
            outcome,
            CompletionOutcome::Stale(StaleReason::Superseded {
                ticket: Generation::new(0)
            })
        );
        assert!(cursor.is_fetching());
        assert!(cursor.pages().is_empty());
    }

    #[test]
    fn completion_when_not_fetching_is_stale() {
        let mut cursor = cursor();
        let request = cursor.fetch_next_page().unwrap();
        cursor.complete(request.ticket, Ok(response(0..10, 25)));

        // Duplicate delivery of the same result
        let outcome = cursor.complete(request.ticket, Ok(response(0..10, 25)));
        assert_eq!(outcome, CompletionOutcome::Stale(StaleReason::NotFetching));
        assert_eq!(cursor.next_offset(), 10);
    }

    #[test]
    fn completion_for_wrong_offset_is_stale() {
        let mut cursor = cursor();
        fetch_and_complete(&mut cursor, 10, 25);
        let request = cursor.fetch_next_page().unwrap();
        let wrong = FetchTicket {
            generation: request.ticket.generation,
            offset: 20,
        };
        let outcome = cursor.complete(wrong, Ok(response(20..30, 25)));
        assert_eq!(
            outcome,
            CompletionOutcome::Stale(StaleReason::OffsetMismatch {
                expected: 10,
                received: 20
            })
        );
        assert_eq!(cursor.next_offset(), 10);
    }
}

mod rows {
    use super::*;
    use crate::model::RecordId;

    #[test]
    fn row_lookup_spans_pages() {
        let mut cursor = cursor();
        fetch_and_complete(&mut cursor, 10, 25);
        fetch_and_complete(&mut cursor, 10, 25);

        assert_eq!(cursor.row(0).map(Record::id), Some(&RecordId::from(0u64)));
        assert_eq!(cursor.row(9).map(Record::id), Some(&RecordId::from(9u64)));
        assert_eq!(cursor.row(10).map(Record::id), Some(&RecordId::from(10u64)));
        assert_eq!(cursor.row(19).map(Record::id), Some(&RecordId::from(19u64)));
        assert!(cursor.row(20).is_none());
    }

    #[test]
    fn records_iterates_in_offset_order() {
        let mut cursor = cursor();
        fetch_and_complete(&mut cursor, 3, 6);
        fetch_and_complete(&mut cursor, 3, 6);
        let ids: Vec<_> = cursor.records().map(|r| r.id().clone()).collect();
        assert_eq!(ids, (0u64..6).map(RecordId::from).collect::<Vec<_>>());
    }
}
