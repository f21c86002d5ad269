//! Property-based tests for window geometry, pagination and selection.
//!
//! Tests validate:
//! 1. Paddings plus materialized rows always account for the full extent
//! 2. Every row intersecting the viewport is materialized
//! 3. Pages are requested contiguously, never twice, for one query
//! 4. Toggling twice restores the selection; replacing is idempotent
//! 5. The selected-only view never requests pages, not even on retry
//! 6. Sorting on mixed numeric and text values is a total order

use pagesel::model::{
    compare_records, FetchCompletion, FetchError, QueryParams, Record, SortSpec,
};
use pagesel::source::{MemorySource, RecordSource};
use pagesel::state::{ListConfig, ListController, SelectionSet, ViewMode};
use pagesel::view_state::virtual_window::{clamp_scroll, max_scroll_offset};
use pagesel::view_state::{Extent, RowExtent, VirtualWindow, WindowParams};
use proptest::prelude::*;

fn params() -> impl Strategy<Value = WindowParams> {
    (0usize..500, 1u64..100, 0usize..20, 0u64..5_000, 0u64..60_000).prop_map(
        |(row_count, extent, overscan, viewport, scroll)| WindowParams {
            row_count,
            row_extent: RowExtent::new(extent).unwrap(),
            overscan,
            viewport_extent: Extent::new(viewport),
            scroll_offset: Extent::new(scroll),
        },
    )
}

fn records(count: u64) -> Vec<Record> {
    (0..count).map(Record::new).collect()
}

/// Viewport operations a user can perform.
#[derive(Debug, Clone)]
enum Op {
    ScrollBy(i64),
    MoveFocus(isize),
    PageDown,
    Last,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-2_000i64..2_000).prop_map(Op::ScrollBy),
        (-30isize..30).prop_map(Op::MoveFocus),
        Just(Op::PageDown),
        Just(Op::Last),
    ]
}

fn apply(controller: &mut ListController, op: &Op) {
    match op {
        Op::ScrollBy(delta) => controller.scroll_by(*delta),
        Op::MoveFocus(delta) => controller.move_focus(*delta),
        Op::PageDown => controller.page_down(),
        Op::Last => controller.focus_last(),
    }
}

// ===== Property 1-2: Window Geometry =====

proptest! {
    #[test]
    fn paddings_and_rows_sum_to_total_extent(params in params()) {
        let window = VirtualWindow::compute(params);
        let sum = window
            .leading_padding()
            .saturating_add(window.rendered_extent())
            .saturating_add(window.trailing_padding());
        prop_assert_eq!(sum, window.total_extent());
    }

    #[test]
    fn rows_intersecting_viewport_are_materialized(params in params()) {
        let window = VirtualWindow::compute(params);
        let top = params.scroll_offset.get();
        let bottom = top + params.viewport_extent.get();
        let extent = params.row_extent.get();

        for index in 0..params.row_count {
            let row_top = extent * index as u64;
            let row_bottom = row_top + extent;
            if row_top < bottom && row_bottom > top {
                prop_assert!(window.contains(index), "row {} not materialized", index);
            }
        }
    }

    #[test]
    fn clamped_scroll_never_exceeds_max(params in params()) {
        let clamped = clamp_scroll(
            params.scroll_offset,
            params.row_count,
            params.row_extent,
            params.viewport_extent,
        );
        let max = max_scroll_offset(params.row_count, params.row_extent, params.viewport_extent);
        prop_assert!(clamped <= max);
        prop_assert!(clamped <= params.scroll_offset);
    }
}

// ===== Property 3: Pagination =====

proptest! {
    #[test]
    fn pages_are_requested_contiguously_once(
        total in 0u64..120,
        page_size in 1usize..15,
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let source = MemorySource::new(records(total), page_size);
        let mut controller = ListController::new(ListConfig::default(), SelectionSet::new());
        controller.resize(Extent::new(480));

        let mut served = Vec::new();
        let drive = |controller: &mut ListController, served: &mut Vec<usize>| loop {
            let requests = controller.take_requests();
            if requests.is_empty() {
                break;
            }
            for request in requests {
                served.push(request.offset());
                let result = source.fetch(request.offset(), &request.params);
                controller.apply_completion(FetchCompletion { ticket: request.ticket, result });
            }
        };

        drive(&mut controller, &mut served);
        for op in &ops {
            apply(&mut controller, op);
            drive(&mut controller, &mut served);
        }

        // Each page starts where the previous one ended
        let mut expected = 0;
        for offset in &served {
            prop_assert_eq!(*offset, expected);
            expected += page_size;
        }
        prop_assert!(controller.row_count() <= total as usize);
    }
}

// ===== Property 4-5: Selection =====

proptest! {
    #[test]
    fn toggle_twice_restores_selection(
        seed in prop::collection::btree_set(0u64..50, 0..20),
        id in 0u64..50,
    ) {
        let mut selection = SelectionSet::from_records(seed.iter().copied().map(Record::new));
        let before = selection.records();

        let record = Record::new(id);
        selection.toggle(&record);
        selection.toggle(&record);

        prop_assert_eq!(selection.records(), before);
    }

    #[test]
    fn replace_all_is_idempotent(ids in prop::collection::vec(0u64..50, 0..30)) {
        let mut once = SelectionSet::new();
        once.replace_all(ids.iter().copied().map(Record::new));

        let mut twice = once.clone();
        twice.replace_all(ids.iter().copied().map(Record::new));

        prop_assert_eq!(once.records(), twice.records());
    }

    #[test]
    fn selected_only_view_never_requests_pages(
        seed in prop::collection::btree_set(0u64..50, 0..20),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let selection = SelectionSet::from_records(seed.iter().copied().map(Record::new));
        let mut controller = ListController::new(ListConfig::default(), selection);
        controller.resize(Extent::new(480));
        // Leave the full list's cursor in Error behind the selected-only view
        for request in controller.take_requests() {
            let error = FetchError::transport(request.offset(), "unreachable");
            controller.apply_completion(FetchCompletion::failure(request.ticket, error));
        }
        controller.set_view_mode(ViewMode::SelectedOnly);

        prop_assert!(!controller.retry());
        prop_assert!(controller.take_requests().is_empty());
        for op in &ops {
            apply(&mut controller, op);
            prop_assert!(!controller.retry());
            prop_assert!(controller.take_requests().is_empty());
        }
        prop_assert_eq!(controller.row_count(), seed.len());
    }
}

// ===== Property 6: Sort Order =====

fn sort_value() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..100).prop_map(|n| n.to_string()),
        (0u32..7).prop_map(|n| format!("{n}.5")),
        Just("NaN".to_string()),
        Just("Na".to_string()),
        Just("-inf".to_string()),
        "[0-9][a-z]{0,2}",
        Just(String::new()),
    ]
}

fn valued_records(values: &[String]) -> Vec<Record> {
    values
        .iter()
        .enumerate()
        .map(|(id, value)| Record::new(id as u64).with_field("v", value.as_str()))
        .collect()
}

proptest! {
    #[test]
    fn sorted_fetch_is_ordered_on_mixed_values(
        values in prop::collection::vec(sort_value(), 0..300),
        descending in any::<bool>(),
    ) {
        let sort = if descending { SortSpec::desc("v") } else { SortSpec::asc("v") };
        let source = MemorySource::new(valued_records(&values), values.len().max(1));
        let params = QueryParams { filter: None, sort: Some(sort.clone()) };

        let page = source.fetch(0, &params).unwrap();

        prop_assert_eq!(page.documents.len(), values.len());
        for pair in page.documents.windows(2) {
            prop_assert_ne!(
                compare_records(&pair[0], &pair[1], Some(&sort)),
                std::cmp::Ordering::Greater
            );
        }
    }

    #[test]
    fn sorted_selection_view_keeps_every_member(
        values in prop::collection::vec(sort_value(), 0..300),
    ) {
        let selection = SelectionSet::from_records(valued_records(&values));
        let sort = SortSpec::asc("v");

        let view = selection.view(Some(&sort));

        prop_assert_eq!(view.len(), values.len());
        for pair in view.windows(2) {
            prop_assert_ne!(
                compare_records(pair[0], pair[1], Some(&sort)),
                std::cmp::Ordering::Greater
            );
        }
    }
}
