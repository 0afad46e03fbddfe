//! Behaviour tests for list view page navigation.

use std::cell::RefCell;

use pagination::{IndexBase, PageCursor, PageNavigationError, PageRequest, PaginationState};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

struct PaginationWorld {
    state: RefCell<PaginationState>,
    last_outcome: RefCell<Option<Result<u32, PageNavigationError>>>,
}

impl PaginationWorld {
    fn new() -> Self {
        Self {
            state: RefCell::new(PaginationState::new(IndexBase::Zero, 0)),
            last_outcome: RefCell::new(None),
        }
    }

    fn record(&self, outcome: Result<u32, PageNavigationError>) {
        *self.last_outcome.borrow_mut() = Some(outcome);
    }
}

#[fixture]
fn world() -> PaginationWorld {
    PaginationWorld::new()
}

#[given("a zero-based list view with page size {size}")]
fn a_zero_based_list_view(world: &PaginationWorld, size: u32) {
    *world.state.borrow_mut() = PaginationState::new(IndexBase::Zero, size);
}

#[given("the server reports page {index} of {total} pages")]
fn the_server_reports_page(world: &PaginationWorld, index: u32, total: u32) {
    let page_size = world.state.borrow().page_request().page_size;
    world.state.borrow_mut().set_paging(PageCursor {
        page_index: index,
        page_size,
        total_items: u64::from(total) * u64::from(page_size),
        total_pages: total,
        has_next_page: index + 1 < total,
        has_prev_page: index > 0,
    });
}

#[when("the view moves to the next page")]
fn the_view_moves_to_the_next_page(world: &PaginationWorld) {
    let outcome = world.state.borrow_mut().go_next();
    world.record(outcome);
}

#[when("the view jumps to page {target}")]
fn the_view_jumps_to_page(world: &PaginationWorld, target: u32) {
    let outcome = world.state.borrow_mut().goto_page(target);
    world.record(outcome);
}

#[when("the paging is reset")]
fn the_paging_is_reset(world: &PaginationWorld) {
    world.state.borrow_mut().reset_paging();
}

#[then("the page index is {expected}")]
fn the_page_index_is(world: &PaginationWorld, expected: u32) {
    assert_eq!(world.state.borrow().page_index(), expected);
}

#[then("the last navigation was refused")]
fn the_last_navigation_was_refused(world: &PaginationWorld) {
    let outcome = world.last_outcome.borrow();
    assert!(
        matches!(outcome.as_ref(), Some(Err(_))),
        "expected a refused navigation, got {outcome:?}"
    );
}

#[then("the next request asks for page {index} with size {size}")]
fn the_next_request_asks_for(world: &PaginationWorld, index: u32, size: u32) {
    assert_eq!(
        world.state.borrow().page_request(),
        PageRequest {
            page_index: index,
            page_size: size
        }
    );
}

#[scenario(
    path = "tests/features/pagination_state.feature",
    name = "Navigation stays inside the reported window"
)]
fn navigation_stays_inside_the_reported_window(world: PaginationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/pagination_state.feature",
    name = "Jumping past an empty window leaves the index unchanged"
)]
fn jumping_past_an_empty_window_leaves_the_index_unchanged(world: PaginationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/pagination_state.feature",
    name = "Resetting after a filter change discards the window"
)]
fn resetting_after_a_filter_change_discards_the_window(world: PaginationWorld) {
    drop(world);
}
