use time::macros::datetime;

use super::*;

fn user(id: &str, name: Option<&str>, about: Option<&str>) -> User {
    User {
        id: id.to_owned(),
        name: name.map(str::to_owned),
        email: format!("{id}@example.com"),
        about: about.map(str::to_owned),
        created_at: datetime!(2024-01-15 09:30 UTC),
        updated_at: datetime!(2024-02-01 18:05 UTC),
    }
}

fn rows(count: usize) -> Vec<UserRow> {
    let users: Vec<_> = (0..count).map(|i| user(&format!("u{i}"), None, None)).collect();
    rows_from_users(&users)
}

// =============================================================
// Cells
// =============================================================

#[test]
fn absent_name_and_about_render_placeholder() {
    let row = UserRow::from_user(&user("a", None, Some("")));
    assert_eq!(row.name, "Not provided");
    assert_eq!(row.about.text, "Not provided");
    assert_eq!(row.about.tooltip, None);
}

#[test]
fn long_about_is_previewed_with_full_tooltip() {
    let about = "Enjoys long walks on the beach and Rust";
    let cell = AboutCell::from_about(Some(about));
    assert_eq!(cell.text, "Enjoys long walks on...");
    assert_eq!(cell.tooltip.as_deref(), Some(about));
}

#[test]
fn short_about_has_no_tooltip() {
    let cell = AboutCell::from_about(Some("Twenty characters!!!"));
    assert_eq!(cell.text, "Twenty characters!!!");
    assert_eq!(cell.tooltip, None);
}

#[test]
fn timestamps_render_as_day_month_year() {
    let row = UserRow::from_user(&user("a", Some("Ada"), None));
    assert_eq!(row.created, "15/01/2024, 09:30");
    assert_eq!(row.updated, "01/02/2024, 18:05");
}

// =============================================================
// Filtering
// =============================================================

#[test]
fn filter_is_case_insensitive_over_rendered_cells() {
    let users = [
        user("a", Some("Ada Lovelace"), None),
        user("b", Some("Grace"), Some("Compiler pioneer who wrote COBOL specs")),
    ];
    let rows = rows_from_users(&users);
    let mut table = TableState::default();

    table.set_filter("LOVE".to_owned());
    assert_eq!(table.page(&rows).matched, 1);

    table.set_filter("cobol".to_owned());
    assert_eq!(table.page(&rows).rows[0].id, "b");

    table.set_filter("b@example".to_owned());
    assert_eq!(table.page(&rows).matched, 1);

    table.set_filter("15/01/2024".to_owned());
    assert_eq!(table.page(&rows).matched, 2);
}

#[test]
fn filter_with_no_match_yields_empty_page() {
    let rows = rows(3);
    let mut table = TableState::default();
    table.set_filter("zzz-nothing".to_owned());
    let page = table.page(&rows);
    assert!(page.is_empty());
    assert_eq!(page.page_count, 1);
    assert!(!page.can_previous());
    assert!(!page.can_next());
}

#[test]
fn filter_change_returns_to_first_page() {
    let rows = rows(25);
    let mut table = TableState::default();
    table.next(25);
    table.next(25);
    assert_eq!(table.page_index, 2);
    table.set_filter("u1".to_owned());
    assert_eq!(table.page_index, 0);
    assert_eq!(table.page(&rows).matched, 11);
}

// =============================================================
// Paging
// =============================================================

#[test]
fn paging_stops_at_both_ends() {
    let rows = rows(12);
    let mut table = TableState::default();
    assert!(!table.page(&rows).can_previous());
    assert!(table.page(&rows).can_next());

    table.next(12);
    table.next(12);
    let page = table.page(&rows);
    assert_eq!(page.page_index, 1);
    assert_eq!(page.rows.len(), 2);
    assert!(!page.can_next());

    table.previous();
    table.previous();
    assert_eq!(table.page_index, 0);
}

#[test]
fn page_size_change_keeps_top_row_visible() {
    let mut table = TableState::default();
    table.page_index = 3;
    assert!(table.set_page_size(20, 100));
    assert_eq!(table.page_index, 1);
    assert!(table.set_page_size(5, 100));
    assert_eq!(table.page_index, 4);
}

#[test]
fn every_page_size_option_keeps_index_in_bounds() {
    for matched in [0, 1, 7, 49, 50, 51, 123] {
        for from in PAGE_SIZE_OPTIONS {
            for to in PAGE_SIZE_OPTIONS {
                let mut table = TableState {
                    page_size: from,
                    ..TableState::default()
                };
                table.page_index = table.page_count(matched) - 1;
                table.set_page_size(to, matched);
                assert!(table.page_index < table.page_count(matched));
            }
        }
    }
}

#[test]
fn unknown_page_size_is_ignored() {
    let mut table = TableState::default();
    assert!(!table.set_page_size(7, 10));
    assert!(!table.set_page_size(DEFAULT_PAGE_SIZE, 10));
    assert_eq!(table.page_size, 10);
}

#[test]
fn page_is_clamped_when_rows_shrink() {
    let mut table = TableState::default();
    table.page_index = 4;
    let page = table.page(&rows(11));
    assert_eq!(page.page_index, 1);
    assert_eq!(page.rows.len(), 1);

    table.clamp(11);
    assert_eq!(table.page_index, 1);
}
