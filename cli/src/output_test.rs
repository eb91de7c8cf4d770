use time::macros::datetime;

use super::*;

fn user(id: &str, name: Option<&str>, about: Option<&str>) -> User {
    User {
        id: id.to_owned(),
        name: name.map(str::to_owned),
        email: format!("{id}@example.com"),
        about: about.map(str::to_owned),
        created_at: datetime!(2024-01-01 8:00 UTC),
        updated_at: datetime!(2024-01-02 9:15 UTC),
    }
}

#[test]
fn empty_list_renders_header_only() {
    assert_eq!(users_table(&[]), "ID  NAME  EMAIL  ABOUT  CREATED  UPDATED\n");
}

#[test]
fn columns_are_padded_to_widest_cell() {
    let out = users_table(&[user("1", Some("Ada"), None), user("22", None, Some("Math"))]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ID  NAME  EMAIL           ABOUT"));
    assert!(lines[1].starts_with("1   Ada   1@example.com   -      2024-01-01T08:00:00Z"));
    assert!(lines[2].starts_with("22  -     22@example.com  Math"));
}

#[test]
fn long_about_is_clipped() {
    let about = "a".repeat(40);
    let out = users_table(&[user("1", None, Some(&about))]);
    assert!(out.contains(&format!("{}...", "a".repeat(32))));
    assert!(!out.contains(&about));
}
