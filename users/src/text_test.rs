use super::*;

#[test]
fn truncate_chars_leaves_short_text_alone() {
    assert_eq!(truncate_chars("short bio", 20), "short bio");
    assert_eq!(truncate_chars("exactly twenty chars", 20), "exactly twenty chars");
    assert_eq!(truncate_chars("", 20), "");
}

#[test]
fn truncate_chars_cuts_on_character_boundaries() {
    assert_eq!(truncate_chars("twenty-one characters", 20), "twenty-one character...");
    assert_eq!(truncate_chars("ééééé", 3), "ééé...");
}
