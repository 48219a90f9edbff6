use super::*;

#[test]
fn test_add_command() {
    let command = parse_label_command("/label kind/bug priority/high");

    assert_eq!(command.add, vec!["kind/bug", "priority/high"]);
    assert!(command.remove.is_empty());
}

#[test]
fn test_remove_command() {
    let command = parse_label_command("/remove-label needs-triage");

    assert!(command.add.is_empty());
    assert_eq!(command.remove, vec!["needs-triage"]);
}

#[test]
fn test_commands_accumulate_across_lines() {
    let body = "Thanks!\r\n/label kind/bug\r\n  /LABEL docs\r\n/Remove-Label wip\r\n";

    let command = parse_label_command(body);

    assert_eq!(command.add, vec!["kind/bug", "docs"]);
    assert_eq!(command.remove, vec!["wip"]);
}

#[test]
fn test_commands_must_start_a_line() {
    let command = parse_label_command("please run /label kind/bug");

    assert!(command.is_empty());
}

#[test]
fn test_similar_commands_are_ignored() {
    let command = parse_label_command("/labels kind/bug\n/remove-labels wip");

    assert!(command.is_empty());
}

#[test]
fn test_command_without_names() {
    let command = parse_label_command("/label\n/remove-label   ");

    assert!(command.is_empty());
}

#[test]
fn test_plain_comment_has_no_command() {
    assert!(parse_label_command("Looks good to me").is_empty());
}
