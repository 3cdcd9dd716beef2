use super::*;
use pretty_assertions::assert_eq;

#[test]
fn scripted_replays_in_order_then_ends() {
    let handler = scripted_handler(["first", "second"]);
    assert_eq!(handler.read_line("> ").as_deref(), Some("first"));
    assert_eq!(handler.read_line("> ").as_deref(), Some("second"));
    assert_eq!(handler.read_line("> "), None);
}

#[test]
fn push_line_extends_scripted_queue() {
    let handler = scripted_handler(Vec::<String>::new());
    assert_eq!(handler.read_line(""), None);
    handler.push_line("late");
    assert_eq!(handler.read_line("").as_deref(), Some("late"));
}

#[test]
fn empty_handler_never_yields() {
    let handler = empty_input_handler();
    handler.push_line("ignored");
    assert_eq!(handler.read_line("prompt"), None);
}
