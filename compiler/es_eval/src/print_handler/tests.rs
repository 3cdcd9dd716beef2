use super::*;
use pretty_assertions::assert_eq;

#[test]
fn buffer_captures_lines_and_fragments() {
    let handler = buffer_handler();
    handler.print("a");
    handler.print("b");
    handler.println("c");
    handler.println("");
    assert_eq!(handler.get_output(), "abc\n\n");
}

#[test]
fn buffer_clear_discards_output() {
    let handler = buffer_handler();
    handler.println("gone");
    handler.clear();
    assert_eq!(handler.get_output(), "");
    handler.println("kept");
    assert_eq!(handler.get_output(), "kept\n");
}

#[test]
fn silent_and_stdout_capture_nothing() {
    let silent = silent_handler();
    silent.println("x");
    assert_eq!(silent.get_output(), "");
    silent.clear();

    let stdout = stdout_handler();
    assert_eq!(stdout.get_output(), "");
}

#[test]
fn shared_handler_sees_writes_through_clones() {
    let handler = buffer_handler();
    let clone = SharedPrintHandler::clone(&handler);
    clone.println("from clone");
    assert_eq!(handler.get_output(), "from clone\n");
}
