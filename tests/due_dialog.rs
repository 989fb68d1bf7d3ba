use dueline::model::NO_DATE;
use dueline::tui::action::Action;
use dueline::tui::dialog::{DialogCommand, DialogState, DueDateDialog, EditOp, LineEditor};
use dueline::tui::state::AppState;
use uuid::Uuid;

fn open(task_id: Uuid) -> DialogState {
    let mut dialog = DialogState::Closed;
    assert_eq!(dialog.handle(DialogCommand::OpenDueDate(task_id)), Action::None);
    dialog
}

fn type_text(dialog: &mut DialogState, text: &str) {
    for c in text.chars() {
        dialog.handle(DialogCommand::Edit(EditOp::Insert(c)));
    }
}

fn buffer(dialog: &DialogState) -> (String, usize) {
    let editor = dialog.editor().expect("dialog should be open");
    (editor.input().text().to_string(), editor.input().cursor())
}

#[test]
fn opening_starts_empty_with_cursor_at_zero() {
    let task_id = Uuid::new_v4();
    let dialog = open(task_id);
    assert!(dialog.is_open());
    assert_eq!(buffer(&dialog), (String::new(), 0));
}

#[test]
fn reopening_discards_previous_session() {
    let mut dialog = open(Uuid::new_v4());
    type_text(&mut dialog, "next fri");
    dialog.handle(DialogCommand::OpenDueDate(Uuid::new_v4()));
    assert_eq!(buffer(&dialog), (String::new(), 0));
}

#[test]
fn typing_then_backspace() {
    let mut dialog = open(Uuid::new_v4());
    type_text(&mut dialog, "fri");
    dialog.handle(DialogCommand::Edit(EditOp::Backspace));
    assert_eq!(buffer(&dialog), ("fr".to_string(), 2));
}

#[test]
fn cursor_edits_are_bounded() {
    let mut dialog = open(Uuid::new_v4());
    dialog.handle(DialogCommand::Edit(EditOp::Backspace));
    dialog.handle(DialogCommand::Edit(EditOp::Left));
    dialog.handle(DialogCommand::Edit(EditOp::Delete));
    assert_eq!(buffer(&dialog), (String::new(), 0));

    type_text(&mut dialog, "mon");
    dialog.handle(DialogCommand::Edit(EditOp::Right));
    dialog.handle(DialogCommand::Edit(EditOp::Delete));
    assert_eq!(buffer(&dialog), ("mon".to_string(), 3));

    dialog.handle(DialogCommand::Edit(EditOp::Left));
    dialog.handle(DialogCommand::Edit(EditOp::Left));
    dialog.handle(DialogCommand::Edit(EditOp::Delete));
    assert_eq!(buffer(&dialog), ("mn".to_string(), 1));

    dialog.handle(DialogCommand::Edit(EditOp::Insert('o')));
    assert_eq!(buffer(&dialog), ("mon".to_string(), 2));

    dialog.handle(DialogCommand::Edit(EditOp::Home));
    dialog.handle(DialogCommand::Edit(EditOp::Backspace));
    assert_eq!(buffer(&dialog), ("mon".to_string(), 0));
    dialog.handle(DialogCommand::Edit(EditOp::End));
    assert_eq!(buffer(&dialog), ("mon".to_string(), 3));
}

#[test]
fn multibyte_input_edits_by_character() {
    let mut dialog = open(Uuid::new_v4());
    type_text(&mut dialog, "mañana");
    dialog.handle(DialogCommand::Edit(EditOp::Left));
    dialog.handle(DialogCommand::Edit(EditOp::Left));
    dialog.handle(DialogCommand::Edit(EditOp::Left));
    dialog.handle(DialogCommand::Edit(EditOp::Insert('é')));
    assert_eq!(buffer(&dialog), ("mañéana".to_string(), 4));
    dialog.handle(DialogCommand::Edit(EditOp::Delete));
    assert_eq!(buffer(&dialog), ("mañéna".to_string(), 4));
    dialog.handle(DialogCommand::Edit(EditOp::Backspace));
    assert_eq!(buffer(&dialog), ("mañna".to_string(), 3));
}

#[test]
fn submit_empty_sends_no_date_sentinel() {
    let task_id = Uuid::new_v4();
    let mut dialog = open(task_id);
    assert_eq!(
        dialog.handle(DialogCommand::Submit),
        Action::SetTaskDueString(task_id, NO_DATE.to_string())
    );
    assert!(!dialog.is_open());
}

#[test]
fn submit_whitespace_sends_no_date_sentinel() {
    let task_id = Uuid::new_v4();
    let mut dialog = open(task_id);
    type_text(&mut dialog, "   ");
    assert_eq!(
        dialog.handle(DialogCommand::Submit),
        Action::SetTaskDueString(task_id, NO_DATE.to_string())
    );
}

#[test]
fn submit_normalizes_abbreviations() {
    let task_id = Uuid::new_v4();
    let mut dialog = open(task_id);
    type_text(&mut dialog, "tmrw");
    assert_eq!(
        dialog.handle(DialogCommand::Submit),
        Action::SetTaskDueString(task_id, "tomorrow".to_string())
    );
    assert_eq!(dialog, DialogState::Closed);
}

#[test]
fn cancel_hides_and_leaves_nothing_behind() {
    let task_id = Uuid::new_v4();
    let mut dialog = open(task_id);
    type_text(&mut dialog, "next fri");
    assert_eq!(dialog.handle(DialogCommand::Cancel), Action::HideDialog);
    assert!(!dialog.is_open());

    dialog.handle(DialogCommand::OpenDueDate(task_id));
    assert_eq!(buffer(&dialog), (String::new(), 0));
}

#[test]
fn commands_on_closed_dialog_are_ignored() {
    let mut dialog = DialogState::Closed;
    assert_eq!(dialog.handle(DialogCommand::Edit(EditOp::Insert('x'))), Action::None);
    assert_eq!(dialog.handle(DialogCommand::Submit), Action::None);
    assert_eq!(dialog.handle(DialogCommand::Cancel), Action::None);
    assert_eq!(dialog, DialogState::Closed);
}

#[test]
fn due_date_dialog_edits_through_the_shared_trait() {
    let task_id = Uuid::new_v4();
    let mut dialog = DueDateDialog::new(task_id);
    for c in "next sat".chars() {
        dialog.apply_edit(EditOp::Insert(c));
    }
    assert_eq!(dialog.input().text(), "next sat");
    assert_eq!(
        dialog.submit(),
        Action::SetTaskDueString(task_id, "next saturday".to_string())
    );
}

#[test]
fn app_state_refuses_resubmit_while_in_flight() {
    let mut state = AppState::new();
    state.set_tasks(vec![dueline::model::TaskRecord::new("r1", "Pay rent")]);
    let task_id = state.tasks[0].id;

    state.open_due_dialog();
    let first = state.handle_dialog(DialogCommand::Submit);
    assert_eq!(first, Action::SetTaskDueString(task_id, NO_DATE.to_string()));
    assert!(state.in_flight.contains(&task_id));

    state.open_due_dialog();
    for c in "tmrw".chars() {
        state.handle_dialog(DialogCommand::Edit(EditOp::Insert(c)));
    }
    let second = state.handle_dialog(DialogCommand::Submit);
    assert_eq!(second, Action::None);
    assert!(state.message.starts_with("Still updating"));
    // Refused submit keeps the dialog open with what was typed.
    assert!(state.dialog.is_open());
    assert_eq!(buffer(&state.dialog), ("tmrw".to_string(), 4));
    state.handle_dialog(DialogCommand::Cancel);

    state.finish_due_update(task_id, "Due date set: no date".to_string());
    state.open_due_dialog();
    let third = state.handle_dialog(DialogCommand::Submit);
    assert_eq!(third, Action::SetTaskDueString(task_id, NO_DATE.to_string()));
}

#[test]
fn open_without_tasks_does_nothing() {
    let mut state = AppState::new();
    state.set_tasks(vec![]);
    state.open_due_dialog();
    assert!(!state.dialog.is_open());
}
