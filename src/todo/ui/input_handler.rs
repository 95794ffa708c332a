use crate::todo::ui::presenter::{Focus, Presenter};
use ratatui::{
    Terminal,
    backend::Backend,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use std::io;

/// Outcome of handling one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Runs the main event loop until the user quits.
pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, presenter: &Presenter) -> io::Result<()> {
    loop {
        terminal.draw(|f| crate::todo::ui::render::draw_ui(f, presenter))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(presenter, key) == KeyOutcome::Quit {
                tracing::info!("quit requested");
                return Ok(());
            }
        }
    }
}

/// Maps a key press onto a presenter gesture for the current focus.
pub fn handle_key(presenter: &Presenter, key: KeyEvent) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    // Copy the mode out so no view borrow is held while gestures run.
    let focus = match presenter.view().focus {
        Focus::Input => FocusMode::Input,
        Focus::List => FocusMode::List,
        Focus::Editing { .. } => FocusMode::Editing,
    };

    match focus {
        FocusMode::Input => match key.code {
            KeyCode::Enter => presenter.submit(),
            KeyCode::Tab | KeyCode::Down => presenter.focus_list(),
            KeyCode::Backspace => presenter.backspace(),
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char(c) => presenter.type_char(c),
            _ => {}
        },
        FocusMode::List => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('j') | KeyCode::Down => presenter.select_next(),
            KeyCode::Char('k') | KeyCode::Up => presenter.select_prev(),
            KeyCode::Char(' ') => presenter.change_checkbox(),
            KeyCode::Char('d') | KeyCode::Delete => presenter.activate_delete(),
            KeyCode::Char('e') | KeyCode::Enter => presenter.begin_edit(),
            KeyCode::Char('i') | KeyCode::Tab => presenter.focus_input(),
            _ => {}
        },
        FocusMode::Editing => match key.code {
            KeyCode::Enter | KeyCode::Tab => presenter.focus_out(),
            KeyCode::Esc => presenter.cancel_edit(),
            KeyCode::Backspace => presenter.backspace(),
            KeyCode::Char(c) => presenter.type_char(c),
            _ => {}
        },
    }

    KeyOutcome::Continue
}

#[derive(Clone, Copy)]
enum FocusMode {
    Input,
    List,
    Editing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::models::Task;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(presenter: &Presenter, code: KeyCode) -> KeyOutcome {
        handle_key(presenter, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_typing_and_enter_submits() {
        let presenter = Presenter::new();
        let added = Rc::new(RefCell::new(Vec::new()));
        let log = added.clone();
        presenter.on_add_requested(move |text| log.borrow_mut().push(text.to_string()));

        for c in "hi q".chars() {
            assert_eq!(press(&presenter, KeyCode::Char(c)), KeyOutcome::Continue);
        }
        press(&presenter, KeyCode::Enter);

        assert_eq!(*added.borrow(), vec!["hi q".to_string()]);
    }

    #[test]
    fn test_list_keys_dispatch_gestures() {
        let presenter = Presenter::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let log = events.clone();
        presenter.on_toggle_requested(move |id| log.borrow_mut().push(format!("toggle {id}")));
        let log = events.clone();
        presenter.on_delete_requested(move |id| log.borrow_mut().push(format!("delete {id}")));
        let log = events.clone();
        presenter.on_edit_requested(move |id, text| log.borrow_mut().push(format!("edit {id} {text}")));

        presenter.render(&[Task::new(1, "a"), Task::new(2, "b")]);
        press(&presenter, KeyCode::Tab);
        press(&presenter, KeyCode::Char(' '));
        press(&presenter, KeyCode::Char('j'));
        press(&presenter, KeyCode::Char('e'));
        press(&presenter, KeyCode::Char('!'));
        press(&presenter, KeyCode::Enter);
        press(&presenter, KeyCode::Char('d'));

        assert_eq!(
            *events.borrow(),
            vec![
                "toggle 1".to_string(),
                "edit 2 b!".to_string(),
                "delete 2".to_string(),
            ]
        );
    }

    #[test]
    fn test_q_only_quits_from_list() {
        let presenter = Presenter::new();
        presenter.render(&[Task::new(1, "a")]);
        assert_eq!(press(&presenter, KeyCode::Char('q')), KeyOutcome::Continue);
        assert_eq!(presenter.view().input, "q");

        press(&presenter, KeyCode::Tab);
        assert_eq!(press(&presenter, KeyCode::Char('q')), KeyOutcome::Quit);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let presenter = Presenter::new();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&presenter, key), KeyOutcome::Quit);
    }
}
