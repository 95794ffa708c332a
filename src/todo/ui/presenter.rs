use crate::todo::models::{Task, TaskId};
use chrono::Local;
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub const TITLE: &str = "Todos";
pub const INPUT_PLACEHOLDER: &str = "Add todo";
pub const SUBMIT_LABEL: &str = "Submit";
pub const DELETE_LABEL: &str = "Delete";
pub const EMPTY_PLACEHOLDER: &str = "Nothing to do! Add a task?";

pub type AddHandler = Rc<dyn Fn(&str)>;
pub type EditHandler = Rc<dyn Fn(TaskId, &str)>;
pub type IdHandler = Rc<dyn Fn(TaskId)>;

/// One rendered row of the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: TaskId,
    pub text: String,
    pub complete: bool,
}

/// Where keyboard input currently goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
    // Inline editing of the item with `id`; `text` is what the editable region shows.
    Editing { id: TaskId, text: String },
}

/// Everything the screen shows. Rebuilt from the task list on every render.
#[derive(Debug)]
pub struct ViewState {
    pub title: String,
    pub date: String,
    pub input: String,
    pub items: Vec<ItemView>,
    pub focus: Focus,
    pub selected: usize,
    pending_edits: HashMap<TaskId, String>,
}

impl ViewState {
    pub fn selected_item(&self) -> Option<&ItemView> {
        self.items.get(self.selected)
    }
}

#[derive(Default)]
struct Handlers {
    add: Option<AddHandler>,
    edit: Option<EditHandler>,
    delete: Option<IdHandler>,
    toggle: Option<IdHandler>,
}

/// Owns the view state and turns user gestures into handler calls.
///
/// All methods take `&self`. No internal borrow is held while a handler
/// runs, so a handler may call back into [`Presenter::render`].
pub struct Presenter {
    view: RefCell<ViewState>,
    handlers: RefCell<Handlers>,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter {
    pub fn new() -> Presenter {
        Presenter {
            view: RefCell::new(ViewState {
                title: TITLE.to_string(),
                date: Local::now().format("%Y-%m-%d").to_string(),
                input: String::new(),
                items: Vec::new(),
                focus: Focus::Input,
                selected: 0,
                pending_edits: HashMap::new(),
            }),
            handlers: RefCell::new(Handlers::default()),
        }
    }

    pub fn view(&self) -> Ref<'_, ViewState> {
        self.view.borrow()
    }

    /// Rebuilds the list from `tasks`, discarding every previously rendered row.
    pub fn render(&self, tasks: &[Task]) {
        tracing::debug!(?tasks, "rendering tasks");
        let mut guard = self.view.borrow_mut();
        let view = &mut *guard;

        view.items.clear();
        view.items.extend(tasks.iter().map(|task| ItemView {
            id: task.id,
            text: task.text.clone(),
            complete: task.complete,
        }));

        // Keep selection and focus pointing at something that still exists.
        if view.selected >= view.items.len() {
            view.selected = view.items.len().saturating_sub(1);
        }
        let editing_gone = match &view.focus {
            Focus::Editing { id, .. } => !view.items.iter().any(|item| item.id == *id),
            _ => false,
        };
        if editing_gone {
            view.focus = Focus::List;
        }
        if view.items.is_empty() && view.focus != Focus::Input {
            view.focus = Focus::Input;
        }
        let items = &view.items;
        view.pending_edits
            .retain(|id, _| items.iter().any(|item| item.id == *id));
    }

    pub fn on_add_requested(&self, handler: impl Fn(&str) + 'static) {
        self.handlers.borrow_mut().add = Some(Rc::new(handler));
    }

    pub fn on_edit_requested(&self, handler: impl Fn(TaskId, &str) + 'static) {
        self.handlers.borrow_mut().edit = Some(Rc::new(handler));
    }

    pub fn on_delete_requested(&self, handler: impl Fn(TaskId) + 'static) {
        self.handlers.borrow_mut().delete = Some(Rc::new(handler));
    }

    pub fn on_toggle_requested(&self, handler: impl Fn(TaskId) + 'static) {
        self.handlers.borrow_mut().toggle = Some(Rc::new(handler));
    }

    /// Types a character into whichever field has focus.
    pub fn type_char(&self, c: char) {
        let mut guard = self.view.borrow_mut();
        let view = &mut *guard;
        match &mut view.focus {
            Focus::Input => view.input.push(c),
            Focus::Editing { id, text } => {
                text.push(c);
                let (id, text) = (*id, text.clone());
                view.pending_edits.insert(id, text);
            }
            Focus::List => {}
        }
    }

    pub fn backspace(&self) {
        let mut guard = self.view.borrow_mut();
        let view = &mut *guard;
        match &mut view.focus {
            Focus::Input => {
                view.input.pop();
            }
            Focus::Editing { id, text } => {
                text.pop();
                let (id, text) = (*id, text.clone());
                view.pending_edits.insert(id, text);
            }
            Focus::List => {}
        }
    }

    /// Submits the input form. Empty input is ignored; otherwise the field is cleared.
    pub fn submit(&self) {
        let text = {
            let view = self.view.borrow();
            if view.input.is_empty() {
                return;
            }
            view.input.clone()
        };
        let Some(handler) = self.handlers.borrow().add.clone() else {
            return;
        };

        handler(&text);
        self.view.borrow_mut().input.clear();
    }

    pub fn focus_input(&self) {
        self.view.borrow_mut().focus = Focus::Input;
    }

    /// Moves focus to the list. Stays on the input when there is nothing to select.
    pub fn focus_list(&self) {
        let mut view = self.view.borrow_mut();
        if !view.items.is_empty() {
            view.focus = Focus::List;
        }
    }

    pub fn select_next(&self) {
        let mut view = self.view.borrow_mut();
        if view.selected + 1 < view.items.len() {
            view.selected += 1;
        }
    }

    pub fn select_prev(&self) {
        let mut view = self.view.borrow_mut();
        view.selected = view.selected.saturating_sub(1);
    }

    /// Flips the checkbox of the selected item.
    pub fn change_checkbox(&self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(handler) = self.handlers.borrow().toggle.clone() else {
            return;
        };
        handler(id);
    }

    /// Activates the delete control of the selected item.
    pub fn activate_delete(&self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(handler) = self.handlers.borrow().delete.clone() else {
            return;
        };
        handler(id);
    }

    /// Puts the selected item's text region into edit mode.
    pub fn begin_edit(&self) {
        let mut view = self.view.borrow_mut();
        if view.focus != Focus::List {
            return;
        }
        if let Some(item) = view.selected_item() {
            let (id, text) = (item.id, item.text.clone());
            view.focus = Focus::Editing { id, text };
        }
    }

    /// The edited region loses focus. A non-empty pending edit for it is handed to
    /// the edit handler and cleared.
    pub fn focus_out(&self) {
        let pending = {
            let mut view = self.view.borrow_mut();
            let Focus::Editing { id, .. } = view.focus else {
                return;
            };
            view.focus = Focus::List;
            match view.pending_edits.remove(&id) {
                Some(text) if !text.is_empty() => Some((id, text)),
                _ => None,
            }
        };
        let Some((id, text)) = pending else {
            return;
        };
        let Some(handler) = self.handlers.borrow().edit.clone() else {
            return;
        };
        handler(id, &text);
    }

    /// Leaves edit mode and throws the pending edit away.
    pub fn cancel_edit(&self) {
        let mut view = self.view.borrow_mut();
        if let Focus::Editing { id, .. } = view.focus {
            view.pending_edits.remove(&id);
            view.focus = Focus::List;
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        let view = self.view.borrow();
        if view.focus != Focus::List {
            return None;
        }
        view.selected_item().map(|item| item.id)
    }
}
