use crate::error::StoreError;
use crate::todo::models::TaskId;
use crate::todo::store::TaskStore;
use crate::todo::ui::presenter::Presenter;
use std::cell::RefCell;
use std::rc::Rc;

/// Wires a [`TaskStore`] to a [`Presenter`].
///
/// Store changes are forwarded to `Presenter::render`, and each presenter
/// request is forwarded to the matching store mutation. Neither side holds a
/// reference to the other.
pub struct Coordinator {
    store: Rc<RefCell<TaskStore>>,
    presenter: Rc<Presenter>,
}

impl Coordinator {
    pub fn new(store: TaskStore, presenter: Rc<Presenter>) -> Rc<Coordinator> {
        let store = Rc::new(RefCell::new(store));

        let view = Rc::downgrade(&presenter);
        store.borrow_mut().register_change_listener(move |tasks| {
            if let Some(presenter) = view.upgrade() {
                presenter.render(tasks);
            }
        });

        let target = store.clone();
        presenter.on_add_requested(move |text| {
            report("add", target.borrow_mut().add_task(text));
        });
        let target = store.clone();
        presenter.on_edit_requested(move |id: TaskId, text| {
            report("edit", target.borrow_mut().edit_task(id, text));
        });
        let target = store.clone();
        presenter.on_delete_requested(move |id| {
            report("delete", target.borrow_mut().delete_task(id));
        });
        let target = store.clone();
        presenter.on_toggle_requested(move |id| {
            report("toggle", target.borrow_mut().toggle_task(id));
        });

        let coordinator = Rc::new(Coordinator { store, presenter });
        coordinator.refresh();
        coordinator
    }

    pub fn store(&self) -> &Rc<RefCell<TaskStore>> {
        &self.store
    }

    fn refresh(&self) {
        self.presenter.render(self.store.borrow().tasks());
    }
}

fn report(action: &str, result: Result<(), StoreError>) {
    if let Err(err) = result {
        tracing::error!(action, "task update failed: {err}");
    }
}
