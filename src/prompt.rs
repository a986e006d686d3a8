//! Confirmation and text-input gates in front of destructive actions.
//!
//! The engine runs every action unconditionally. Front ends route the
//! destructive ones through these helpers so the user gets asked first.

use crate::core::Id;
use crate::engine::{Action, Notebook, Outcome};

pub trait Prompt {
    /// Yes/no question. `false` cancels the action.
    fn confirm(&mut self, message: &str) -> bool;

    /// Free text question. `None` when the user cancels.
    fn ask(&mut self, message: &str) -> Option<String>;
}

pub fn permanently_delete_note(notebook: &mut Notebook, prompt: &mut dyn Prompt, id: Id) -> Outcome {
    if notebook.note(&id).is_none() {
        return Outcome::Unchanged;
    }
    if !prompt.confirm("Are you sure you want to permanently delete this note?") {
        return Outcome::Unchanged;
    }
    notebook.dispatch(Action::DeleteNotePermanently(id))
}

/// Reports an empty trash without asking anything.
pub fn empty_trash(notebook: &mut Notebook, prompt: &mut dyn Prompt) -> Outcome {
    let count = notebook.trashed_count();
    if count == 0 {
        return Outcome::TrashAlreadyEmpty;
    }
    let message = format!("Are you sure you want to permanently delete {} note(s)?", count);
    if !prompt.confirm(&message) {
        return Outcome::Unchanged;
    }
    notebook.dispatch(Action::EmptyTrash)
}

pub fn delete_category(notebook: &mut Notebook, prompt: &mut dyn Prompt, id: Id) -> Outcome {
    let Some(category) = notebook.category(&id) else {
        return Outcome::Unchanged;
    };
    let message = format!(
        "Are you sure you want to delete the category \"{}\"? Notes in this category will become uncategorized.",
        category.name
    );
    if !prompt.confirm(&message) {
        return Outcome::Unchanged;
    }
    notebook.dispatch(Action::DeleteCategory(id))
}

pub fn new_category(notebook: &mut Notebook, prompt: &mut dyn Prompt) -> Outcome {
    match prompt.ask("Enter new category name:") {
        Some(name) => notebook.dispatch(Action::NewCategory(name)),
        None => Outcome::Unchanged,
    }
}
