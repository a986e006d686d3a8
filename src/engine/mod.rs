//! The notebook state engine.
//!
//! `Notebook` owns every note and category plus the current selection. The
//! only way to change any of it is [`Notebook::dispatch`], which computes the
//! next collections, installs them, reconciles the selection against the new
//! view and then writes the changed collections back to the store.

pub mod ops;
pub mod selection;
pub mod view;

use crate::core::category::Category;
use crate::core::filter::Filter;
use crate::core::id::Id;
use crate::core::note::{NEW_NOTE_TITLE, Note};
use crate::store::{self, CATEGORIES_KEY, KeyValueStore, NOTES_KEY};

pub use selection::Selection;

/// Every state change the notebook accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Notes
    /// Create a note in the active category, or select the newest note when
    /// it is still an untouched "New Note" draft. That draft may belong to a
    /// different category than the active one; it is then not visible and
    /// reconciliation moves the selection to the first visible note.
    NewNote,
    UpdateNote(Note),
    ToggleFavorite(Id),
    TrashNote(Id),
    RestoreNote(Id),
    DeleteNotePermanently(Id),
    EmptyTrash,
    AssignCategory(Id, Option<Id>),

    // Categories
    NewCategory(String),
    RenameCategory(Id, String),
    DeleteCategory(Id),

    // Selection
    SelectNote(Option<Id>),
    SelectFilter(Filter),
    SelectCategory(Option<Id>),
}

/// Result of a dispatched action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed and was committed.
    Committed,
    /// Nothing to do: unknown id, blank name, or already in that state.
    Unchanged,
    /// `EmptyTrash` found no trashed notes.
    TrashAlreadyEmpty,
}

/// Owned copy of the whole notebook state at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub notes: Vec<Note>,
    pub categories: Vec<Category>,
    pub selection: Selection,
}

impl Snapshot {
    pub fn visible_notes(&self) -> Vec<&Note> {
        view::project(&self.notes, self.selection.filter, self.selection.category_id.as_ref())
    }
}

/// Collections computed by one action, not yet installed.
#[derive(Default)]
struct Transition {
    notes: Option<Vec<Note>>,
    categories: Option<Vec<Category>>,
}

pub type Clock = Box<dyn Fn() -> i64>;

fn wall_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct Notebook {
    notes: Vec<Note>,
    categories: Vec<Category>,
    selection: Selection,
    store: Box<dyn KeyValueStore>,
    clock: Clock,
}

impl Notebook {
    /// Load both collections from `backend`. Damaged data loads as empty and
    /// is backed up before anything overwrites it.
    pub fn open(mut backend: impl KeyValueStore + 'static) -> Self {
        let notes: Vec<Note> = store::load_collection(&mut backend, NOTES_KEY);
        let categories: Vec<Category> = store::load_collection(&mut backend, CATEGORIES_KEY);
        log::info!("Loaded {} notes and {} categories", notes.len(), categories.len());

        let mut notebook = Self {
            notes,
            categories,
            selection: Selection::default(),
            store: Box::new(backend),
            clock: Box::new(wall_clock),
        };
        notebook.repair_references();
        notebook.reconcile();
        notebook
    }

    /// Replace the timestamp source, e.g. with a logical clock.
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // --- Read API ---

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_note_id(&self) -> Option<&Id> {
        self.selection.active_note_id.as_ref()
    }

    pub fn active_filter(&self) -> Filter {
        self.selection.filter
    }

    pub fn active_category_id(&self) -> Option<&Id> {
        self.selection.category_id.as_ref()
    }

    /// The projected view for the current filter and category.
    pub fn visible_notes(&self) -> Vec<&Note> {
        view::project(&self.notes, self.selection.filter, self.selection.category_id.as_ref())
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.note(self.selection.active_note_id.as_ref()?)
    }

    pub fn note(&self, id: &Id) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn category(&self, id: &Id) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn trashed_count(&self) -> usize {
        ops::trashed_count(&self.notes)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            notes: self.notes.clone(),
            categories: self.categories.clone(),
            selection: self.selection.clone(),
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    // --- Edit helpers ---

    /// Set a note's title and stamp it as modified.
    pub fn set_title(&mut self, id: &Id, title: impl Into<String>) -> Outcome {
        let Some(mut note) = self.note(id).cloned() else {
            return Outcome::Unchanged;
        };
        note.title = title.into();
        note.last_modified = (self.clock)();
        self.dispatch(Action::UpdateNote(note))
    }

    /// Set a note's body and stamp it as modified.
    pub fn set_body(&mut self, id: &Id, body: impl Into<String>) -> Outcome {
        let Some(mut note) = self.note(id).cloned() else {
            return Outcome::Unchanged;
        };
        note.body = body.into();
        note.last_modified = (self.clock)();
        self.dispatch(Action::UpdateNote(note))
    }

    // --- Dispatch ---

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        log::debug!("Dispatching {:?}", action);
        let selection_before = self.selection.clone();
        let mut transition = Transition::default();

        match action {
            Action::NewNote => {
                self.selection.filter = Filter::Notes;
                if let Some(id) = ops::reusable_new_note(&self.notes) {
                    log::debug!("Reusing blank draft {}", id);
                    self.selection.active_note_id = Some(id);
                } else {
                    let note = Note::new(NEW_NOTE_TITLE, self.selection.category_id.clone(), (self.clock)());
                    self.selection.active_note_id = Some(note.id.clone());
                    transition.notes = Some(ops::insert_note(&self.notes, note));
                }
            }

            Action::UpdateNote(note) => {
                if note.category_id.as_ref().is_some_and(|c| self.category(c).is_none()) {
                    log::warn!("Ignoring update of note {} to unknown category", note.id);
                } else {
                    transition.notes = Some(ops::update_note(&self.notes, &note));
                }
            }

            Action::ToggleFavorite(id) => {
                transition.notes = Some(ops::toggle_favorite(&self.notes, &id));
            }

            Action::TrashNote(id) => {
                transition.notes = Some(ops::soft_delete(&self.notes, &id));
            }

            Action::RestoreNote(id) => {
                transition.notes = Some(ops::restore(&self.notes, &id));
            }

            Action::DeleteNotePermanently(id) => {
                transition.notes = Some(ops::permanent_delete(&self.notes, &id));
            }

            Action::EmptyTrash => {
                let count = self.trashed_count();
                if count == 0 {
                    log::info!("Trash is already empty");
                    return Outcome::TrashAlreadyEmpty;
                }
                log::info!("Emptying trash ({} notes)", count);
                transition.notes = Some(ops::empty_trash(&self.notes));
            }

            Action::AssignCategory(note_id, category_id) => {
                if category_id.as_ref().is_some_and(|c| self.category(c).is_none()) {
                    log::warn!("Ignoring assignment of note {} to unknown category", note_id);
                } else {
                    transition.notes = Some(ops::assign_category(
                        &self.notes,
                        &note_id,
                        category_id.as_ref(),
                        (self.clock)(),
                    ));
                }
            }

            Action::NewCategory(name) => {
                if let Some(category) = Category::named(&name) {
                    self.selection.category_id = Some(category.id.clone());
                    self.selection.filter = Filter::Notes;
                    transition.categories = Some(ops::add_category(&self.categories, category));
                }
            }

            Action::RenameCategory(id, name) => {
                transition.categories = Some(ops::rename_category(&self.categories, &id, &name));
            }

            Action::DeleteCategory(id) => {
                let (notes, categories) = ops::delete_category(&self.notes, &self.categories, &id);
                transition.notes = Some(notes);
                transition.categories = Some(categories);
                if self.selection.category_id.as_ref() == Some(&id) {
                    self.selection.category_id = None;
                }
            }

            Action::SelectNote(id) => {
                self.selection.active_note_id = id;
            }

            Action::SelectFilter(filter) => {
                self.selection.filter = filter;
                self.selection.category_id = None;
            }

            Action::SelectCategory(category_id) => {
                self.selection.category_id = category_id;
                self.selection.filter = Filter::Notes;
            }
        }

        let (notes_changed, categories_changed) = self.install(transition);
        self.reconcile();
        self.persist(notes_changed, categories_changed);

        if notes_changed || categories_changed || self.selection != selection_before {
            Outcome::Committed
        } else {
            Outcome::Unchanged
        }
    }

    /// Swap in the new collections together. Returns which ones changed.
    fn install(&mut self, transition: Transition) -> (bool, bool) {
        let mut notes_changed = false;
        let mut categories_changed = false;
        if let Some(notes) = transition.notes {
            if notes != self.notes {
                self.notes = notes;
                notes_changed = true;
            }
        }
        if let Some(categories) = transition.categories {
            if categories != self.categories {
                self.categories = categories;
                categories_changed = true;
            }
        }
        (notes_changed, categories_changed)
    }

    fn reconcile(&mut self) {
        let next = selection::reconcile(self.selection.active_note_id.as_ref(), &self.visible_notes());
        if next != self.selection.active_note_id {
            log::debug!("Active note {:?} -> {:?}", self.selection.active_note_id, next);
            self.selection.active_note_id = next;
        }
    }

    /// Detach notes from categories that no longer exist, e.g. after a
    /// partially written store.
    fn repair_references(&mut self) {
        let mut repaired = 0;
        for note in &mut self.notes {
            if let Some(c) = &note.category_id {
                if !self.categories.iter().any(|cat| &cat.id == c) {
                    note.category_id = None;
                    repaired += 1;
                }
            }
        }
        if repaired > 0 {
            log::warn!("Cleared {} dangling category references", repaired);
            self.persist(true, false);
        }
    }

    /// Post-commit write-back. Failures are logged; memory stays authoritative.
    fn persist(&mut self, notes: bool, categories: bool) {
        if notes {
            if let Err(e) = store::save_collection(self.store.as_mut(), NOTES_KEY, &self.notes) {
                log::error!("Failed to save notes: {}", e);
            }
        }
        if categories {
            if let Err(e) = store::save_collection(self.store.as_mut(), CATEGORIES_KEY, &self.categories) {
                log::error!("Failed to save categories: {}", e);
            }
        }
    }
}
