//! Whole-collection note and category operations.
//!
//! Every function takes the prior collection and returns the next one. An id
//! that matches nothing yields an unchanged copy, never an error.

use crate::core::category::{self, Category};
use crate::core::id::Id;
use crate::core::note::Note;

/// The note "new note" should reselect instead of creating another one.
///
/// Only the most recently modified note is considered; on equal timestamps
/// the earlier note in the collection wins.
pub fn reusable_new_note(notes: &[Note]) -> Option<Id> {
    let mut latest: Option<&Note> = None;
    for note in notes {
        if latest.is_none_or(|l| note.last_modified > l.last_modified) {
            latest = Some(note);
        }
    }
    latest.filter(|n| n.is_blank_new()).map(|n| n.id.clone())
}

/// Prepend a note.
pub fn insert_note(notes: &[Note], note: Note) -> Vec<Note> {
    let mut next = Vec::with_capacity(notes.len() + 1);
    next.push(note);
    next.extend_from_slice(notes);
    next
}

/// Replace the note with the same id wholesale.
pub fn update_note(notes: &[Note], updated: &Note) -> Vec<Note> {
    map_note(notes, &updated.id, |n| *n = updated.clone())
}

pub fn toggle_favorite(notes: &[Note], id: &Id) -> Vec<Note> {
    map_note(notes, id, |n| n.favorited = !n.favorited)
}

pub fn soft_delete(notes: &[Note], id: &Id) -> Vec<Note> {
    map_note(notes, id, |n| n.trashed = true)
}

pub fn restore(notes: &[Note], id: &Id) -> Vec<Note> {
    map_note(notes, id, |n| n.trashed = false)
}

pub fn permanent_delete(notes: &[Note], id: &Id) -> Vec<Note> {
    notes.iter().filter(|n| &n.id != id).cloned().collect()
}

pub fn trashed_count(notes: &[Note]) -> usize {
    notes.iter().filter(|n| n.trashed).count()
}

pub fn empty_trash(notes: &[Note]) -> Vec<Note> {
    notes.iter().filter(|n| !n.trashed).cloned().collect()
}

pub fn assign_category(notes: &[Note], id: &Id, category_id: Option<&Id>, now: i64) -> Vec<Note> {
    map_note(notes, id, |n| {
        n.category_id = category_id.cloned();
        n.last_modified = now;
    })
}

/// Append a category.
pub fn add_category(categories: &[Category], category: Category) -> Vec<Category> {
    let mut next = categories.to_vec();
    next.push(category);
    next
}

/// Rename in place. A blank name leaves the collection as it was.
pub fn rename_category(categories: &[Category], id: &Id, name: &str) -> Vec<Category> {
    let Some(name) = category::clean_name(name) else {
        return categories.to_vec();
    };
    categories
        .iter()
        .map(|c| {
            if &c.id == id {
                Category { id: c.id.clone(), name: name.clone() }
            } else {
                c.clone()
            }
        })
        .collect()
}

/// Remove a category and detach every note that referenced it.
///
/// Both collections are returned together so callers install them in one step.
pub fn delete_category(notes: &[Note], categories: &[Category], id: &Id) -> (Vec<Note>, Vec<Category>) {
    let notes = notes
        .iter()
        .map(|n| {
            if n.category_id.as_ref() == Some(id) {
                Note { category_id: None, ..n.clone() }
            } else {
                n.clone()
            }
        })
        .collect();
    let categories = categories.iter().filter(|c| &c.id != id).cloned().collect();
    (notes, categories)
}

fn map_note(notes: &[Note], id: &Id, f: impl Fn(&mut Note)) -> Vec<Note> {
    notes
        .iter()
        .map(|n| {
            let mut n = n.clone();
            if &n.id == id {
                f(&mut n);
            }
            n
        })
        .collect()
}
