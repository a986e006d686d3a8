use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::id::Id;

/// Title given to freshly created notes.
pub const NEW_NOTE_TITLE: &str = "New Note";

const UNTITLED: &str = "Untitled Note";
const EMPTY_PREVIEW: &str = "No additional text";
const PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub last_modified: i64,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub trashed: bool,
    #[serde(default)]
    pub category_id: Option<Id>,
}

impl Note {
    pub fn new(title: impl Into<String>, category_id: Option<Id>, now: i64) -> Self {
        Self {
            id: Id::generate(),
            title: title.into(),
            body: String::new(),
            last_modified: now,
            favorited: false,
            trashed: false,
            category_id,
        }
    }

    /// True for an untouched note straight out of "new note".
    pub fn is_blank_new(&self) -> bool {
        self.title == NEW_NOTE_TITLE && self.body.trim().is_empty() && !self.trashed
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// First line of the list entry under the title.
    pub fn preview(&self) -> String {
        if self.body.is_empty() {
            return EMPTY_PREVIEW.to_string();
        }
        self.body.chars().take(PREVIEW_CHARS).collect()
    }

    /// Modification date in local time, e.g. "7 Mar 2026".
    pub fn modified_label(&self) -> String {
        match Local.timestamp_millis_opt(self.last_modified).single() {
            Some(dt) => dt.format("%-d %b %Y").to_string(),
            None => String::new(),
        }
    }
}
