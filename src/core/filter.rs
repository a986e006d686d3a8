use serde::{Deserialize, Serialize};
use std::fmt;

use super::note::Note;

/// Top-level view of the note list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    #[default]
    Notes,
    Favorites,
    Trash,
}

impl Filter {
    pub const ALL: &'static [Filter] = &[Filter::Notes, Filter::Favorites, Filter::Trash];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Notes => "Notes",
            Self::Favorites => "Favorites",
            Self::Trash => "Trash",
        }
    }

    /// Whether a note belongs to this view, ignoring category selection.
    pub fn admits(&self, note: &Note) -> bool {
        match self {
            Self::Notes => !note.trashed,
            Self::Favorites => note.favorited && !note.trashed,
            Self::Trash => note.trashed,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trashed_favorite_only_in_trash() {
        let mut note = Note::new("x", None, 0);
        note.favorited = true;
        note.trashed = true;
        assert!(!Filter::Notes.admits(&note));
        assert!(!Filter::Favorites.admits(&note));
        assert!(Filter::Trash.admits(&note));
    }

    #[test]
    fn default_is_notes() {
        assert_eq!(Filter::default(), Filter::Notes);
        assert_eq!(Filter::Favorites.to_string(), "Favorites");
    }

    #[test]
    fn serializes_by_name() {
        let json = serde_json::to_string(&Filter::ALL).unwrap();
        assert_eq!(json, r#"["Notes","Favorites","Trash"]"#);
    }
}
