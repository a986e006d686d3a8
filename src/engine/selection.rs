use crate::core::filter::Filter;
use crate::core::id::Id;
use crate::core::note::Note;

/// What the user is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub filter: Filter,
    pub category_id: Option<Id>,
    pub active_note_id: Option<Id>,
}

/// Keep the active note if it is still visible, otherwise fall back to the
/// first visible note, or nothing when the view is empty.
pub fn reconcile(active: Option<&Id>, visible: &[&Note]) -> Option<Id> {
    match active {
        Some(id) if visible.iter().any(|n| &n.id == id) => Some(id.clone()),
        _ => visible.first().map(|n| n.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_active_is_kept() {
        let a = Note::new("a", None, 0);
        let b = Note::new("b", None, 0);
        assert_eq!(reconcile(Some(&b.id), &[&a, &b]), Some(b.id.clone()));
    }

    #[test]
    fn hidden_active_moves_to_first() {
        let a = Note::new("a", None, 0);
        let b = Note::new("b", None, 0);
        assert_eq!(reconcile(Some(&Id::from("gone")), &[&a, &b]), Some(a.id.clone()));
        assert_eq!(reconcile(None, &[&b]), Some(b.id.clone()));
    }

    #[test]
    fn empty_view_clears() {
        assert_eq!(reconcile(Some(&Id::generate()), &[]), None);
    }
}
