use crate::core::filter::Filter;
use crate::core::id::Id;
use crate::core::note::Note;

/// Notes visible under a filter and optional category, in collection order.
pub fn project<'a>(notes: &'a [Note], filter: Filter, category_id: Option<&Id>) -> Vec<&'a Note> {
    notes
        .iter()
        .filter(|n| filter.admits(n))
        .filter(|n| category_id.is_none_or(|c| n.category_id.as_ref() == Some(c)))
        .collect()
}

/// Newest first, for list display. Ties keep projection order.
pub fn sorted_for_display<'a>(visible: &[&'a Note]) -> Vec<&'a Note> {
    let mut sorted = visible.to_vec();
    sorted.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(favorited: bool, trashed: bool, category_id: Option<Id>) -> Note {
        let mut n = Note::new("n", category_id, 0);
        n.favorited = favorited;
        n.trashed = trashed;
        n
    }

    fn ids(visible: &[&Note]) -> Vec<Id> {
        visible.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn favorites_within_category() {
        let work = Id::from("work");
        let home = Id::from("home");
        let notes = vec![
            note(true, false, Some(work.clone())),
            note(true, false, Some(home)),
            note(false, false, Some(work.clone())),
        ];
        let visible = project(&notes, Filter::Favorites, Some(&work));
        assert_eq!(ids(&visible), vec![notes[0].id.clone()]);
    }

    #[test]
    fn notes_view_hides_trashed_in_category() {
        let work = Id::from("work");
        let notes = vec![note(false, true, Some(work.clone())), note(false, false, Some(work.clone()))];
        assert_eq!(ids(&project(&notes, Filter::Notes, Some(&work))), vec![notes[1].id.clone()]);
        assert_eq!(ids(&project(&notes, Filter::Trash, Some(&work))), vec![notes[0].id.clone()]);
    }

    #[test]
    fn no_category_shows_everything_in_filter() {
        let notes = vec![note(false, false, Some(Id::generate())), note(false, false, None)];
        assert_eq!(project(&notes, Filter::Notes, None).len(), 2);
        assert!(project(&notes, Filter::Trash, None).is_empty());
    }

    #[test]
    fn projection_is_repeatable() {
        let notes = vec![note(true, false, None), note(false, true, None), note(false, false, None)];
        for filter in Filter::ALL {
            assert_eq!(
                ids(&project(&notes, *filter, None)),
                ids(&project(&notes, *filter, None))
            );
        }
    }

    #[test]
    fn display_sort_newest_first_and_stable() {
        let mut a = note(false, false, None);
        a.last_modified = 5;
        let mut b = note(false, false, None);
        b.last_modified = 9;
        let mut c = note(false, false, None);
        c.last_modified = 5;
        let notes = vec![a.clone(), b.clone(), c.clone()];
        let visible = project(&notes, Filter::Notes, None);
        assert_eq!(ids(&sorted_for_display(&visible)), vec![b.id.clone(), a.id.clone(), c.id.clone()]);
        // Projection order is untouched.
        assert_eq!(ids(&visible), vec![a.id, b.id, c.id]);
    }
}
