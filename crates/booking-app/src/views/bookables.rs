use super::select_or_first;
use crate::model::{Bookable, BookableId};
use crate::routes::bookable_url;
use std::fmt::Write;

/// The bookables page: a group picker, the bookables of the selected group and
/// the details of the selected bookable.
#[derive(Debug, Clone)]
pub struct BookablesView<'a> {
    bookables: &'a [Bookable],
    selected: Option<&'a Bookable>,
}

impl<'a> BookablesView<'a> {
    pub fn new(bookables: &'a [Bookable], id: Option<BookableId>) -> Self {
        Self {
            bookables,
            selected: select_or_first(bookables, id),
        }
    }

    pub fn selected(&self) -> Option<&'a Bookable> {
        self.selected
    }

    /// Distinct groups in order of first appearance.
    pub fn groups(&self) -> Vec<&'a str> {
        let mut groups: Vec<&str> = Vec::new();
        for bookable in self.bookables {
            if !groups.contains(&bookable.group.as_str()) {
                groups.push(&bookable.group);
            }
        }
        groups
    }

    /// Bookables in the selected bookable's group.
    pub fn group_list(&self) -> Vec<&'a Bookable> {
        match self.selected {
            Some(selected) => self
                .bookables
                .iter()
                .filter(|b| b.group == selected.group)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn render(&self) -> String {
        let Some(selected) = self.selected else {
            return "No bookables.\n".to_string();
        };

        let mut out = String::new();
        let _ = writeln!(out, "Groups: {}", self.groups().join(", "));
        let _ = writeln!(out, "[{}]", selected.group);
        for bookable in self.group_list() {
            let marker = if bookable.id == selected.id { ">" } else { " " };
            let _ = writeln!(out, "{marker} {:<24} {}", bookable.title, bookable_url(bookable.id));
        }
        out.push('\n');
        out.push_str(&details(selected));
        out
    }
}

/// Title, notes and availability of one bookable.
pub fn details(bookable: &Bookable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", bookable.title);
    if !bookable.notes.is_empty() {
        let _ = writeln!(out, "{}", bookable.notes);
    }
    let days = bookable.day_names();
    let sessions = bookable.session_names();
    if days.is_empty() || sessions.is_empty() {
        let _ = writeln!(out, "Not available");
    } else {
        let _ = writeln!(out, "Availability");
        let _ = writeln!(out, "  Days:     {}", days.join(", "));
        let _ = writeln!(out, "  Sessions: {}", sessions.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookables() -> Vec<Bookable> {
        vec![
            Bookable {
                notes: "Seats 8".into(),
                days: vec![1, 2],
                sessions: vec![0, 4],
                ..Bookable::new(BookableId(1), "Rooms", "Meeting Room")
            },
            Bookable::new(BookableId(2), "Kit", "Projector"),
            Bookable::new(BookableId(3), "Rooms", "Lecture Hall"),
        ]
    }

    #[test]
    fn test_groups_and_group_list() {
        let items = bookables();
        let view = BookablesView::new(&items, Some(BookableId(3)));

        assert_eq!(view.groups(), vec!["Rooms", "Kit"]);
        assert_eq!(view.selected().map(|b| b.id), Some(BookableId(3)));
        let titles: Vec<_> = view.group_list().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Meeting Room", "Lecture Hall"]);
    }

    #[test]
    fn test_render_marks_selection_and_details() {
        let items = bookables();
        let text = BookablesView::new(&items, None).render();

        assert!(text.contains("> Meeting Room"));
        assert!(text.contains("/bookables/3"));
        assert!(text.contains("Seats 8"));
        assert!(text.contains("Days:     Monday, Tuesday"));
        assert!(text.contains("Sessions: Breakfast, Evening"));
        assert!(!text.contains("Projector"));
    }

    #[test]
    fn test_empty() {
        let view = BookablesView::new(&[], Some(BookableId(1)));
        assert!(view.selected().is_none());
        assert!(view.group_list().is_empty());
        assert_eq!(view.render(), "No bookables.\n");
    }

    #[test]
    fn test_unavailable_details() {
        let bookable = Bookable::new(BookableId(2), "Kit", "Projector");
        assert_eq!(details(&bookable), "Projector\nNot available\n");
    }
}
