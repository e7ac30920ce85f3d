//! Form state for the creation wizard and the detail page.
//!
//! These types are the system of record: the UI renders from them and the
//! submissions are built from them, never from what happens to be on screen.

pub mod assignee;
pub mod attachments;
pub mod confirm;
pub mod nav;
pub mod suggest;
pub mod summary;
pub mod wizard;

use crate::api::TicketSubmission;
use crate::config::{CatalogEntry, Catalogs};
use attachments::Attachments;

/// A `<select>`: fixed options plus at most one selected id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    pub options: Vec<CatalogEntry>,
    pub selected: Option<i64>,
}

impl Select {
    pub fn new(options: Vec<CatalogEntry>) -> Self {
        Self {
            options,
            selected: None,
        }
    }

    /// Select `id` if it is one of the options. Unknown ids leave the selection untouched.
    pub fn set(&mut self, id: i64) -> bool {
        if self.options.iter().any(|o| o.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn set_value(&mut self, value: Option<i64>) {
        match value {
            Some(id) => {
                self.set(id);
            }
            None => self.selected = None,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.options.iter().position(|o| o.id == id)
    }

    /// Label of the selected option, empty when nothing is selected.
    pub fn label(&self) -> &str {
        self.selected_index()
            .map(|i| self.options[i].name.as_str())
            .unwrap_or("")
    }

    /// Wire value: the id as text, empty when nothing is selected.
    pub fn value(&self) -> String {
        self.selected.map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Analyst the ticket will be assigned to. Id `0` is the "unassigned" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignee {
    pub id: i64,
    pub name: String,
}

impl Assignee {
    pub const UNASSIGNED_ID: i64 = 0;

    pub fn unassigned() -> Self {
        Self::default()
    }

    pub fn is_unassigned(&self) -> bool {
        self.id == Self::UNASSIGNED_ID
    }

    pub fn label(&self) -> &str {
        if self.is_unassigned() {
            ""
        } else {
            &self.name
        }
    }
}

/// Editable fields of the wizard, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Category,
    Department,
    Priority,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Category => "Category",
            Self::Department => "Area",
            Self::Priority => "Priority",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Title | Self::Description)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TicketForm {
    pub title: String,
    pub description: String,
    pub category: Select,
    pub department: Select,
    pub priority: Select,
    pub assignee: Assignee,
    pub attachments: Attachments,
    /// Rationale returned by the suggestion service, shown as advisory text
    pub advice: Option<String>,
}

impl TicketForm {
    pub fn new(catalogs: &Catalogs) -> Self {
        Self {
            category: Select::new(catalogs.categories.clone()),
            department: Select::new(catalogs.departments.clone()),
            priority: Select::new(catalogs.priorities.clone()),
            ..Self::default()
        }
    }

    pub fn select(&self, field: Field) -> Option<&Select> {
        match field {
            Field::Category => Some(&self.category),
            Field::Department => Some(&self.department),
            Field::Priority => Some(&self.priority),
            Field::Title | Field::Description => None,
        }
    }

    pub fn select_mut(&mut self, field: Field) -> Option<&mut Select> {
        match field {
            Field::Category => Some(&mut self.category),
            Field::Department => Some(&mut self.department),
            Field::Priority => Some(&mut self.priority),
            Field::Title | Field::Description => None,
        }
    }

    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Title => Some(&mut self.title),
            Field::Description => Some(&mut self.description),
            _ => None,
        }
    }

    pub fn to_submission(&self) -> TicketSubmission {
        TicketSubmission {
            subject: self.title.clone(),
            details: self.description.clone(),
            category_id: self.category.value(),
            department_id: self.department.value(),
            priority_id: self.priority.value(),
            assignee_id: self.assignee.id.to_string(),
            files: self.attachments.to_uploads(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_select_ignores_unknown_ids() {
        let mut select = Select::new(vec![entry(1, "Baja"), entry(2, "Alta")]);
        assert!(select.set(2));
        assert!(!select.set(7));
        assert_eq!(select.selected, Some(2));
        assert_eq!(select.label(), "Alta");
        assert_eq!(select.value(), "2");
    }

    #[test]
    fn test_empty_select_projects_to_empty_strings() {
        let select = Select::new(vec![entry(1, "Baja")]);
        assert_eq!(select.label(), "");
        assert_eq!(select.value(), "");
    }

    #[test]
    fn test_submission_uses_unassigned_sentinel() {
        let mut form = TicketForm::new(&catalogs());
        form.title = "Impresora".into();
        form.description = "No imprime".into();
        form.category.set(1);
        form.department.set(3);
        form.priority.set(2);

        let submission = form.to_submission();
        assert_eq!(submission.subject, "Impresora");
        assert_eq!(submission.category_id, "1");
        assert_eq!(submission.department_id, "3");
        assert_eq!(submission.priority_id, "2");
        assert_eq!(submission.assignee_id, "0");
        assert!(submission.files.is_empty());
    }
}
