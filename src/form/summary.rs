use super::TicketForm;

pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// Review-step projection of the form: trimmed text, selected labels, `—` for blanks.
pub fn rows(form: &TicketForm) -> Vec<SummaryRow> {
    [
        ("Title", form.title.trim()),
        ("Description", form.description.trim()),
        ("Category", form.category.label()),
        ("Area", form.department.label()),
        ("Priority", form.priority.label()),
        ("Assigned to", form.assignee.label()),
    ]
    .into_iter()
    .map(|(label, value)| SummaryRow {
        label,
        value: if value.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            value.to_string()
        },
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::catalogs;
    use crate::form::Assignee;

    fn value_of<'a>(rows: &'a [SummaryRow], label: &str) -> &'a str {
        &rows.iter().find(|r| r.label == label).unwrap().value
    }

    #[test]
    fn test_empty_form_is_all_placeholders() {
        let form = TicketForm::new(&catalogs());
        let rows = rows(&form);
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.value == PLACEHOLDER));
    }

    #[test]
    fn test_trims_text_and_uses_option_labels() {
        let mut form = TicketForm::new(&catalogs());
        form.title = "  Sin red en piso 2 ".into();
        form.description = "   ".into();
        form.category.set(2);
        form.department.set(3);
        form.assignee = Assignee { id: 7, name: "Ana".into() };

        let rows = rows(&form);
        assert_eq!(value_of(&rows, "Title"), "Sin red en piso 2");
        assert_eq!(value_of(&rows, "Description"), PLACEHOLDER);
        assert_eq!(value_of(&rows, "Category"), "Software");
        assert_eq!(value_of(&rows, "Area"), "Redes");
        assert_eq!(value_of(&rows, "Priority"), PLACEHOLDER);
        assert_eq!(value_of(&rows, "Assigned to"), "Ana");
    }

    #[test]
    fn test_follows_later_edits() {
        let mut form = TicketForm::new(&catalogs());
        form.priority.set(1);
        assert_eq!(value_of(&rows(&form), "Priority"), "Baja");
        form.priority.set(2);
        assert_eq!(value_of(&rows(&form), "Priority"), "Alta");
        form.priority.set_value(None);
        assert_eq!(value_of(&rows(&form), "Priority"), PLACEHOLDER);
    }
}
