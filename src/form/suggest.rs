use super::TicketForm;
use crate::api::Suggestion;
use tracing::debug;

/// Only ask for a suggestion when there is something to classify.
pub fn should_request(form: &TicketForm) -> bool {
    !form.title.trim().is_empty() || !form.description.trim().is_empty()
}

/// Copy a suggestion into the form. Returns true when the department was
/// touched, so the caller can re-run the department change handler.
pub fn apply(form: &mut TicketForm, suggestion: &Suggestion) -> bool {
    if let Some(id) = suggestion.category_id {
        if !form.category.set(id) {
            debug!(id, "suggested category is not an option");
        }
    }
    if let Some(id) = suggestion.priority_id {
        if !form.priority.set(id) {
            debug!(id, "suggested priority is not an option");
        }
    }
    let department_changed = match suggestion.department_id {
        Some(id) => {
            if !form.department.set(id) {
                debug!(id, "suggested department is not an option");
            }
            true
        }
        None => false,
    };

    form.advice = suggestion
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from);

    department_changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::catalogs;

    #[test]
    fn test_should_request_needs_title_or_description() {
        let mut form = TicketForm::new(&catalogs());
        assert!(!should_request(&form));
        form.title = "   ".into();
        assert!(!should_request(&form));
        form.description = "La impresora no responde".into();
        assert!(should_request(&form));
    }

    #[test]
    fn test_apply_sets_selects_and_advice() {
        let mut form = TicketForm::new(&catalogs());
        let suggestion = Suggestion {
            category_id: Some(1),
            priority_id: Some(2),
            department_id: Some(3),
            reason: Some("Es un problema de conectividad".into()),
            error: None,
        };

        assert!(apply(&mut form, &suggestion));
        assert_eq!(form.category.selected, Some(1));
        assert_eq!(form.priority.selected, Some(2));
        assert_eq!(form.department.selected, Some(3));
        assert_eq!(form.advice.as_deref(), Some("Es un problema de conectividad"));
    }

    #[test]
    fn test_apply_keeps_selection_for_unknown_ids() {
        let mut form = TicketForm::new(&catalogs());
        form.category.set(2);
        let suggestion = Suggestion {
            category_id: Some(99),
            ..Suggestion::default()
        };

        assert!(!apply(&mut form, &suggestion));
        assert_eq!(form.category.selected, Some(2));
        assert_eq!(form.advice, None);
    }
}
