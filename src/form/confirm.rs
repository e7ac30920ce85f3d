use super::Select;
use crate::api::DetailForm;
use crate::config::CatalogEntry;

/// Values copied out of the modal right before the form is posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub form: DetailForm,
    pub value: i64,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteModal {
    pub note: String,
}

/// A select whose changes must be confirmed in a modal before they are posted.
///
/// `previous` is the last value the server accepted. `committed` is what the
/// select showed for it, which is `None` when `previous` is not among the
/// options. Cancelling in any way puts the select back on `committed`; only a
/// confirmed, accepted submission moves either.
#[derive(Debug, Clone)]
pub struct ConfirmFlow {
    pub form: DetailForm,
    pub select: Select,
    previous: Option<i64>,
    committed: Option<i64>,
    modal: Option<NoteModal>,
}

impl ConfirmFlow {
    pub fn new(form: DetailForm, options: Vec<CatalogEntry>, previous: Option<i64>) -> Self {
        let mut select = Select::new(options);
        select.set_value(previous);
        Self {
            form,
            committed: select.selected,
            select,
            previous,
            modal: None,
        }
    }

    pub fn previous(&self) -> Option<i64> {
        self.previous
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_some()
    }

    pub fn modal(&self) -> Option<&NoteModal> {
        self.modal.as_ref()
    }

    pub fn note_mut(&mut self) -> Option<&mut String> {
        self.modal.as_mut().map(|m| &mut m.note)
    }

    pub fn title(&self) -> &'static str {
        match self.form {
            DetailForm::State => "Change status",
            DetailForm::Assign => "Reassign ticket",
        }
    }

    pub fn description(&self) -> String {
        match self.form {
            DetailForm::State => format!("Move the ticket to '{}'?", self.select.label()),
            DetailForm::Assign => format!("Assign the ticket to {}?", self.select.label()),
        }
    }

    /// Swap the option list (e.g. once analysts arrive) and reselect the stored value.
    pub fn replace_options(&mut self, options: Vec<CatalogEntry>) {
        self.select.options = options;
        self.select.selected = None;
        self.select.set_value(self.previous);
        self.committed = self.select.selected;
    }

    /// The user picked `value` in the select. Returns true when the modal opened.
    pub fn change(&mut self, value: Option<i64>) -> bool {
        self.select.set_value(value);
        let Some(value) = self.select.selected else {
            return false;
        };
        if Some(value) == self.previous {
            return false;
        }
        self.modal = Some(NoteModal::default());
        true
    }

    /// Cancel button, close button, Esc or a click on the backdrop.
    pub fn cancel(&mut self) {
        self.modal = None;
        self.select.selected = self.committed;
    }

    pub fn confirm(&mut self) -> Option<PendingSubmission> {
        let modal = self.modal.take()?;
        let value = self.select.selected?;
        Some(PendingSubmission {
            form: self.form,
            value,
            note: modal.note,
        })
    }

    /// The server accepted the confirmed submission.
    pub fn submitted(&mut self, value: i64) {
        self.previous = Some(value);
        self.committed = Some(value);
    }

    /// The server did not accept it; the select goes back to what is stored.
    pub fn rejected(&mut self) {
        self.select.selected = self.committed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::{catalogs, entry};

    fn status_flow() -> ConfirmFlow {
        ConfirmFlow::new(DetailForm::State, catalogs().statuses, Some(1))
    }

    #[test]
    fn test_same_value_does_not_open_modal() {
        let mut flow = status_flow();
        assert!(!flow.change(Some(1)));
        assert!(!flow.is_open());
    }

    #[test]
    fn test_empty_value_does_not_open_modal() {
        let mut flow = status_flow();
        assert!(!flow.change(None));
        assert!(!flow.is_open());
    }

    #[test]
    fn test_cancel_restores_previous_value() {
        let mut flow = status_flow();
        assert!(flow.change(Some(2)));
        assert_eq!(flow.select.selected, Some(2));

        flow.cancel();
        assert!(!flow.is_open());
        assert_eq!(flow.select.selected, Some(1));
        assert_eq!(flow.previous(), Some(1));
    }

    #[test]
    fn test_confirm_submits_new_value_with_note() {
        let mut flow = status_flow();
        flow.change(Some(2));
        flow.note_mut().unwrap().push_str("Comenzando a trabajar");

        let pending = flow.confirm().unwrap();
        assert_eq!(
            pending,
            PendingSubmission {
                form: DetailForm::State,
                value: 2,
                note: "Comenzando a trabajar".into(),
            }
        );
        assert!(!flow.is_open());
        assert_eq!(flow.previous(), Some(1), "previous moves only once accepted");

        flow.submitted(2);
        assert_eq!(flow.previous(), Some(2));
        assert!(!flow.change(Some(2)));
    }

    #[test]
    fn test_rejected_submission_reverts_select() {
        let mut flow = status_flow();
        flow.change(Some(3));
        let _ = flow.confirm();
        flow.rejected();
        assert_eq!(flow.select.selected, Some(1));
    }

    #[test]
    fn test_cancel_restores_value_missing_from_options() {
        // Unassigned ticket: id 0 is never one of the analysts.
        let mut flow = ConfirmFlow::new(
            DetailForm::Assign,
            vec![entry(7, "Ana"), entry(8, "Luis")],
            Some(0),
        );
        let before = flow.select.selected;
        assert_eq!(before, None);

        assert!(flow.change(Some(8)));
        flow.cancel();
        assert_eq!(flow.select.selected, before);
        assert_eq!(flow.previous(), Some(0));
    }

    #[test]
    fn test_rejected_restores_value_missing_from_options() {
        let mut flow = ConfirmFlow::new(DetailForm::State, catalogs().statuses, Some(42));
        flow.change(Some(2));
        let _ = flow.confirm();
        flow.rejected();
        assert_eq!(flow.select.selected, None);
    }

    #[test]
    fn test_replace_options_drops_stale_selection() {
        let mut flow = ConfirmFlow::new(DetailForm::Assign, vec![entry(7, "Ana")], Some(7));
        flow.replace_options(vec![entry(8, "Luis")]);
        assert_eq!(flow.select.selected, None);

        flow.change(Some(8));
        flow.cancel();
        assert_eq!(flow.select.selected, None);
    }

    #[test]
    fn test_confirm_without_modal_is_noop() {
        let mut flow = status_flow();
        assert_eq!(flow.confirm(), None);
    }

    #[test]
    fn test_reassign_flow_is_independent() {
        let mut status = status_flow();
        let mut assign = ConfirmFlow::new(
            DetailForm::Assign,
            vec![entry(7, "Ana"), entry(8, "Luis")],
            Some(7),
        );

        status.change(Some(2));
        assign.change(Some(8));
        assign.cancel();

        assert!(status.is_open());
        assert_eq!(assign.select.selected, Some(7));
        assert_eq!(assign.description(), "Assign the ticket to Ana?");
    }
}
