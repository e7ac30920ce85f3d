use crate::api::{AnalystMap, ApiError, CreatedTicket, DetailForm, IncidexClient, Suggestion};
use crate::config::{CatalogEntry, Config};
use crate::form::assignee::AnalystDirectory;
use crate::form::attachments::SingleFilePick;
use crate::form::confirm::ConfirmFlow;
use crate::form::nav::{NavLink, NavMenu};
use crate::form::wizard::{Step, Wizard};
use crate::form::{suggest, Field, TicketForm};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Result of a background request, drained by `App::poll_loads`
#[derive(Debug)]
pub enum LoadResult {
    Analysts(Result<AnalystMap, ApiError>),
    Suggestion(Result<Suggestion, ApiError>),
    TicketCreated(Result<CreatedTicket, ApiError>),
    DetailSubmitted {
        form: DetailForm,
        value: i64,
        result: Result<(), ApiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Create,
    Detail,
}

/// Which select a dropdown is editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTarget {
    Field(Field),
    Detail(DetailForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Nav,
    Help,
    EditText(Field),
    Dropdown(SelectTarget),
    AttachPath,
    DetailFilePath,
    Confirm(DetailForm),
}

/// Clickable controls of the confirm modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalButton {
    Confirm,
    Cancel,
    Close,
}

/// Ticket detail page: status change, reassignment and the single-file input
#[derive(Debug, Clone)]
pub struct DetailPage {
    pub ticket_id: i64,
    pub status: ConfirmFlow,
    pub assign: ConfirmFlow,
    pub file: SingleFilePick,
}

impl DetailPage {
    pub fn new(ticket_id: i64, statuses: Vec<CatalogEntry>, status: Option<i64>, assignee: Option<i64>) -> Self {
        Self {
            ticket_id,
            status: ConfirmFlow::new(DetailForm::State, statuses, status),
            assign: ConfirmFlow::new(DetailForm::Assign, Vec::new(), assignee),
            file: SingleFilePick::default(),
        }
    }

    pub fn flow(&self, form: DetailForm) -> &ConfirmFlow {
        match form {
            DetailForm::State => &self.status,
            DetailForm::Assign => &self.assign,
        }
    }

    pub fn flow_mut(&mut self, form: DetailForm) -> &mut ConfirmFlow {
        match form {
            DetailForm::State => &mut self.status,
            DetailForm::Assign => &mut self.assign,
        }
    }
}

/// Command-line selection of the detail page to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailArgs {
    pub ticket_id: i64,
    pub status: Option<i64>,
    pub assignee: Option<i64>,
}

pub struct App {
    pub config: Config,
    pub client: IncidexClient,

    // UI state
    pub page: Page,
    pub input_mode: InputMode,
    pub nav: NavMenu,

    // Creation wizard
    pub wizard: Wizard,
    pub form: TicketForm,
    pub field_focus: usize,
    pub chip_focus: usize,
    pub directory: AnalystDirectory,
    pub suggestion_in_flight: bool,
    pub submitting: bool,
    pub created: Option<CreatedTicket>,

    // Detail page
    pub detail: Option<DetailPage>,

    // Text prompts and dropdowns
    pub path_input: String,
    pub filter_input: String,
    pub dropdown_list_state: ListState,
    fuzzy_matcher: SkimMatcherV2,

    // Status bar
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub status_set_at: Option<std::time::Instant>,

    // Loading overlay
    pub loading: bool,
    pub loading_message: String,
    pub spinner_frame: usize,

    // Hit areas recorded while drawing, for mouse handling
    pub modal_area: Option<Rect>,
    pub modal_buttons: Vec<(ModalButton, Rect)>,
    pub step_header_areas: Vec<(Step, Rect)>,

    tx: mpsc::Sender<LoadResult>,
    rx: mpsc::Receiver<LoadResult>,
}

impl App {
    pub fn new(config: Config, client: IncidexClient, detail: Option<DetailArgs>) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let form = TicketForm::new(&config.catalogs);
        let page = if detail.is_some() { Page::Detail } else { Page::Create };
        let detail = detail.map(|d| {
            DetailPage::new(d.ticket_id, config.catalogs.statuses.clone(), d.status, d.assignee)
        });

        let mut app = Self {
            config,
            client,
            page,
            input_mode: InputMode::Normal,
            nav: NavMenu::default(),
            wizard: Wizard::default(),
            form,
            field_focus: 0,
            chip_focus: 0,
            directory: AnalystDirectory::default(),
            suggestion_in_flight: false,
            submitting: false,
            created: None,
            detail,
            path_input: String::new(),
            filter_input: String::new(),
            dropdown_list_state: ListState::default(),
            fuzzy_matcher: SkimMatcherV2::default(),
            status_message: None,
            status_is_error: false,
            status_set_at: None,
            loading: false,
            loading_message: String::new(),
            spinner_frame: 0,
            modal_area: None,
            modal_buttons: Vec::new(),
            step_header_areas: Vec::new(),
            tx,
            rx,
        };
        // Resolve the department the form starts with; deferred until the map arrives.
        app.department_changed();
        app
    }

    // ========== Background requests ==========

    /// Fire the one analyst map fetch. Callers arriving before it settles are deferred.
    pub fn start_analysts_loader(&mut self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.analysts_by_dept().await;
            let _ = tx.send(LoadResult::Analysts(result)).await;
        });
    }

    fn start_suggestion(&mut self) {
        self.suggestion_in_flight = true;
        self.set_loading(true, "Asking for suggestions...");

        let client = self.client.clone();
        let tx = self.tx.clone();
        let title = self.form.title.clone();
        let description = self.form.description.clone();
        tokio::spawn(async move {
            let result = client.suggest(&title, &description).await;
            let _ = tx.send(LoadResult::Suggestion(result)).await;
        });
    }

    pub fn submit_ticket(&mut self) {
        if self.submitting {
            return;
        }
        self.submitting = true;
        self.set_loading(true, "Creating ticket...");

        let client = self.client.clone();
        let tx = self.tx.clone();
        let submission = self.form.to_submission();
        info!(files = submission.files.len(), "submitting ticket");
        tokio::spawn(async move {
            let result = client.create_ticket(&submission).await;
            let _ = tx.send(LoadResult::TicketCreated(result)).await;
        });
    }

    fn submit_detail(&mut self, form: DetailForm, value: i64, note: String) {
        let Some(detail) = &self.detail else {
            return;
        };
        let ticket_id = detail.ticket_id;
        self.set_status("Saving...");

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client
                .submit_detail(ticket_id, form, &value.to_string(), &note)
                .await;
            let _ = tx.send(LoadResult::DetailSubmitted { form, value, result }).await;
        });
    }

    /// Apply every finished background request (non-blocking)
    pub fn poll_loads(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.apply_load_result(result);
        }
    }

    pub fn apply_load_result(&mut self, result: LoadResult) {
        match result {
            LoadResult::Analysts(result) => {
                let current = self.form.department.selected;
                self.form.assignee = self.directory.settle(result, current);
                self.refresh_detail_assignees();
            }
            LoadResult::Suggestion(result) => {
                self.suggestion_in_flight = false;
                self.set_loading(false, "");
                match result {
                    Ok(suggestion) => {
                        if suggest::apply(&mut self.form, &suggestion) {
                            self.department_changed();
                        }
                    }
                    Err(e) => warn!(error = %e, "suggestion skipped"),
                }
                // Settled either way: move on to classification.
                self.wizard.open(Step::Classify);
                self.field_focus = 0;
            }
            LoadResult::TicketCreated(result) => {
                self.submitting = false;
                self.set_loading(false, "");
                match result {
                    Ok(created) => {
                        info!(location = %created.location, "ticket created");
                        let label = created
                            .ticket_id
                            .map(|id| format!("#{id}"))
                            .unwrap_or_else(|| created.location.clone());
                        self.set_status(format!("Ticket {label} created - o:open in browser"));
                        self.created = Some(created);
                        self.reset_wizard();
                    }
                    Err(e) => {
                        error!(error = %e, "ticket creation failed");
                        self.set_error(format!("Ticket not created: {e}"));
                    }
                }
            }
            LoadResult::DetailSubmitted { form, value, result } => {
                let Some(detail) = &mut self.detail else {
                    return;
                };
                let flow = detail.flow_mut(form);
                match result {
                    Ok(()) => {
                        flow.submitted(value);
                        let msg = format!("{}: saved", flow.title());
                        self.set_status(msg);
                    }
                    Err(e) => {
                        flow.rejected();
                        error!(error = %e, ?form, "detail form submission failed");
                        self.set_error(format!("Not saved: {e}"));
                    }
                }
            }
        }
    }

    fn refresh_detail_assignees(&mut self) {
        let options: Vec<CatalogEntry> = self
            .directory
            .all_analysts()
            .into_iter()
            .map(|a| CatalogEntry { id: a.id, name: a.name })
            .collect();
        if let Some(detail) = &mut self.detail {
            if !detail.assign.is_open() {
                detail.assign.replace_options(options);
            }
        }
    }

    fn reset_wizard(&mut self) {
        self.form = TicketForm::new(&self.config.catalogs);
        self.wizard = Wizard::default();
        self.field_focus = 0;
        self.chip_focus = 0;
        self.department_changed();
    }

    // ========== Wizard ==========

    /// Department select changed: recompute the default assignee.
    pub fn department_changed(&mut self) {
        if let Some(assignee) = self.directory.request(self.form.department.selected) {
            self.form.assignee = assignee;
        }
    }

    /// Wizard navigation is frozen while a suggestion request is pending.
    pub fn navigation_locked(&self) -> bool {
        self.suggestion_in_flight || self.submitting
    }

    pub fn next_step(&mut self) {
        if self.navigation_locked() {
            return;
        }
        match self.wizard.open_step() {
            Some(Step::Describe) if suggest::should_request(&self.form) => self.start_suggestion(),
            Some(Step::Review) => self.submit_ticket(),
            _ => {
                self.wizard.next();
                self.field_focus = 0;
            }
        }
    }

    pub fn prev_step(&mut self) {
        if self.navigation_locked() {
            return;
        }
        if self.wizard.prev().is_some() {
            self.field_focus = 0;
        }
    }

    pub fn toggle_step_header(&mut self, step: Step) {
        if self.navigation_locked() {
            return;
        }
        self.wizard.toggle_header(step);
        self.field_focus = 0;
    }

    pub fn focused_field(&self) -> Option<Field> {
        let fields = self.wizard.open_step()?.fields();
        fields.get(self.field_focus.min(fields.len().saturating_sub(1))).copied()
    }

    pub fn focus_next_field(&mut self) {
        let len = self.wizard.open_step().map(|s| s.fields().len()).unwrap_or(0);
        if len > 0 {
            self.field_focus = (self.field_focus + 1) % len;
        }
    }

    pub fn focus_prev_field(&mut self) {
        let len = self.wizard.open_step().map(|s| s.fields().len()).unwrap_or(0);
        if len > 0 {
            self.field_focus = (self.field_focus + len - 1) % len;
        }
    }

    pub fn chip_next(&mut self) {
        let len = self.form.attachments.len();
        if len > 0 {
            self.chip_focus = (self.chip_focus + 1) % len;
        }
    }

    pub fn chip_prev(&mut self) {
        let len = self.form.attachments.len();
        if len > 0 {
            self.chip_focus = (self.chip_focus + len - 1) % len;
        }
    }

    /// Add the file typed at the path prompt.
    pub fn add_attachment(&mut self, input: &str) {
        let path = expand_home(input.trim());
        match self.form.attachments.add_path(&path).map(|a| a.name.clone()) {
            Ok(name) => {
                self.chip_focus = self.form.attachments.len() - 1;
                self.set_status(format!("Attached {name}"));
            }
            Err(e) => {
                warn!(error = %e, "attachment rejected");
                self.set_error(format!("Cannot attach: {e}"));
            }
        }
    }

    pub fn remove_focused_attachment(&mut self) {
        if let Some(removed) = self.form.attachments.remove(self.chip_focus) {
            self.set_status(format!("Removed {}", removed.name));
        }
        self.chip_focus = self
            .chip_focus
            .min(self.form.attachments.len().saturating_sub(1));
    }

    pub fn open_created_in_browser(&mut self) {
        let Some(created) = &self.created else {
            return;
        };
        let url = if created.location.starts_with("http") {
            created.location.clone()
        } else {
            self.client.url(&created.location)
        };
        if let Err(e) = open::that(&url) {
            self.set_error(format!("Failed to open browser: {e}"));
        }
    }

    // ========== Navigation panel ==========

    pub fn toggle_nav(&mut self) {
        let expanded = self.nav.toggle();
        self.input_mode = if expanded { InputMode::Nav } else { InputMode::Normal };
    }

    pub fn follow_nav_link(&mut self) {
        let link = self.nav.activate();
        self.input_mode = InputMode::Normal;
        match link {
            NavLink::Create => self.page = Page::Create,
            NavLink::Detail => {
                if self.detail.is_some() {
                    self.page = Page::Detail;
                } else {
                    self.set_error("No ticket selected - start with `incidex detail <ID>`");
                }
            }
            other => {
                if let Some(path) = other.server_path() {
                    let url = self.client.url(path);
                    if let Err(e) = open::that(&url) {
                        self.set_error(format!("Failed to open browser: {e}"));
                    }
                }
            }
        }
    }

    // ========== Dropdowns ==========

    pub fn open_dropdown(&mut self, target: SelectTarget) {
        self.filter_input.clear();
        self.dropdown_list_state.select(Some(0));
        self.input_mode = InputMode::Dropdown(target);
    }

    fn options_for(&self, target: SelectTarget) -> &[CatalogEntry] {
        match target {
            SelectTarget::Field(field) => self
                .form
                .select(field)
                .map(|s| s.options.as_slice())
                .unwrap_or(&[]),
            SelectTarget::Detail(form) => self
                .detail
                .as_ref()
                .map(|d| d.flow(form).select.options.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Options of `target` matching the fuzzy filter input
    pub fn filtered_options(&self, target: SelectTarget) -> Vec<CatalogEntry> {
        let options = self.options_for(target);
        if self.filter_input.is_empty() {
            return options.to_vec();
        }
        options
            .iter()
            .filter(|o| self.fuzzy_matcher.fuzzy_match(&o.name, &self.filter_input).is_some())
            .cloned()
            .collect()
    }

    pub fn dropdown_next(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        let i = self.dropdown_list_state.selected().map(|i| (i + 1) % max).unwrap_or(0);
        self.dropdown_list_state.select(Some(i));
    }

    pub fn dropdown_prev(&mut self, max: usize) {
        if max == 0 {
            return;
        }
        let i = self
            .dropdown_list_state
            .selected()
            .map(|i| if i == 0 { max - 1 } else { i - 1 })
            .unwrap_or(0);
        self.dropdown_list_state.select(Some(i));
    }

    /// Commit the highlighted dropdown entry to its select.
    pub fn choose_dropdown_entry(&mut self, target: SelectTarget) {
        let options = self.filtered_options(target);
        let chosen = self
            .dropdown_list_state
            .selected()
            .and_then(|i| options.get(i))
            .map(|o| o.id);
        self.filter_input.clear();
        self.input_mode = InputMode::Normal;

        let Some(id) = chosen else {
            return;
        };
        self.select_value(target, id);
    }

    pub fn select_value(&mut self, target: SelectTarget, id: i64) {
        match target {
            SelectTarget::Field(field) => {
                if let Some(select) = self.form.select_mut(field) {
                    select.set(id);
                }
                if field == Field::Department {
                    self.department_changed();
                }
            }
            SelectTarget::Detail(form) => {
                let Some(detail) = &mut self.detail else {
                    return;
                };
                if detail.flow_mut(form).change(Some(id)) {
                    self.input_mode = InputMode::Confirm(form);
                }
            }
        }
    }

    // ========== Detail page ==========

    pub fn confirm_modal(&mut self, form: DetailForm) {
        self.input_mode = InputMode::Normal;
        self.modal_area = None;
        self.modal_buttons.clear();
        let Some(detail) = &mut self.detail else {
            return;
        };
        if let Some(pending) = detail.flow_mut(form).confirm() {
            self.submit_detail(pending.form, pending.value, pending.note);
        }
    }

    pub fn cancel_modal(&mut self, form: DetailForm) {
        self.input_mode = InputMode::Normal;
        self.modal_area = None;
        self.modal_buttons.clear();
        if let Some(detail) = &mut self.detail {
            detail.flow_mut(form).cancel();
        }
    }

    /// Mouse click at (column, row); a click outside an open modal is a backdrop click.
    pub fn click(&mut self, column: u16, row: u16) {
        let inside = |r: &Rect| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        };
        if let InputMode::Confirm(form) = self.input_mode {
            let button = self
                .modal_buttons
                .iter()
                .find(|(_, r)| inside(r))
                .map(|(button, _)| *button);
            match button {
                Some(ModalButton::Confirm) => self.confirm_modal(form),
                Some(ModalButton::Cancel | ModalButton::Close) => self.cancel_modal(form),
                None => {
                    if let Some(area) = self.modal_area {
                        if !inside(&area) {
                            self.cancel_modal(form);
                        }
                    }
                }
            }
            return;
        }
        if self.input_mode == InputMode::Normal && self.page == Page::Create {
            let hit = self
                .step_header_areas
                .iter()
                .find(|(_, r)| inside(r))
                .map(|(step, _)| *step);
            if let Some(step) = hit {
                self.toggle_step_header(step);
            }
        }
    }

    pub fn choose_detail_file(&mut self, input: &str) {
        let path = expand_home(input.trim());
        let Some(detail) = &mut self.detail else {
            return;
        };
        if let Err(e) = detail.file.choose(&path).map(|_| ()) {
            warn!(error = %e, "file pick rejected");
            self.set_error(format!("Cannot use file: {e}"));
        }
    }

    // ========== Status & loading ==========

    pub fn set_loading(&mut self, loading: bool, message: &str) {
        self.loading = loading;
        self.loading_message = message.to_string();
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 10;
    }

    pub fn spinner_char(&self) -> &'static str {
        const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
        SPINNER[self.spinner_frame]
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
        self.status_set_at = Some(std::time::Instant::now());
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = true;
        self.status_set_at = Some(std::time::Instant::now());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
        self.status_set_at = None;
    }

    /// Clear status message if it's older than 5 seconds
    pub fn clear_expired_status(&mut self) {
        if let Some(set_at) = self.status_set_at {
            if set_at.elapsed() > std::time::Duration::from_secs(5) {
                self.clear_status();
            }
        }
    }
}

fn expand_home(input: &str) -> PathBuf {
    match input.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(input)),
        None => PathBuf::from(input),
    }
}
