use crate::app::{App, InputMode, Page, SelectTarget};
use crate::api::DetailForm;
use crate::form::wizard::Step;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::prelude::*;
use std::time::{Duration, Instant};

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    // The analyst map is fetched once; department changes before it lands are deferred.
    app.start_analysts_loader();

    let mut last_spinner_tick = Instant::now();
    let spinner_interval = Duration::from_millis(80);

    loop {
        if app.loading && last_spinner_tick.elapsed() >= spinner_interval {
            app.tick_spinner();
            last_spinner_tick = Instant::now();
        }

        app.poll_loads();
        app.clear_expired_status();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with short timeout for responsive UI
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        app.click(mouse.column, mouse.row);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.input_mode {
        InputMode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.input_mode = InputMode::Normal;
            }
            _ => {}
        },

        InputMode::Nav => match key.code {
            KeyCode::Esc | KeyCode::Char('m') => app.toggle_nav(),
            KeyCode::Char('j') | KeyCode::Down => app.nav.next(),
            KeyCode::Char('k') | KeyCode::Up => app.nav.prev(),
            KeyCode::Enter => app.follow_nav_link(),
            _ => {}
        },

        InputMode::EditText(field) => {
            let Some(text) = app.form.text_mut(field) else {
                app.input_mode = InputMode::Normal;
                return false;
            };
            match key.code {
                KeyCode::Esc => app.input_mode = InputMode::Normal,
                // Description is multi-line; Esc leaves it.
                KeyCode::Enter if field == crate::form::Field::Description => text.push('\n'),
                KeyCode::Enter => app.input_mode = InputMode::Normal,
                KeyCode::Backspace => {
                    text.pop();
                }
                KeyCode::Char(c) => text.push(c),
                _ => {}
            }
        }

        InputMode::Dropdown(target) => {
            let options = app.filtered_options(target);
            match key.code {
                KeyCode::Esc => {
                    app.filter_input.clear();
                    app.input_mode = InputMode::Normal;
                }
                KeyCode::Down => app.dropdown_next(options.len()),
                KeyCode::Up => app.dropdown_prev(options.len()),
                KeyCode::Enter => app.choose_dropdown_entry(target),
                KeyCode::Backspace => {
                    app.filter_input.pop();
                    app.dropdown_list_state.select(Some(0));
                }
                KeyCode::Char(c) => {
                    app.filter_input.push(c);
                    app.dropdown_list_state.select(Some(0));
                }
                _ => {}
            }
        }

        InputMode::AttachPath | InputMode::DetailFilePath => match key.code {
            KeyCode::Esc => {
                app.path_input.clear();
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut app.path_input);
                let mode = app.input_mode;
                app.input_mode = InputMode::Normal;
                if !input.trim().is_empty() {
                    if mode == InputMode::AttachPath {
                        app.add_attachment(&input);
                    } else {
                        app.choose_detail_file(&input);
                    }
                }
            }
            KeyCode::Backspace => {
                app.path_input.pop();
            }
            KeyCode::Char(c) => app.path_input.push(c),
            _ => {}
        },

        InputMode::Confirm(form) => match key.code {
            KeyCode::Esc => app.cancel_modal(form),
            KeyCode::Enter => app.confirm_modal(form),
            KeyCode::Backspace => {
                if let Some(note) = modal_note(app, form) {
                    note.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(note) = modal_note(app, form) {
                    note.push(c);
                }
            }
            _ => {}
        },

        InputMode::Normal => {
            match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('?') => app.input_mode = InputMode::Help,
                KeyCode::Char('m') => app.toggle_nav(),
                _ => match app.page {
                    Page::Create => handle_create_key(app, key),
                    Page::Detail => handle_detail_key(app, key),
                },
            }
        }
    }

    false
}

fn modal_note(app: &mut App, form: DetailForm) -> Option<&mut String> {
    app.detail.as_mut()?.flow_mut(form).note_mut()
}

fn handle_create_key(app: &mut App, key: KeyEvent) {
    let open = app.wizard.open_step();
    match key.code {
        KeyCode::Tab | KeyCode::Char('j') | KeyCode::Down => {
            if open == Some(Step::Attach) {
                app.chip_next();
            } else {
                app.focus_next_field();
            }
        }
        KeyCode::BackTab | KeyCode::Char('k') | KeyCode::Up => {
            if open == Some(Step::Attach) {
                app.chip_prev();
            } else {
                app.focus_prev_field();
            }
        }
        KeyCode::Enter => {
            if let Some(field) = app.focused_field() {
                if field.is_text() {
                    app.input_mode = InputMode::EditText(field);
                } else {
                    app.open_dropdown(SelectTarget::Field(field));
                }
            }
        }
        KeyCode::Char('n') => app.next_step(),
        KeyCode::Char('p') => app.prev_step(),
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(step) = c.to_digit(10).and_then(|n| Step::from_number(n as usize)) {
                app.toggle_step_header(step);
            }
        }
        KeyCode::Char('a') if open == Some(Step::Attach) => {
            app.path_input.clear();
            app.input_mode = InputMode::AttachPath;
        }
        KeyCode::Char('d') if open == Some(Step::Attach) => app.remove_focused_attachment(),
        KeyCode::Char('s') if open == Some(Step::Review) => app.next_step(),
        KeyCode::Char('o') => app.open_created_in_browser(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    if app.detail.is_none() {
        return;
    }
    match key.code {
        KeyCode::Char('s') => app.open_dropdown(SelectTarget::Detail(DetailForm::State)),
        KeyCode::Char('r') => app.open_dropdown(SelectTarget::Detail(DetailForm::Assign)),
        KeyCode::Char('f') => {
            app.path_input.clear();
            app.input_mode = InputMode::DetailFilePath;
        }
        _ => {}
    }
}
