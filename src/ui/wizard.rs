use crate::app::{App, InputMode};
use crate::form::summary;
use crate::form::wizard::Step;
use crate::form::Field;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Accordion of the four steps: one header line each, the open step's body below its header.
pub fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let open = app.wizard.open_step();

    let mut constraints = Vec::new();
    for step in Step::ALL {
        constraints.push(Constraint::Length(1));
        if open == Some(step) {
            constraints.push(Constraint::Min(0));
        }
    }
    if open.is_none() {
        constraints.push(Constraint::Min(0));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    app.step_header_areas.clear();
    let mut idx = 0;
    for step in Step::ALL {
        draw_step_header(f, app, step, chunks[idx]);
        app.step_header_areas.push((step, chunks[idx]));
        idx += 1;
        if open == Some(step) {
            let body = chunks[idx];
            idx += 1;
            match step {
                Step::Describe => draw_describe(f, app, body),
                Step::Classify => draw_classify(f, app, body),
                Step::Attach => draw_attach(f, app, body),
                Step::Review => draw_review(f, app, body),
            }
        }
    }
}

fn draw_step_header(f: &mut Frame, app: &App, step: Step, area: Rect) {
    let theme = &app.config.theme;
    let expanded = app.wizard.is_open(step);
    let arrow = if expanded { "▾" } else { "▸" };
    let style = if expanded {
        Style::default()
            .fg(theme.parse_color(&theme.highlight))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.parse_color(&theme.text_muted))
    };
    let line = Line::from(Span::styled(
        format!(" {arrow} {}. {}", step.number(), step.title()),
        style,
    ));
    f.render_widget(Paragraph::new(line), area);
}

fn field_title(app: &App, field: Field) -> String {
    match app.input_mode {
        InputMode::EditText(editing) if editing == field => format!("{} (editing)", field.label()),
        _ => field.label().to_string(),
    }
}

fn draw_describe(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let focused = app.focused_field();
    let title = field_title(app, Field::Title);
    let title_para = Paragraph::new(app.form.title.as_str())
        .block(super::styled_block(&title, focused == Some(Field::Title), theme));
    f.render_widget(title_para, chunks[0]);

    let desc_title = field_title(app, Field::Description);
    let desc_para = Paragraph::new(app.form.description.as_str())
        .wrap(Wrap { trim: false })
        .block(super::styled_block(
            &desc_title,
            focused == Some(Field::Description),
            theme,
        ));
    f.render_widget(desc_para, chunks[1]);

    if let InputMode::EditText(field) = app.input_mode {
        let target = if field == Field::Title { chunks[0] } else { chunks[1] };
        let text = if field == Field::Title {
            &app.form.title
        } else {
            &app.form.description
        };
        let last = text.rsplit('\n').next().unwrap_or("");
        let row = text.matches('\n').count() as u16;
        f.set_cursor_position(Position::new(
            target.x + 1 + last.chars().count() as u16,
            target.y + 1 + row,
        ));
    }

    draw_footer(f, app, chunks[2], "n: Next (asks for a classification)");
}

fn draw_classify(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let focused = app.focused_field();
    for (i, field) in [Field::Category, Field::Department, Field::Priority]
        .into_iter()
        .enumerate()
    {
        let label = app
            .form
            .select(field)
            .map(|s| s.label())
            .filter(|l| !l.is_empty())
            .unwrap_or("(choose)");
        let para = Paragraph::new(format!("{label} ▾"))
            .block(super::styled_block(field.label(), focused == Some(field), theme));
        f.render_widget(para, chunks[i]);
    }

    let assignee = if app.form.assignee.is_unassigned() {
        "Unassigned".to_string()
    } else {
        app.form.assignee.name.clone()
    };
    let assignee_line = Line::from(vec![
        Span::styled(" Assigned to: ", Style::default().fg(theme.parse_color(&theme.text_muted))),
        Span::raw(assignee),
        Span::styled(
            if app.directory.is_ready() { "" } else { "  (loading analysts...)" },
            Style::default().fg(theme.parse_color(&theme.text_muted)),
        ),
    ]);
    f.render_widget(Paragraph::new(assignee_line), chunks[3]);

    if let Some(advice) = &app.form.advice {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.parse_color(&theme.advice)))
            .title(" Suggestion ");
        let width = block.inner(chunks[4]).width.max(1) as usize;
        let lines: Vec<Line> = textwrap::wrap(advice, width)
            .into_iter()
            .map(|l| Line::from(l.into_owned()))
            .collect();
        let para = Paragraph::new(lines)
            .style(Style::default().fg(theme.parse_color(&theme.advice)))
            .block(block);
        f.render_widget(para, chunks[4]);
    }

    draw_footer(f, app, chunks[5], "n: Next  p: Previous");
}

fn draw_attach(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let chip_style = Style::default().fg(theme.parse_color(&theme.chip));
    let mut lines = Vec::new();
    if app.form.attachments.is_empty() {
        lines.push(Line::styled(
            "No files attached",
            Style::default().fg(theme.parse_color(&theme.text_muted)),
        ));
    } else {
        let mut chips = Vec::new();
        for (i, name) in app.form.attachments.chips().into_iter().enumerate() {
            let style = if i == app.chip_focus {
                chip_style.bg(theme.parse_color(&theme.selected_bg)).add_modifier(Modifier::BOLD)
            } else {
                chip_style
            };
            chips.push(Span::styled(format!("[ {name} ✕ ]"), style));
            chips.push(Span::raw(" "));
        }
        lines.push(Line::from(chips));
        lines.push(Line::from(""));
        for file in app.form.attachments.files() {
            lines.push(Line::styled(
                format!("  {}", file.describe()),
                Style::default().fg(theme.parse_color(&theme.text_muted)),
            ));
        }
    }

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(super::styled_block("Files", true, theme));
    f.render_widget(para, chunks[0]);

    draw_footer(f, app, chunks[1], "a: Add file  d: Remove  Tab: Next chip  n: Next  p: Previous");
}

fn draw_review(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let label_style = Style::default().fg(theme.parse_color(&theme.text_muted));
    let mut lines: Vec<Line> = summary::rows(&app.form)
        .into_iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(format!("{:<13}", row.label), label_style),
                Span::raw(row.value),
            ])
        })
        .collect();
    lines.push(Line::from(vec![
        Span::styled(format!("{:<13}", "Files"), label_style),
        Span::raw(app.form.attachments.len().to_string()),
    ]));

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(super::styled_block("Summary", true, theme));
    f.render_widget(para, chunks[0]);

    draw_footer(f, app, chunks[1], "s/n: Submit  p: Previous");
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect, hint: &str) {
    let theme = &app.config.theme;
    let style = if app.navigation_locked() {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(theme.parse_color(&theme.text_muted))
    };
    f.render_widget(Paragraph::new(format!(" {hint}")).style(style), area);
}
