use crate::app::App;
use crate::form::confirm::ConfirmFlow;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let Some(detail) = &app.detail else {
        let para = Paragraph::new("No ticket open. Start with `incidex detail <ID>`.")
            .style(Style::default().fg(theme.parse_color(&theme.text_muted)))
            .block(super::styled_block("Ticket", false, theme));
        f.render_widget(para, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_flow(f, app, &detail.status, "Status  [s]", chunks[0]);
    draw_flow(f, app, &detail.assign, "Assignee  [r]", chunks[1]);

    let file = detail
        .file
        .listing()
        .unwrap_or_else(|| "No file chosen".to_string());
    let para = Paragraph::new(file).block(super::styled_block("File  [f]", false, theme));
    f.render_widget(para, chunks[2]);

    let link = Paragraph::new(format!(" {}", app.client.detail_url(detail.ticket_id)))
        .style(Style::default().fg(theme.parse_color(&theme.text_muted)));
    f.render_widget(link, chunks[3]);
}

fn draw_flow(f: &mut Frame, app: &App, flow: &ConfirmFlow, title: &str, area: Rect) {
    let theme = &app.config.theme;
    let label = flow.select.label();
    let text = if label.is_empty() {
        if flow.select.options.is_empty() {
            "(loading...)".to_string()
        } else {
            "(none)".to_string()
        }
    } else {
        format!("{label} ▾")
    };
    let para = Paragraph::new(text).block(super::styled_block(title, flow.is_open(), theme));
    f.render_widget(para, area);
}
