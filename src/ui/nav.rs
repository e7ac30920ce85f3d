use crate::app::App;
use crate::form::nav::NavLink;
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState};

pub fn draw_panel(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let items: Vec<ListItem> = NavLink::ALL
        .iter()
        .map(|link| {
            let marker = if link.server_path().is_some() { "↗ " } else { "  " };
            ListItem::new(format!("{marker}{}", link.label()))
        })
        .collect();

    let list = List::new(items)
        .block(super::styled_block("Menu", true, theme))
        .highlight_style(Style::default().bg(theme.parse_color(&theme.selected_bg)));

    let mut state = ListState::default().with_selected(Some(app.nav.selected));
    f.render_stateful_widget(list, area, &mut state);
}
