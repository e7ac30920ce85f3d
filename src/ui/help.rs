use crate::app::{App, Page};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

pub fn draw_popup(f: &mut Frame, app: &App, area: Rect) {
    let (title, help_text) = match app.page {
        Page::Create => (
            " Create Ticket Help - Press ? or Esc to close ",
            r#"
STEPS
  1-4           Open/collapse a step
  n             Next step (step 1 asks for a suggestion)
  p             Previous step
  click header  Open/collapse a step

FIELDS
  Tab/S-Tab     Next/previous field
  Enter         Edit text / open select
  Esc           Stop editing
  (typing)      Filter select options

ATTACHMENTS
  a             Attach a file by path
  d             Remove highlighted file
  Tab           Highlight next file

SUBMIT
  s             Submit (review step)
  o             Open last created ticket

GENERAL
  m             Toggle menu
  ?             Toggle help
  q             Quit
"#,
        ),
        Page::Detail => (
            " Ticket Help - Press ? or Esc to close ",
            r#"
TICKET
  s             Change status
  r             Reassign
  f             Choose a file

CONFIRM DIALOG
  (typing)      Write a note
  Enter         Confirm
  Esc           Cancel and revert
  click outside Cancel and revert

GENERAL
  m             Toggle menu
  ?             Toggle help
  q             Quit
"#,
        ),
    };

    let block = Block::default().borders(Borders::ALL).title(title);

    let inner = super::centered_rect(52, 30, area);
    f.render_widget(Clear, inner);

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}
