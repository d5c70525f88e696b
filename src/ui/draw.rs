//! Rendering: header bar, home menu, list popup, detail popup, footer.
//!
//! Drawing is read-only except for one piece of bookkeeping on the open
//! list session: the scroll window needs the height it was rendered at.

use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
// Use Popup from tui-widgets to render the detail dialog
use tui_widgets::popup::Popup;

use crate::remote::ContactSource;
use crate::session::ListKind;

use super::app::{App, SearchFocus};

const HELP_HOME: &str = "j/k: select  Enter: open  F2/F3: popups  q: quit";
const HELP_LIST_INPUT: &str =
    "Type to filter  Enter: apply  Tab: results  F4: even ids  Esc: close";
const HELP_LIST_RESULTS: &str =
    "j/k: move  Enter: details  /: filter  e: even ids  F2/F3: switch  Esc: close";
const HELP_DETAIL: &str = "Esc/Enter: close";

const QUERY_LABEL: &str = "FILTER: ";

pub fn render<B, S>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()>
where
    B: Backend,
    S: ContactSource + 'static,
{
    terminal.draw(|frame| draw_frame(frame, app))?;
    Ok(())
}

fn draw_frame<S: ContactSource + 'static>(frame: &mut Frame<'_>, app: &mut App<S>) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(frame, layout[0], app);
    draw_home(frame, layout[1], app);
    draw_footer(frame, layout[2], app);

    // Popups stack over the home screen; detail sits above the list
    draw_list_popup(frame, size, app);
    draw_detail_popup(frame, size, app);
}

// =============================================================================
// Header and footer
// =============================================================================

/// Top bar echoing the route the way a browser address bar would.
fn draw_header<S: ContactSource + 'static>(frame: &mut Frame<'_>, area: Rect, app: &App<S>) {
    let mut spans = vec![Span::styled(" teledex://contacts", accent_style())];
    if let Some(route) = app.route_display() {
        spans.push(Span::styled(
            format!("?{route}"),
            accent_style().add_modifier(Modifier::BOLD),
        ));
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(11)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);
    if app.only_even {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("[even ids] ", accent_style())))
                .alignment(Alignment::Right),
            chunks[1],
        );
    }
}

fn draw_footer<S: ContactSource + 'static>(frame: &mut Frame<'_>, area: Rect, app: &App<S>) {
    let help = if app.detail.is_some() {
        HELP_DETAIL
    } else if app.list.is_some() {
        match app.search_focus {
            SearchFocus::Input => HELP_LIST_INPUT,
            SearchFocus::Results => HELP_LIST_RESULTS,
        }
    } else {
        HELP_HOME
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {help}"), dim_style()))),
        area,
    );
}

// =============================================================================
// Home screen
// =============================================================================

fn draw_home<S: ContactSource + 'static>(frame: &mut Frame<'_>, area: Rect, app: &App<S>) {
    let width = 36.min(area.width);
    let height = 6.min(area.height);
    if width < 4 || height < 4 {
        return;
    }
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    let menu_area = Rect::new(x, y, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Line::from(Span::styled(" TELEDEX ", accent_style())))
        .title_alignment(Alignment::Center);
    let inner = block.inner(menu_area);
    frame.render_widget(block, menu_area);

    let entries = [
        ListKind::All.title(app.country()),
        ListKind::Country.title(app.country()),
    ];
    let mut lines = vec![Line::from("")];
    for (i, entry) in entries.iter().enumerate() {
        let (marker, style) = if i == app.home_cursor {
            ("> ", selection_style())
        } else {
            ("  ", Style::default())
        };
        lines.push(Line::from(Span::styled(format!(" {marker}{entry} "), style)));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

// =============================================================================
// List popup
// =============================================================================

fn draw_list_popup<S: ContactSource + 'static>(
    frame: &mut Frame<'_>,
    area: Rect,
    app: &mut App<S>,
) {
    if app.list.is_none() {
        return;
    }

    let title = app.list_title().unwrap_or_default();
    let query = app.search_input.value().to_string();
    let cursor_col = app.search_input.visual_cursor();
    let input_focused = app.search_focus == SearchFocus::Input;
    let pending = app.filter_pending();

    let width = (area.width / 3 * 2).max(40).min(area.width);
    let height = (area.height / 5 * 4).max(10).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let modal_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, modal_area);

    let Some(session) = app.list.as_mut() else {
        return;
    };

    let mut progress = format!(" page {}  {} loaded ", session.page, session.contacts.len());
    if session.loading {
        progress.push_str(" loading ");
    } else if !session.has_more {
        progress.push_str(" end of list ");
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Line::from(Span::styled(format!(" {title} "), accent_style())))
        .title_bottom(Line::from(Span::styled(progress, dim_style())))
        .title_alignment(Alignment::Center);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);
    if inner.width == 0 || inner.height < 2 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    // Query line; the terminal cursor is only placed while the input has focus
    let mut query_spans = vec![
        Span::styled(QUERY_LABEL, accent_style()),
        Span::styled(
            query,
            if input_focused {
                selection_style()
            } else {
                Style::default()
            },
        ),
    ];
    if pending {
        query_spans.push(Span::styled(" ...", dim_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(query_spans)), rows[0]);
    if input_focused {
        let x = rows[0].x + QUERY_LABEL.len() as u16 + cursor_col as u16;
        frame.set_cursor_position((x.min(rows[0].right().saturating_sub(1)), rows[0].y));
    }

    // Contact rows, windowed over the filtered view plus a trailing
    // loading row while a fetch is in flight
    let list_area = rows[1];
    session.set_viewport(list_area.height as usize);

    let window = list_area.height as usize;
    let virtual_len = session.filtered.len() + usize::from(session.loading);
    let mut start = session.scroll.min(virtual_len.saturating_sub(1));
    if session.loading && session.at_bottom() {
        start = virtual_len.saturating_sub(window);
    }
    let end = (start + window).min(virtual_len);

    let mut lines: Vec<Line> = Vec::with_capacity(window);
    if session.filtered.is_empty() && !session.loading {
        lines.push(Line::from(Span::styled(
            " (no matching contacts)",
            dim_style(),
        )));
    }
    for idx in start..end {
        match session.filtered.get(idx) {
            Some(&contact_idx) => {
                let Some(contact) = session.contacts.get(contact_idx) else {
                    continue;
                };
                let text = format!(
                    " {:>6}  {:<24}  {}",
                    contact.id,
                    contact.country_name().unwrap_or("-"),
                    contact.phone
                );
                let style = if idx == session.cursor {
                    selection_style()
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(text, style)));
            }
            None => lines.push(Line::from(Span::styled(" Loading...", dim_style()))),
        }
    }
    frame.render_widget(Paragraph::new(lines), list_area);
}

// =============================================================================
// Detail popup
// =============================================================================

fn draw_detail_popup<S: ContactSource + 'static>(frame: &mut Frame<'_>, area: Rect, app: &App<S>) {
    let Some(modal) = app.detail.as_ref() else {
        return;
    };
    let contact = &modal.contact;

    let body = Text::from(vec![
        Line::from(vec![
            Span::styled("ID       ", accent_style()),
            Span::raw(contact.id.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Country  ", accent_style()),
            Span::raw(contact.country_name().unwrap_or("-").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Phone    ", accent_style()),
            Span::raw(contact.phone.clone()),
        ]),
        Line::from(""),
        Line::from(Span::styled(HELP_DETAIL, dim_style())),
    ]);

    let popup = Popup::new(body)
        .title(Line::from(Span::styled(" CONTACT ", accent_style())))
        .border_style(border_style());
    frame.render_widget(&popup, area);
}

// =============================================================================
// Styles
// =============================================================================

const ACCENT: Color = Color::Cyan;

fn accent_style() -> Style {
    Style::default().fg(ACCENT)
}

fn border_style() -> Style {
    Style::default().fg(ACCENT)
}

fn selection_style() -> Style {
    Style::default().fg(Color::Black).bg(ACCENT)
}

fn dim_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
