//! Whole-screen rendering for the three container kinds.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::app::screen::Container;
use crate::app::state::AppState;
use crate::descriptor::Axis;
use crate::widgets::AnyWidget;

use super::layout::{scroll_start, AppLayout};
use super::panel::WidgetPanel;
use super::theme::Theme;

/// Marker prefixed to a tab label while any widget in it shows an error.
pub const TAB_ERROR_MARK: &str = "⚠ ";

pub fn draw(frame: &mut Frame, state: &AppState) {
    let container = state.screen.container();
    let header_height = match container {
        Container::Form(f) if !f.description().is_empty() => 2,
        Container::Layout(l) if !l.description().is_empty() => 2,
        Container::Tabs(_) => 2,
        _ => 1,
    };
    let layout = AppLayout::from_area(frame.area(), header_height);

    let mut header = vec![Line::from(Span::styled(
        format!(" {} ", state.screen.title()),
        Theme::title_style(),
    ))];
    match container {
        Container::Form(form) => {
            header.push(description_line(form.description()));
            draw_stack(frame, layout.body_area, form.widgets(), Axis::Vertical, form.cursor());
        }
        Container::Layout(l) => {
            header.push(description_line(l.description()));
            draw_stack(frame, layout.body_area, l.widgets(), l.axis(), l.cursor());
        }
        Container::Tabs(tabs) => {
            let titles: Vec<Line> = tabs
                .groups()
                .iter()
                .map(|g| {
                    let mark = if g.has_errors() { TAB_ERROR_MARK } else { "" };
                    Line::from(format!("{mark}{}", g.label()))
                })
                .collect();
            let bar = Tabs::new(titles)
                .select(tabs.active())
                .style(Theme::tab_style())
                .highlight_style(Theme::active_tab_style())
                .divider("│");
            let tab_row = Rect {
                y: layout.header_area.y + 1,
                height: 1,
                ..layout.header_area
            };
            frame.render_widget(bar, tab_row);

            let group = tabs.active_group();
            let focus = if tabs.is_focused() { group.cursor() } else { None };
            draw_stack(frame, layout.body_area, group.widgets(), Axis::Vertical, focus);
        }
    }
    header.truncate(usize::from(header_height));
    let title_row = Rect {
        height: if matches!(container, Container::Tabs(_)) { 1 } else { header_height },
        ..layout.header_area
    };
    frame.render_widget(Paragraph::new(header), title_row);

    let status_style = if state.status_message.is_some() {
        Theme::status_warning_style()
    } else {
        Theme::status_bar_style()
    };
    let status = Paragraph::new(state.status_line()).style(status_style);
    frame.render_widget(status, layout.status_area);
}

fn description_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!(" {text}"), Theme::description_style()))
}

/// Panels one after another. Vertical stacks scroll so the focused panel
/// stays on screen; horizontal rows share the width evenly.
fn draw_stack(frame: &mut Frame, area: Rect, widgets: &[AnyWidget], axis: Axis, focus: Option<usize>) {
    if widgets.is_empty() {
        return;
    }
    let heights: Vec<u16> = widgets.iter().map(|w| WidgetPanel::new(w).height()).collect();

    match axis {
        Axis::Vertical => {
            let start = scroll_start(&heights, focus, area.height);
            let mut constraints: Vec<Constraint> =
                heights[start..].iter().map(|&h| Constraint::Length(h)).collect();
            constraints.push(Constraint::Min(0));
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints(constraints)
                .split(area);
            for (widget, chunk) in widgets[start..].iter().zip(chunks.iter()) {
                if chunk.height == 0 {
                    break;
                }
                frame.render_widget(WidgetPanel::new(widget), *chunk);
            }
        }
        Axis::Horizontal => {
            let n = u32::try_from(widgets.len()).unwrap_or(u32::MAX);
            let tallest = heights.iter().copied().max().unwrap_or(3);
            let row = Rect {
                height: area.height.min(tallest),
                ..area
            };
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(widgets.iter().map(|_| Constraint::Ratio(1, n)))
                .split(row);
            for (widget, chunk) in widgets.iter().zip(chunks.iter()) {
                frame.render_widget(WidgetPanel::new(widget), *chunk);
            }
        }
    }
}
