//! One widget's text view inside a bordered box.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget as RenderWidget, Wrap},
};

use crate::widgets::{AnyWidget, Widget, ERROR_MARK};

use super::theme::Theme;

pub struct WidgetPanel<'a> {
    widget: &'a AnyWidget,
}

impl<'a> WidgetPanel<'a> {
    pub fn new(widget: &'a AnyWidget) -> Self {
        Self { widget }
    }

    /// Rows needed to show the whole view, borders included.
    pub fn height(&self) -> u16 {
        let lines = self.widget.view().lines().count().max(1);
        u16::try_from(lines + 2).unwrap_or(u16::MAX)
    }

    fn border_style(&self) -> ratatui::style::Style {
        if self.widget.error().is_some() {
            Theme::error_border_style()
        } else if self.widget.is_focused() {
            Theme::focused_border_style()
        } else {
            Theme::border_style()
        }
    }
}

impl RenderWidget for WidgetPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .widget
            .view()
            .lines()
            .map(|line| {
                let style = if line.starts_with(ERROR_MARK) {
                    Theme::error_style()
                } else {
                    Theme::text_style()
                };
                Line::from(Span::styled(line.to_string(), style))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if self.widget.is_focused() {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(self.border_style());

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
