//! Numeric range widget: a value in `[min, max]` moved in `step` increments.

use crossterm::event::KeyCode;

use super::options::Options;
use super::{pressed, EventResult, Field, Widget};
use crate::app::event::AppEvent;
use crate::core::{ConstructionError, Value, ValueError, ValueKind};
use crate::descriptor::WidgetDescriptor;

#[derive(Debug)]
pub struct Slider {
    field: Field,
    value: f64,
    initial: f64,
    min: f64,
    max: f64,
    step: f64,
    /// Bar width in cells.
    width: usize,
}

impl Slider {
    pub fn from_descriptor(desc: &WidgetDescriptor) -> Result<Self, ConstructionError> {
        let opts = Options::new(desc);
        let min = opts.f64("min")?.unwrap_or(0.0);
        let max = opts.f64("max")?.unwrap_or(100.0);
        let step = opts.f64("step")?.unwrap_or(1.0);
        let width = opts.usize("width")?.filter(|&w| w > 0).unwrap_or(30);

        if min >= max {
            return Err(ConstructionError::invalid(
                &desc.name,
                format!("min ({min}) must be less than max ({max})"),
            ));
        }
        if step <= 0.0 {
            return Err(ConstructionError::invalid(&desc.name, "step must be positive"));
        }

        // A default outside the bounds is dropped, not clamped.
        let initial = match opts.default_f64()? {
            Some(v) if (min..=max).contains(&v) => v,
            Some(v) => {
                tracing::warn!(name = %desc.name, value = v, "default outside range, using min");
                min
            }
            None => min,
        };

        Ok(Self {
            field: Field::from_descriptor(desc),
            value: initial,
            initial,
            min,
            max,
            step,
            width,
        })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    fn move_to(&mut self, target: f64) {
        self.value = target.clamp(self.min, self.max);
        self.field.error = None;
    }

    fn bar(&self) -> String {
        let ratio = (self.value - self.min) / (self.max - self.min);
        let filled = ((ratio * self.width as f64).round() as usize).min(self.width);
        format!("{}{}", "█".repeat(filled), "░".repeat(self.width - filled))
    }
}

impl Widget for Slider {
    fn name(&self) -> &str {
        &self.field.name
    }

    fn is_focused(&self) -> bool {
        self.field.focused
    }

    fn set_focus(&mut self, focused: bool) {
        self.field.focused = focused;
    }

    fn handle_input(&mut self, event: &AppEvent) -> EventResult {
        if !self.field.focused {
            return EventResult::Ignored;
        }
        let Some(key) = pressed(event) else {
            return EventResult::Ignored;
        };
        // A key at the boundary is still consumed.
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_to(self.value - self.step),
            KeyCode::Right | KeyCode::Char('l') => self.move_to(self.value + self.step),
            KeyCode::Home => self.move_to(self.min),
            KeyCode::End => self.move_to(self.max),
            _ => return EventResult::Ignored,
        }
        EventResult::Handled
    }

    fn is_valid(&mut self) -> bool {
        self.field.settle(Ok(()))
    }

    fn error(&self) -> Option<&str> {
        self.field.error.as_deref()
    }

    fn set_error(&mut self, message: Option<String>) {
        self.field.error = message;
    }

    fn value(&self) -> Value {
        Value::Number(self.value)
    }

    fn set_value(&mut self, value: Value) -> Result<(), ValueError> {
        let Value::Number(n) = value else {
            return Err(ValueError::mismatch(ValueKind::Number, value.kind()));
        };
        if !(self.min..=self.max).contains(&n) {
            return Err(ValueError::OutOfRange {
                value: n,
                min: self.min,
                max: self.max,
            });
        }
        self.value = n;
        self.field.error = None;
        Ok(())
    }

    fn reset(&mut self) {
        self.value = self.initial;
        self.field.reset();
    }

    fn view(&self) -> String {
        self.field.frame(&format!("{} {}", self.bar(), self.value))
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("←/→", "adjust"), ("Home/End", "min/max")]
    }
}
