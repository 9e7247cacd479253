//! Functions that write the session result for the calling process.

use std::io::{self, Write};

use anyhow::Context;

use crate::app::screen::Screen;
use crate::core::Format;

/// Write the submitted values to `out` as one document followed by a
/// newline. Returns whether anything was written; a quit session or a layout
/// writes nothing.
pub fn write_result(
    out: &mut impl Write,
    screen: &Screen,
    format: Format,
    pretty: bool,
) -> anyhow::Result<bool> {
    let Some(payload) = screen
        .result(format, pretty)
        .context("encoding submitted values")?
    else {
        return Ok(false);
    };
    writeln!(out, "{payload}").context("writing result")?;
    out.flush().context("flushing result")?;
    Ok(true)
}

/// [`write_result`] to stdout.
pub fn print_result(screen: &Screen, format: Format, pretty: bool) -> anyhow::Result<bool> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_result(&mut lock, screen, format, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::event::AppEvent;
    use crate::app::form::Form;
    use crate::app::screen::Container;
    use crate::config::KeyMap;
    use crate::descriptor::{FormDescriptor, WidgetDescriptor};
    use crossterm::event::KeyCode;
    use serde_json::json;

    fn screen() -> Screen {
        let desc = FormDescriptor {
            title: "t".into(),
            description: String::new(),
            widgets: vec![WidgetDescriptor::new("text", "city").default_value(json!("Oslo"))],
        };
        Screen::new(Container::Form(Form::from_descriptor(&desc).unwrap()))
    }

    #[test]
    fn test_nothing_written_before_submit() {
        let mut buf = Vec::new();
        assert!(!write_result(&mut buf, &screen(), Format::Json, false).unwrap());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_submitted_values_written_as_json_line() {
        let mut s = screen();
        s.dispatch(&AppEvent::key(KeyCode::Enter), &KeyMap::default());
        let mut buf = Vec::new();
        assert!(write_result(&mut buf, &s, Format::Json, false).unwrap());
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"city\":\"Oslo\"}\n");
    }

    #[test]
    fn test_submitted_values_written_as_yaml() {
        let mut s = screen();
        s.dispatch(&AppEvent::key(KeyCode::Enter), &KeyMap::default());
        let mut buf = Vec::new();
        assert!(write_result(&mut buf, &s, Format::Yaml, true).unwrap());
        assert_eq!(String::from_utf8(buf).unwrap(), "city: Oslo\n");
    }
}
