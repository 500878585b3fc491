//! Layout engine: one line of widgets at a fixed total width
//!
//! Fixed widgets render first so their combined width is known; whatever
//! is left of the line is split between the elastic widgets. The result is
//! never cached, every call renders every widget again.

use crate::utils::{char_len, fit};
use crate::widgets::Widget;
use crate::{ExtraData, ProgressSnapshot, Result};
use log::trace;

/// Split `remaining` cells between `count` elastic widgets
///
/// Floor division, with the remainder handed out one cell at a time to the
/// earliest widgets.
pub fn distribute(remaining: usize, count: usize) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }

    let share = remaining / count;
    let extra = remaining % count;
    (0..count)
        .map(|index| if index < extra { share + 1 } else { share })
        .collect()
}

/// Render `widgets` into a single line `width` characters wide
///
/// The line is exactly `width` long whenever it contains an elastic widget
/// and the fixed widgets fit. When the fixed widgets alone overflow, elastic
/// widgets get zero width and the line is simply as long as the fixed
/// output; no error is raised for that.
pub fn render_line(
    widgets: &[Widget],
    width: usize,
    snapshot: &ProgressSnapshot,
    extra: &mut ExtraData,
) -> Result<String> {
    let mut parts: Vec<Option<String>> = Vec::with_capacity(widgets.len());
    let mut consumed = 0;
    let mut elastic = 0;

    for widget in widgets {
        match widget {
            Widget::Fixed(fixed) => {
                let text = fixed.render(snapshot, extra)?;
                consumed += char_len(&text);
                parts.push(Some(text));
            }
            Widget::Elastic(_) => {
                elastic += 1;
                parts.push(None);
            }
        }
    }

    let remaining = width.saturating_sub(consumed);
    let mut shares = distribute(remaining, elastic).into_iter();
    trace!(
        "layout: width {width}, fixed {consumed}, {elastic} elastic sharing {remaining}"
    );

    let mut line = String::with_capacity(width);
    for (widget, part) in widgets.iter().zip(parts) {
        match (widget, part) {
            (_, Some(text)) => line.push_str(&text),
            (Widget::Elastic(stretch), None) => {
                let share = shares.next().unwrap_or(0);
                let text = stretch.render(snapshot, extra, share)?;
                line.push_str(&fit(&text, share));
            }
            (Widget::Fixed(_), None) => {}
        }
    }

    Ok(line)
}

/// Combined width of the fixed widgets in `widgets`
///
/// Renders each fixed widget once; elastic widgets are skipped. Rendering
/// has the same side effects as in [`render_line`]: adaptive widgets record
/// the snapshot into `extra`. Pass a scratch [`ExtraData`] to measure
/// without touching a bar's sample history.
pub fn fixed_width(
    widgets: &[Widget],
    snapshot: &ProgressSnapshot,
    extra: &mut ExtraData,
) -> Result<usize> {
    let mut total = 0;
    for widget in widgets {
        if let Widget::Fixed(fixed) = widget {
            total += char_len(&fixed.render(snapshot, extra)?);
        }
    }
    Ok(total)
}
