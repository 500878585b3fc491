//! Elastic bars that stretch to the width handed out by the layout engine

use super::ElasticWidget;
use crate::error::ValidationError;
use crate::format::Template;
use crate::utils::{char_len, justify, truncate};
use crate::{ExtraData, ProgressSnapshot, Result};
use std::sync::Arc;

pub const DEFAULT_MARKER: char = '#';
pub const DEFAULT_LEFT: &str = "|";
pub const DEFAULT_RIGHT: &str = "|";
pub const DEFAULT_FILL: char = ' ';

/// Left or right border of a bar
#[derive(Debug, Clone)]
pub enum BarPart {
    /// Template rendered against the snapshot fields
    Template(Template),
    /// Nested widget, given the bar's full width
    Widget(Arc<dyn ElasticWidget>),
}

impl BarPart {
    fn render(&self, snapshot: &ProgressSnapshot, extra: &mut ExtraData, width: usize) -> Result<String> {
        match self {
            Self::Template(template) => template.render(&snapshot.fields()),
            Self::Widget(widget) => widget.render(snapshot, extra, width),
        }
    }
}

impl From<&str> for BarPart {
    fn from(text: &str) -> Self {
        Self::Template(Template::new(text))
    }
}

/// What a bar draws for the completed portion
#[derive(Debug, Clone)]
pub enum Marker {
    /// Repeated in proportion to `value / max_value`
    Char(char),
    /// Nested widget, given the inner width
    Widget(Arc<dyn ElasticWidget>),
}

/// Builder shared by [`Bar`] and [`BouncingBar`]
///
/// Marker and fill are taken as strings and checked at build time, so a
/// multi-character marker is reported as a configuration error rather than
/// silently misdrawn.
#[derive(Debug, Clone)]
pub struct BarBuilder {
    marker: String,
    marker_widget: Option<Arc<dyn ElasticWidget>>,
    left: BarPart,
    right: BarPart,
    fill: String,
    fill_left: bool,
}

impl BarBuilder {
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            marker_widget: None,
            left: BarPart::from(DEFAULT_LEFT),
            right: BarPart::from(DEFAULT_RIGHT),
            fill: DEFAULT_FILL.to_string(),
            fill_left: true,
        }
    }

    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self.marker_widget = None;
        self
    }

    pub fn marker_widget(mut self, widget: Arc<dyn ElasticWidget>) -> Self {
        self.marker_widget = Some(widget);
        self
    }

    pub fn left(mut self, left: impl Into<BarPart>) -> Self {
        self.left = left.into();
        self
    }

    pub fn right(mut self, right: impl Into<BarPart>) -> Self {
        self.right = right.into();
        self
    }

    pub fn left_widget(mut self, widget: Arc<dyn ElasticWidget>) -> Self {
        self.left = BarPart::Widget(widget);
        self
    }

    pub fn right_widget(mut self, widget: Arc<dyn ElasticWidget>) -> Self {
        self.right = BarPart::Widget(widget);
        self
    }

    pub fn fill(mut self, fill: &str) -> Self {
        self.fill = fill.to_string();
        self
    }

    /// Whether the marker grows from the left (padding on the right)
    pub fn fill_left(mut self, fill_left: bool) -> Self {
        self.fill_left = fill_left;
        self
    }

    pub fn build(self) -> Result<Bar> {
        let fill = single_char("fill", &self.fill)?;
        let marker = match self.marker_widget {
            Some(widget) => Marker::Widget(widget),
            None => Marker::Char(single_char("marker", &self.marker)?),
        };

        Ok(Bar {
            marker,
            left: self.left,
            right: self.right,
            fill,
            fill_left: self.fill_left,
        })
    }

    pub fn build_bouncing(self) -> Result<BouncingBar> {
        if self.marker_widget.is_some() {
            return Err(ValidationError::invalid_configuration(
                "bouncing bar marker must be a single character",
            )
            .into());
        }

        Ok(BouncingBar {
            marker: single_char("marker", &self.marker)?,
            left: self.left,
            right: self.right,
            fill: single_char("fill", &self.fill)?,
            fill_left: self.fill_left,
        })
    }
}

impl Default for BarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn single_char(name: &str, text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ValidationError::invalid_configuration(&format!(
            "{name} must be exactly one character, got {text:?}"
        ))
        .into()),
    }
}

/// Render both borders, returning them with the width left between them
///
/// When the borders alone do not fit, the second element is `None` and the
/// first is the borders cut down to `width`.
fn render_borders(
    left: &BarPart,
    right: &BarPart,
    snapshot: &ProgressSnapshot,
    extra: &mut ExtraData,
    width: usize,
) -> Result<(String, String, Option<usize>)> {
    let left = left.render(snapshot, extra, width)?;
    let right = right.render(snapshot, extra, width)?;
    let borders = char_len(&left) + char_len(&right);

    if borders > width {
        return Ok((truncate(&format!("{left}{right}"), width), String::new(), None));
    }
    Ok((left, right, Some(width - borders)))
}

/// Progress bar filling in proportion to `value / max_value`
#[derive(Debug, Clone)]
pub struct Bar {
    marker: Marker,
    left: BarPart,
    right: BarPart,
    fill: char,
    fill_left: bool,
}

impl Bar {
    /// `|###   |` style bar growing from the left
    pub fn new() -> Self {
        Self {
            marker: Marker::Char(DEFAULT_MARKER),
            left: BarPart::from(DEFAULT_LEFT),
            right: BarPart::from(DEFAULT_RIGHT),
            fill: DEFAULT_FILL,
            fill_left: true,
        }
    }

    /// Bar growing from the right
    pub fn reverse() -> Self {
        Self {
            fill_left: false,
            ..Self::new()
        }
    }

    pub fn builder() -> BarBuilder {
        BarBuilder::new()
    }

    pub fn reverse_builder() -> BarBuilder {
        BarBuilder::new().fill_left(false)
    }

    fn render_marker(
        &self,
        snapshot: &ProgressSnapshot,
        extra: &mut ExtraData,
        width: usize,
    ) -> Result<String> {
        match &self.marker {
            Marker::Widget(widget) => widget.render(snapshot, extra, width),
            Marker::Char(marker) => Ok(std::iter::repeat_n(*marker, marker_len(snapshot, width)).collect()),
        }
    }
}

impl Default for Bar {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of marker characters for `width` cells
fn marker_len(snapshot: &ProgressSnapshot, width: usize) -> usize {
    match snapshot.max_value {
        Some(max) if max > 0.0 => {
            let len = (snapshot.value / max * width as f64).floor();
            if len.is_finite() {
                (len.max(0.0) as usize).min(width)
            } else {
                0
            }
        }
        _ => 0,
    }
}

impl ElasticWidget for Bar {
    fn render(
        &self,
        snapshot: &ProgressSnapshot,
        extra: &mut ExtraData,
        width: usize,
    ) -> Result<String> {
        let (left, right, inner) = render_borders(&self.left, &self.right, snapshot, extra, width)?;
        let Some(inner) = inner else {
            return Ok(left);
        };

        let marker = truncate(&self.render_marker(snapshot, extra, inner)?, inner);
        let body = justify(&marker, inner, self.fill, self.fill_left);
        Ok(format!("{left}{body}{right}"))
    }
}

/// Index of the bouncing marker within `width` cells
///
/// A triangle wave of period `2 * (width - 1)`: 0, 1, .., width - 1, .., 1, 0.
pub fn bounce_position(value: f64, width: usize) -> usize {
    if width <= 1 {
        return 0;
    }

    let period = 2 * (width as u64 - 1);
    let step = if value.is_finite() && value > 0.0 {
        (value as u64) % period
    } else {
        0
    };

    if step >= width as u64 {
        (period - step) as usize
    } else {
        step as usize
    }
}

/// Bar whose single marker bounces between the borders
///
/// For progress without a known end. Once finished the whole bar is filled
/// with the marker.
#[derive(Debug, Clone)]
pub struct BouncingBar {
    marker: char,
    left: BarPart,
    right: BarPart,
    fill: char,
    fill_left: bool,
}

impl BouncingBar {
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            left: BarPart::from(DEFAULT_LEFT),
            right: BarPart::from(DEFAULT_RIGHT),
            fill: DEFAULT_FILL,
            fill_left: true,
        }
    }

    pub fn builder() -> BarBuilder {
        BarBuilder::new()
    }
}

impl Default for BouncingBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ElasticWidget for BouncingBar {
    fn render(
        &self,
        snapshot: &ProgressSnapshot,
        extra: &mut ExtraData,
        width: usize,
    ) -> Result<String> {
        let (left, right, inner) = render_borders(&self.left, &self.right, snapshot, extra, width)?;
        let Some(inner) = inner else {
            return Ok(left);
        };

        if snapshot.is_finished() {
            let body: String = std::iter::repeat_n(self.marker, inner).collect();
            return Ok(format!("{left}{body}{right}"));
        }

        let mut position = bounce_position(snapshot.value, inner);
        if !self.fill_left {
            position = inner.saturating_sub(1) - position;
        }
        let body: String = (0..inner)
            .map(|cell| if cell == position { self.marker } else { self.fill })
            .collect();
        Ok(format!("{left}{body}{right}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::widgets::AnimatedMarker;
    use chrono::Local;

    fn snapshot(value: f64, max: Option<f64>) -> ProgressSnapshot {
        ProgressSnapshot::new(value, 0.0, max)
    }

    fn render(widget: &dyn ElasticWidget, snapshot: &ProgressSnapshot, width: usize) -> String {
        widget.render(snapshot, &mut ExtraData::new(), width).unwrap()
    }

    #[test]
    fn test_half_full_bar() {
        let bar = Bar::new();
        let half = snapshot(5.0, Some(10.0));

        assert_eq!(render(&bar, &half, 22), "|##########          |");
        assert_eq!(render(&bar, &half, 20), "|#########         |");
    }

    #[test]
    fn test_reverse_bar_fills_from_right() {
        let rendered = render(&Bar::reverse(), &snapshot(5.0, Some(10.0)), 12);
        assert_eq!(rendered, "|     #####|");
    }

    #[test]
    fn test_bar_without_max_is_empty() {
        assert_eq!(render(&Bar::new(), &snapshot(5.0, None), 6), "|    |");
        assert_eq!(render(&Bar::new(), &snapshot(0.0, Some(0.0)), 6), "|    |");
    }

    #[test]
    fn test_bar_exact_width() {
        let bar = Bar::builder()
            .marker("=")
            .left("[")
            .right("]")
            .fill("-")
            .build()
            .unwrap();

        for width in 2..40 {
            let rendered = render(&bar, &snapshot(3.0, Some(7.0)), width);
            assert_eq!(char_len(&rendered), width);
        }
    }

    #[test]
    fn test_bar_narrower_than_borders() {
        let bar = Bar::builder().left("<<").right(">>").build().unwrap();

        assert_eq!(render(&bar, &snapshot(1.0, Some(2.0)), 3), "<<>");
        assert_eq!(render(&bar, &snapshot(1.0, Some(2.0)), 0), "");
    }

    #[test]
    fn test_template_borders() {
        let bar = Bar::builder().left("{value:d}[").right("]").build().unwrap();
        assert_eq!(render(&bar, &snapshot(4.0, Some(8.0)), 11), "4[####    ]");
    }

    #[test]
    fn test_widget_marker() {
        let bar = Bar::builder()
            .marker_widget(Arc::new(AnimatedMarker::new()))
            .build()
            .unwrap();
        let rendered = render(&bar, &snapshot(1.0, Some(2.0)).with_updates(1), 6);
        assert_eq!(rendered, "|/   |");
    }

    #[test]
    fn test_multi_char_marker_rejected() {
        let err = Bar::builder().marker("##").build().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidConfiguration { .. })
        ));
        assert!(Bar::builder().fill("").build().is_err());
        assert!(
            BouncingBar::builder()
                .marker_widget(Arc::new(AnimatedMarker::new()))
                .build_bouncing()
                .is_err()
        );
    }

    #[test]
    fn test_bounce_position_reflects() {
        let positions: Vec<usize> = (0..=18).map(|v| bounce_position(v as f64, 10)).collect();
        assert_eq!(
            positions,
            vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0]
        );
        assert_eq!(bounce_position(7.0, 1), 0);
        assert_eq!(bounce_position(7.0, 0), 0);
    }

    #[test]
    fn test_bouncing_bar_render() {
        let bar = BouncingBar::new();

        assert_eq!(render(&bar, &snapshot(0.0, None), 7), "|#    |");
        assert_eq!(render(&bar, &snapshot(3.0, None), 7), "|   # |");
        assert_eq!(render(&bar, &snapshot(6.0, None), 7), "|  #  |");
    }

    #[test]
    fn test_bouncing_bar_mirrored() {
        let bar = BouncingBar::builder().fill_left(false).build_bouncing().unwrap();
        assert_eq!(render(&bar, &snapshot(0.0, None), 7), "|    #|");
    }

    #[test]
    fn test_bouncing_bar_fills_when_finished() {
        let now = Local::now();
        let finished = snapshot(3.0, None).with_times(now, now).with_end_time(now);
        assert_eq!(render(&BouncingBar::new(), &finished, 7), "|#####|");
    }
}
