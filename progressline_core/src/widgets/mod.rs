//! Display widgets
//!
//! A widget renders one fragment of a progress line. Fixed widgets decide
//! their own width; elastic widgets are told how many characters to fill by
//! the [layout engine](crate::layout).
//!
//! Widgets hold configuration only. They can be shared between any number
//! of bars (hence `Send + Sync` and `Arc`), and anything they need to
//! remember between renders goes through the bar's [`ExtraData`].

use crate::{ExtraData, ProgressSnapshot, Result};
use std::fmt;
use std::sync::Arc;

pub mod bar;
pub mod label;
pub mod marker;
pub mod sampling;
pub mod speed;
pub mod timer;

pub use bar::{Bar, BarBuilder, BarPart, BouncingBar, Marker};
pub use label::{Counter, FormatLabel, Percentage, SimpleProgress};
pub use marker::AnimatedMarker;
pub use sampling::Sampler;
pub use speed::{AdaptiveTransferSpeed, FileTransferSpeed};
pub use timer::{AdaptiveEta, Eta, Timer};

/// Widget whose output width is its own business
pub trait FixedWidget: fmt::Debug + Send + Sync {
    fn render(&self, snapshot: &ProgressSnapshot, extra: &mut ExtraData) -> Result<String>;
}

/// Widget that fills exactly the width assigned by the layout engine
pub trait ElasticWidget: fmt::Debug + Send + Sync {
    fn render(
        &self,
        snapshot: &ProgressSnapshot,
        extra: &mut ExtraData,
        width: usize,
    ) -> Result<String>;
}

/// A widget tagged with how it takes part in layout
#[derive(Debug, Clone)]
pub enum Widget {
    Fixed(Arc<dyn FixedWidget>),
    Elastic(Arc<dyn ElasticWidget>),
}

impl Widget {
    pub fn fixed(widget: impl FixedWidget + 'static) -> Self {
        Self::Fixed(Arc::new(widget))
    }

    pub fn elastic(widget: impl ElasticWidget + 'static) -> Self {
        Self::Elastic(Arc::new(widget))
    }

    /// Literal text
    pub fn text(text: impl Into<String>) -> Self {
        Self::fixed(Text::new(text))
    }

    pub fn is_elastic(&self) -> bool {
        matches!(self, Self::Elastic(_))
    }
}

impl From<&str> for Widget {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Widget {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

macro_rules! impl_widget_from {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Widget {
                fn from(widget: $ty) -> Self {
                    Self::$variant(Arc::new(widget))
                }
            }
        )+
    };
}

impl_widget_from!(Fixed =>
    Text,
    Timer,
    Eta,
    AdaptiveEta,
    FileTransferSpeed,
    AdaptiveTransferSpeed,
    Counter,
    Percentage,
    SimpleProgress,
    FormatLabel,
    AnimatedMarker,
);
impl_widget_from!(Elastic => Bar, BouncingBar);

/// Literal text emitted verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl FixedWidget for Text {
    fn render(&self, _snapshot: &ProgressSnapshot, _extra: &mut ExtraData) -> Result<String> {
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_widget_ignores_snapshot() {
        let snapshot = ProgressSnapshot::new(1.0, 0.0, Some(2.0));
        let mut extra = ExtraData::new();

        let rendered = Text::new(" <<< ").render(&snapshot, &mut extra).unwrap();
        assert_eq!(rendered, " <<< ");
        assert!(extra.is_empty());
    }

    #[test]
    fn test_widget_tags() {
        assert!(!Widget::from("label").is_elastic());
        assert!(!Widget::from(Percentage::new()).is_elastic());
        assert!(Widget::from(Bar::new()).is_elastic());
        assert!(Widget::from(BouncingBar::new()).is_elastic());
    }

    #[test]
    fn test_widgets_are_shareable() {
        fn assert_shareable<T: Send + Sync>() {}

        assert_shareable::<Widget>();
    }
}
