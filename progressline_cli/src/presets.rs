//! Named widget layouts selectable from the command line and config file

use anyhow::Result;
use progressline_core::widgets::{
    AdaptiveEta, AdaptiveTransferSpeed, AnimatedMarker, Bar, BouncingBar, Counter, Eta,
    FormatLabel, Percentage, Timer,
};
use progressline_core::{DEFAULT_SAMPLES, Widget};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const LABEL_FORMAT: &str = "Processed {value} of {max} in {elapsed}";

#[derive(clap::ValueEnum, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Percentage, bar and ETA (spinner, counter and timer without a maximum)
    Default,
    /// Percentage, bar, adaptive speed and adaptive ETA
    Transfer,
    /// Spinner, bouncing bar and timer
    Bounce,
    /// Free-form label followed by a bar
    Label,
}

/// Settings shared by every preset
#[derive(Debug, Clone)]
pub struct PresetOptions {
    pub marker: String,
    pub fill: String,
    pub samples: usize,
}

impl Default for PresetOptions {
    fn default() -> Self {
        Self {
            marker: "#".to_string(),
            fill: " ".to_string(),
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Transfer => "transfer",
            Preset::Bounce => "bounce",
            Preset::Label => "label",
        }
    }

    /// Whether the preset is meant for progress without a known end
    pub fn is_open_ended(&self) -> bool {
        matches!(self, Preset::Bounce)
    }

    /// Build the widget list for a bar with or without a known maximum
    pub fn widgets(&self, options: &PresetOptions, has_max: bool) -> Result<Vec<Widget>> {
        let bar = || -> Result<Widget> {
            Ok(Bar::builder()
                .marker(&options.marker)
                .fill(&options.fill)
                .build()?
                .into())
        };
        let bouncing = || -> Result<Widget> {
            Ok(BouncingBar::builder()
                .marker(&options.marker)
                .fill(&options.fill)
                .build_bouncing()?
                .into())
        };
        let speed = || AdaptiveTransferSpeed::new().with_samples(options.samples);

        let widgets: Vec<Widget> = match (self, has_max) {
            (Preset::Default, true) => vec![
                Percentage::new().into(),
                " ".into(),
                bar()?,
                " ".into(),
                Eta::new().into(),
            ],
            (Preset::Default, false) => vec![
                AnimatedMarker::new().into(),
                " ".into(),
                Counter::new().into(),
                " ".into(),
                Timer::new().into(),
            ],
            (Preset::Transfer, true) => vec![
                Percentage::new().into(),
                " ".into(),
                bar()?,
                " ".into(),
                speed().into(),
                " ".into(),
                AdaptiveEta::new().with_samples(options.samples).into(),
            ],
            (Preset::Transfer, false) => vec![
                bouncing()?,
                " ".into(),
                speed().into(),
                " ".into(),
                Timer::new().into(),
            ],
            (Preset::Bounce, _) => vec![
                AnimatedMarker::new().into(),
                " ".into(),
                bouncing()?,
                " ".into(),
                Timer::new().into(),
            ],
            (Preset::Label, _) => vec![FormatLabel::new(LABEL_FORMAT).into(), " ".into(), bar()?],
        };

        Ok(widgets)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Preset::Default),
            "transfer" => Ok(Preset::Transfer),
            "bounce" => Ok(Preset::Bounce),
            "label" => Ok(Preset::Label),
            other => Err(format!(
                "Unknown preset '{other}' (expected default, transfer, bounce or label)"
            )),
        }
    }
}
