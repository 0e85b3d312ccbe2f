pub mod commands;
pub mod simulated;

use clap::ValueEnum;
use glyph_core::Theme;

#[derive(ValueEnum, Clone, Debug, Copy)]
pub enum CliTheme {
    Dark,
    Light,
    System,
}

impl From<CliTheme> for Theme {
    fn from(t: CliTheme) -> Self {
        match t {
            CliTheme::Dark => Theme::Dark,
            CliTheme::Light => Theme::Light,
            CliTheme::System => Theme::System,
        }
    }
}
