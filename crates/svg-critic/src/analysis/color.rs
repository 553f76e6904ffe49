//! Color harmony against the reference palette.

use log::debug;
use serde::Serialize;

use svg_critic_core::{
    color::{self, REFERENCE_PALETTE},
    document::Document,
};

/// More distinct colors than this trigger a "reduce palette" suggestion.
pub const MAX_UNIQUE_COLORS: usize = 8;

/// Result of the color analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorHarmony {
    unique_colors: usize,
    palette_adherence: f64,
    missing_palette_colors: Vec<&'static str>,
    suggestions: Vec<String>,
}

impl ColorHarmony {
    /// Returns the number of distinct colors in use.
    pub fn unique_colors(&self) -> usize {
        self.unique_colors
    }

    /// Returns the share of color usages that are palette colors, in percent.
    /// `0` when the document uses no colors at all.
    pub fn palette_adherence(&self) -> f64 {
        self.palette_adherence
    }

    /// Returns the palette colors the document does not use, in palette order.
    pub fn missing_palette_colors(&self) -> &[&'static str] {
        &self.missing_palette_colors
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

/// Measures how closely the document sticks to [`REFERENCE_PALETTE`].
pub fn analyze(document: &Document) -> ColorHarmony {
    let colors = document.colors();

    let total: usize = colors.values().sum();
    let on_palette: usize = colors
        .iter()
        .filter(|(key, _)| color::is_palette(key))
        .map(|(_, count)| *count)
        .sum();
    let palette_adherence = if total > 0 {
        on_palette as f64 * 100.0 / total as f64
    } else {
        0.0
    };

    let missing_palette_colors: Vec<_> = REFERENCE_PALETTE
        .into_iter()
        .filter(|entry| !colors.contains_key(*entry))
        .collect();

    let mut suggestions = Vec::new();
    if colors.len() > MAX_UNIQUE_COLORS {
        suggestions.push("Reduce color palette to improve visual cohesion".to_string());
    }
    if !missing_palette_colors.is_empty() {
        suggestions.push(format!(
            "Consider using standard palette colors: {}",
            missing_palette_colors.join(", ")
        ));
    }

    debug!(unique = colors.len(), palette_adherence; "Colors analyzed");

    ColorHarmony {
        unique_colors: colors.len(),
        palette_adherence,
        missing_palette_colors,
        suggestions,
    }
}
