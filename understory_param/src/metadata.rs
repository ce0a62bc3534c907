// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descriptive UI metadata.
//!
//! [`UiMetadata`] tells a UI how to present a parameter. It never affects the
//! stored value.

/// How a numeric parameter prefers to be drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DisplayStyle {
    /// A rotary knob.
    #[default]
    Knob,
    /// A linear slider.
    Slider,
}

/// Presentation hints for a parameter.
///
/// # Example
///
/// ```rust
/// use understory_param::{DisplayStyle, UiMetadata};
///
/// let cutoff = UiMetadata::builder()
///     .tooltip("filter cutoff")
///     .units("Hz")
///     .logarithmic(true)
///     .build();
///
/// assert_eq!(cutoff.tooltip(), "filter cutoff");
/// assert_eq!(cutoff.style(), DisplayStyle::Knob);
/// assert!(cutoff.is_logarithmic());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UiMetadata {
    display_name: Option<String>,
    tooltip: String,
    units: String,
    style: DisplayStyle,
    logarithmic: bool,
}

impl UiMetadata {
    /// Returns a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> UiMetadataBuilder {
        UiMetadataBuilder::default()
    }

    /// Returns the display name, if one differs from the parameter name.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the tooltip text.
    #[must_use]
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Returns the unit label, e.g. `"Hz"` or `"dB"`.
    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }

    /// Returns the preferred widget style.
    #[must_use]
    #[inline]
    pub fn style(&self) -> DisplayStyle {
        self.style
    }

    /// Returns whether the value should be shown on a logarithmic scale.
    #[must_use]
    #[inline]
    pub fn is_logarithmic(&self) -> bool {
        self.logarithmic
    }
}

/// Builder for [`UiMetadata`].
#[derive(Clone, Debug, Default)]
pub struct UiMetadataBuilder {
    metadata: UiMetadata,
}

impl UiMetadataBuilder {
    /// Sets the name shown instead of the parameter name.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.metadata.display_name = Some(name.into());
        self
    }

    /// Sets the tooltip text.
    #[must_use]
    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.metadata.tooltip = tooltip.into();
        self
    }

    /// Sets the unit label.
    #[must_use]
    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.metadata.units = units.into();
        self
    }

    /// Sets the preferred widget style.
    #[must_use]
    pub fn style(mut self, style: DisplayStyle) -> Self {
        self.metadata.style = style;
        self
    }

    /// Sets whether the value is shown on a logarithmic scale.
    #[must_use]
    pub fn logarithmic(mut self, logarithmic: bool) -> Self {
        self.metadata.logarithmic = logarithmic;
        self
    }

    /// Builds the [`UiMetadata`].
    #[must_use]
    pub fn build(self) -> UiMetadata {
        self.metadata
    }
}
