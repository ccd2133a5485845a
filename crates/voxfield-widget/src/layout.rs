//! Layout instructions for the rendering layer.
//!
//! The widget never introspects or clones the wrapped child. Instead it
//! returns plain geometry: the child occupies the available space minus a
//! fixed trailing inset, the microphone button floats inside that inset, and
//! the dropdown uses a fixed width. The host renderer applies these values.

use voxfield_core::config::WidgetConfig;

/// Placement of the floating microphone button.
#[derive(Clone, Debug, PartialEq)]
pub struct MicButtonPlacement {
    /// Distance from the input's right edge.
    pub right: f32,
    pub vertical_padding: f32,
    pub icon_size: f32,
}

/// Geometry of the alternatives dropdown.
#[derive(Clone, Debug, PartialEq)]
pub struct DropdownGeometry {
    pub width: f32,
    pub corner_radius: f32,
    pub item_padding: f32,
    pub item_horizontal_padding: f32,
}

/// Complete layout instructions for one dictation widget.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSpec {
    /// Horizontal space reserved at the child's trailing edge for the
    /// microphone button.
    pub trailing_inset: f32,
    pub mic_button: MicButtonPlacement,
    pub dropdown: DropdownGeometry,
}

impl LayoutSpec {
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self {
            trailing_inset: config.trailing_inset,
            mic_button: MicButtonPlacement {
                right: config.mic_button_right,
                vertical_padding: 10.0,
                icon_size: 24.0,
            },
            dropdown: DropdownGeometry {
                width: config.dropdown_width,
                corner_radius: 6.0,
                item_padding: 8.0,
                item_horizontal_padding: 10.0,
            },
        }
    }
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self::from_config(&WidgetConfig::default())
    }
}
