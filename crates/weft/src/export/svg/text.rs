//! Label measurement with cosmic-text.

use std::sync::{Mutex, OnceLock, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use weft_core::geometry::Size;

/// Measures rendered text extents.
///
/// The font system is expensive to build, so one instance is shared by every
/// surface in the process.
struct TextMeasurer {
    font_system: Mutex<FontSystem>,
}

impl TextMeasurer {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    fn measure(&self, text: &str, font_family: &str, font_size: u16) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Points to pixels at standard DPI
        let font_size_px = font_size as f32 * 1.33;
        let metrics = Metrics::new(font_size_px, font_size_px * 1.15);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(font_family));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                width = width.max(last.x + last.w);
            }
            height += metrics.line_height;
        }

        // No font matched; estimate from the character count
        if width == 0.0 {
            width = text.chars().count() as f32 * font_size_px * 0.55;
            height = height.max(metrics.line_height);
        }

        Size::new(width, height)
    }
}

static MEASURER: OnceLock<TextMeasurer> = OnceLock::new();

/// Size of `text` set in `font_family` at `font_size` points.
pub fn measure(text: &str, font_family: &str, font_size: u16) -> Size {
    MEASURER
        .get_or_init(TextMeasurer::new)
        .measure(text, font_family, font_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_size() {
        assert_eq!(measure("", "sans-serif", 10), Size::default());
    }

    #[test]
    fn test_longer_text_is_wider() {
        let short = measure("ab", "sans-serif", 10);
        let long = measure("abcdefgh", "sans-serif", 10);
        assert!(short.height() > 0.0);
        assert!(long.width() > short.width());
    }
}
