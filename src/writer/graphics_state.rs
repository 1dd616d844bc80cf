//! Graphics state tracking for content stream authoring.
//!
//! A PDF reader keeps the real graphics state and saves/restores it on
//! `q`/`Q`. The writer cannot see that state, so it mirrors the pieces it
//! needs to decide when `Tf`, `CS` or `cs` must be emitted: the current
//! font and the two current color spaces, each on a stack that moves in
//! lock-step with `q`/`Q`. It also tracks whether a text object (`BT`..`ET`)
//! is open.

use crate::color::ColorSpace;
use crate::error::{Error, Result};
use crate::fonts::Font;

/// Mirror of the writer-relevant parts of the PDF graphics state.
#[derive(Debug, Clone, Default)]
pub struct GraphicsStateTracker {
    in_text: bool,
    fonts: Vec<Font>,
    stroking_color_spaces: Vec<ColorSpace>,
    non_stroking_color_spaces: Vec<ColorSpace>,
}

impl GraphicsStateTracker {
    /// Create an empty tracker (text mode off, all stacks empty).
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a text object is open.
    pub fn in_text_mode(&self) -> bool {
        self.in_text
    }

    /// Enter text mode (`BT`).
    pub fn begin_text(&mut self) -> Result<()> {
        if self.in_text {
            return Err(Error::Sequence("nested beginText".to_string()));
        }
        self.in_text = true;
        Ok(())
    }

    /// Leave text mode (`ET`).
    pub fn end_text(&mut self) -> Result<()> {
        if !self.in_text {
            return Err(Error::Sequence(
                "endText without a matching beginText".to_string(),
            ));
        }
        self.in_text = false;
        Ok(())
    }

    /// Fail unless outside a text object. `operation` names the caller in the error.
    pub fn require_outside_text(&self, operation: &str) -> Result<()> {
        if self.in_text {
            return Err(Error::Sequence(format!(
                "{} is not allowed within a text block",
                operation
            )));
        }
        Ok(())
    }

    /// Fail unless inside a text object. `operation` names the caller in the error.
    pub fn require_inside_text(&self, operation: &str) -> Result<()> {
        if !self.in_text {
            return Err(Error::Sequence(format!(
                "must call beginText before {}",
                operation
            )));
        }
        Ok(())
    }

    /// Make `font` current: replaces the top of the font stack, or pushes
    /// when the stack is empty.
    pub fn set_font(&mut self, font: Font) {
        replace_top(&mut self.fonts, font);
    }

    /// The current font.
    pub fn font(&self) -> Option<&Font> {
        self.fonts.last()
    }

    /// Depth of the font stack.
    pub fn font_depth(&self) -> usize {
        self.fonts.len()
    }

    /// The current stroking color space.
    pub fn stroking_color_space(&self) -> Option<&ColorSpace> {
        self.stroking_color_spaces.last()
    }

    /// The current non-stroking color space.
    pub fn non_stroking_color_space(&self) -> Option<&ColorSpace> {
        self.non_stroking_color_spaces.last()
    }

    /// Make `cs` the current stroking color space.
    pub fn set_stroking_color_space(&mut self, cs: ColorSpace) {
        replace_top(&mut self.stroking_color_spaces, cs);
    }

    /// Make `cs` the current non-stroking color space.
    pub fn set_non_stroking_color_space(&mut self, cs: ColorSpace) {
        replace_top(&mut self.non_stroking_color_spaces, cs);
    }

    /// Depths of the stroking and non-stroking color space stacks.
    pub fn color_space_depths(&self) -> (usize, usize) {
        (
            self.stroking_color_spaces.len(),
            self.non_stroking_color_spaces.len(),
        )
    }

    /// Mirror `q`: duplicate the top of every non-empty stack.
    pub fn save(&mut self) {
        duplicate_top(&mut self.fonts);
        duplicate_top(&mut self.stroking_color_spaces);
        duplicate_top(&mut self.non_stroking_color_spaces);
    }

    /// Mirror `Q`: pop every non-empty stack. Never fails.
    pub fn restore(&mut self) {
        self.fonts.pop();
        self.stroking_color_spaces.pop();
        self.non_stroking_color_spaces.pop();
    }
}

fn replace_top<T>(stack: &mut Vec<T>, value: T) {
    match stack.last_mut() {
        Some(top) => *top = value,
        None => stack.push(value),
    }
}

fn duplicate_top<T: Clone>(stack: &mut Vec<T>) {
    if let Some(top) = stack.last().cloned() {
        stack.push(top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontEncoding;
    use crate::object::ObjectRef;

    fn font(id: u32) -> Font {
        Font::new(ObjectRef::new(id, 0), "Helvetica", FontEncoding::WinAnsi)
    }

    #[test]
    fn test_text_mode_transitions() {
        let mut state = GraphicsStateTracker::new();
        assert!(!state.in_text_mode());
        state.begin_text().unwrap();
        assert!(state.in_text_mode());
        assert!(matches!(state.begin_text(), Err(Error::Sequence(_))));
        state.end_text().unwrap();
        assert!(matches!(state.end_text(), Err(Error::Sequence(_))));
    }

    #[test]
    fn test_mode_requirements() {
        let mut state = GraphicsStateTracker::new();
        assert!(state.require_outside_text("moveTo").is_ok());
        let err = state.require_inside_text("showText").unwrap_err();
        assert!(format!("{}", err).contains("showText"));

        state.begin_text().unwrap();
        assert!(state.require_inside_text("newLine").is_ok());
        assert!(state.require_outside_text("stroke").is_err());
    }

    #[test]
    fn test_set_font_replaces_top() {
        let mut state = GraphicsStateTracker::new();
        state.set_font(font(1));
        state.set_font(font(2));
        assert_eq!(state.font_depth(), 1);
        assert_eq!(state.font().unwrap().object_ref(), ObjectRef::new(2, 0));
    }

    #[test]
    fn test_save_restore_font() {
        let mut state = GraphicsStateTracker::new();
        state.set_font(font(1));
        state.save();
        assert_eq!(state.font_depth(), 2);
        state.set_font(font(2));
        state.restore();
        assert_eq!(state.font_depth(), 1);
        assert_eq!(state.font().unwrap().object_ref(), ObjectRef::new(1, 0));
    }

    #[test]
    fn test_save_with_empty_stacks() {
        let mut state = GraphicsStateTracker::new();
        state.save();
        assert_eq!(state.font_depth(), 0);
        state.restore();
        state.restore();
        assert_eq!(state.font_depth(), 0);
        assert_eq!(state.color_space_depths(), (0, 0));
    }

    #[test]
    fn test_color_space_stacks_follow_save() {
        let mut state = GraphicsStateTracker::new();
        state.set_stroking_color_space(ColorSpace::DeviceCmyk);
        state.set_non_stroking_color_space(ColorSpace::DeviceRgb);
        state.save();
        assert_eq!(state.color_space_depths(), (2, 2));

        state.set_stroking_color_space(ColorSpace::DeviceGray);
        assert_eq!(state.stroking_color_space(), Some(&ColorSpace::DeviceGray));
        state.restore();
        assert_eq!(state.stroking_color_space(), Some(&ColorSpace::DeviceCmyk));
        assert_eq!(state.non_stroking_color_space(), Some(&ColorSpace::DeviceRgb));
    }
}
