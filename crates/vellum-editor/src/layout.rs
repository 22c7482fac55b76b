//! Desktop vs. mobile toolbar layout.

use strum::{AsRefStr, Display};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Layout {
    /// Floating toolbar shown whenever the block is active.
    #[default]
    Desktop,
    /// Toolbar is a collapsible overlay, opened separately while active.
    Mobile,
}

impl Layout {
    pub fn from_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px < breakpoint_px {
            Layout::Mobile
        } else {
            Layout::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Layout::Mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_is_exclusive() {
        assert_eq!(Layout::from_width(767, 768), Layout::Mobile);
        assert_eq!(Layout::from_width(768, 768), Layout::Desktop);
        assert!(Layout::from_width(320, 768).is_mobile());
    }
}
