//! Screen geometry shared by drawing and mouse hit-testing

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::config::ComposerPosition;
use crate::picker::Placement;

/// Composer text rows shown before it stops growing
const COMPOSER_MAX_LINES: usize = 8;

/// Border + title row + search row + border
const DROPDOWN_CHROME: u16 = 4;
const DROPDOWN_MIN_WIDTH: u16 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub info: Rect,
    pub transcript: Rect,
    pub composer: Rect,
    /// The `[/]` button on the composer's top border
    pub trigger: Rect,
    pub footer: Rect,
}

impl Areas {
    pub fn compute(frame: Rect, position: ComposerPosition, composer_lines: usize) -> Self {
        let rows = composer_lines.clamp(1, COMPOSER_MAX_LINES) as u16;
        let composer_height = Constraint::Length(rows + 2);

        let (info, transcript, composer, footer) = match position {
            ComposerPosition::Bottom => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1), // Info line
                        Constraint::Min(3),    // Transcript
                        composer_height,       // Composer
                        Constraint::Length(1), // Footer
                    ])
                    .split(frame);
                (chunks[0], chunks[1], chunks[2], chunks[3])
            }
            ComposerPosition::Top => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        composer_height,
                        Constraint::Min(3),
                        Constraint::Length(1),
                    ])
                    .split(frame);
                (chunks[0], chunks[2], chunks[1], chunks[3])
            }
        };

        let trigger = Rect {
            x: composer.x + composer.width.saturating_sub(5),
            y: composer.y,
            width: 3.min(composer.width),
            height: 1.min(composer.height),
        };

        Self {
            info,
            transcript,
            composer,
            trigger,
            footer,
        }
    }
}

/// Dropdown rectangle, right-aligned with the trigger and opening in the
/// direction chosen at open time. Clipped to the frame.
pub fn dropdown_rect(
    frame: Rect,
    trigger: Rect,
    placement: Placement,
    list_rows: usize,
    content_width: usize,
) -> Rect {
    let height = (list_rows.max(1) as u16).saturating_add(DROPDOWN_CHROME);
    let width = (content_width as u16)
        .saturating_add(4)
        .max(DROPDOWN_MIN_WIDTH)
        .min(frame.width);

    let x = trigger.right().saturating_sub(width).max(frame.x);
    let y = match placement {
        Placement::Above => trigger.y.saturating_sub(height).max(frame.y),
        Placement::Below => trigger.bottom(),
    };

    Rect {
        x,
        y,
        width,
        height,
    }
    .intersection(frame)
}

/// The list rows inside a dropdown
pub fn dropdown_list(dropdown: Rect) -> Rect {
    Rect {
        x: dropdown.x + 1,
        y: dropdown.y + 3,
        width: dropdown.width.saturating_sub(2),
        height: dropdown.height.saturating_sub(DROPDOWN_CHROME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_composer_layout() {
        let frame = Rect::new(0, 0, 80, 30);
        let areas = Areas::compute(frame, ComposerPosition::Bottom, 1);
        assert_eq!(areas.composer, Rect::new(0, 26, 80, 3));
        assert_eq!(areas.footer.y, 29);
        assert_eq!(areas.trigger, Rect::new(75, 26, 3, 1));
    }

    #[test]
    fn test_composer_grows_then_caps() {
        let frame = Rect::new(0, 0, 80, 40);
        let three = Areas::compute(frame, ComposerPosition::Top, 3);
        assert_eq!(three.composer.height, 5);
        assert_eq!(three.composer.y, 1);
        let many = Areas::compute(frame, ComposerPosition::Top, 50);
        assert_eq!(many.composer.height, 10);
    }

    #[test]
    fn test_dropdown_above_and_below() {
        let frame = Rect::new(0, 0, 80, 30);
        let trigger = Rect::new(75, 26, 3, 1);

        let above = dropdown_rect(frame, trigger, Placement::Above, 3, 10);
        assert_eq!(above, Rect::new(50, 19, 28, 7));
        assert_eq!(dropdown_list(above), Rect::new(51, 22, 26, 3));

        let top_trigger = Rect::new(75, 1, 3, 1);
        let below = dropdown_rect(frame, top_trigger, Placement::Below, 3, 40);
        assert_eq!(below, Rect::new(34, 2, 44, 7));
    }

    #[test]
    fn test_dropdown_is_clipped_to_frame() {
        let frame = Rect::new(0, 0, 20, 10);
        let trigger = Rect::new(15, 8, 3, 1);
        let rect = dropdown_rect(frame, trigger, Placement::Below, 5, 60);
        assert!(rect.bottom() <= frame.bottom());
        assert!(rect.right() <= frame.right());
    }
}
