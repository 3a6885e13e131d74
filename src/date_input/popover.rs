// ============================================================================
// POPOVER CALENDAR - placement & open/closed state
// ============================================================================

use ratatui::layout::Rect;

/// Why a popover went from open to closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    OutsideClick,
    Dismiss,
    Selection,
    Scroll,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopoverState {
    #[default]
    Closed,
    /// `placement` stays `None` until the next draw pass measures the popover.
    Open { anchor: Rect, placement: Option<Rect> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popover {
    state: PopoverState,
    margin: u16,
    last_close: Option<CloseReason>,
}

impl Popover {
    pub fn new(margin: u16) -> Self {
        Self {
            state: PopoverState::Closed,
            margin,
            last_close: None,
        }
    }

    pub fn state(&self) -> PopoverState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PopoverState::Open { .. })
    }

    pub fn last_close(&self) -> Option<CloseReason> {
        self.last_close
    }

    pub fn placement(&self) -> Option<Rect> {
        match self.state {
            PopoverState::Open { placement, .. } => placement,
            PopoverState::Closed => None,
        }
    }

    /// Captures the trigger geometry. Placement is finished by [`Self::measure`].
    pub fn open(&mut self, anchor: Rect) {
        self.state = PopoverState::Open {
            anchor,
            placement: None,
        };
    }

    /// Deferred layout step run while drawing, once the popover's size is known.
    /// Does nothing if the popover was closed in the meantime.
    pub fn measure(&mut self, size: (u16, u16), viewport: Rect) -> Option<Rect> {
        match &mut self.state {
            PopoverState::Open { anchor, placement } => {
                let rect = place_popover(*anchor, size, viewport, self.margin);
                *placement = Some(rect);
                Some(rect)
            }
            PopoverState::Closed => None,
        }
    }

    /// Returns false if it was already closed.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        if !self.is_open() {
            return false;
        }
        log::debug!("date popover closed: {reason:?}");
        self.state = PopoverState::Closed;
        self.last_close = Some(reason);
        true
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.placement()
            .is_some_and(|rect| rect_contains(rect, column, row))
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

/// Prefers the space below `anchor`; flips above when the bottom margin would be
/// crossed, then clamps the result to stay `margin` cells inside the viewport.
pub fn place_popover(anchor: Rect, size: (u16, u16), viewport: Rect, margin: u16) -> Rect {
    let margin = i32::from(margin);
    let left = i32::from(viewport.x) + margin;
    let top = i32::from(viewport.y) + margin;
    let right = (i32::from(viewport.right()) - margin).max(left);
    let bottom = (i32::from(viewport.bottom()) - margin).max(top);

    let width = i32::from(size.0).min(right - left);
    let height = i32::from(size.1).min(bottom - top);

    let mut y = i32::from(anchor.bottom());
    if y + height > bottom {
        y = i32::from(anchor.y) - height;
    }
    let y = y.clamp(top, bottom - height);
    let x = i32::from(anchor.x).clamp(left, right - width);

    Rect {
        x: x as u16,
        y: y as u16,
        width: width as u16,
        height: height as u16,
    }
}
