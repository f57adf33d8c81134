use glam::Vec2;

/// Cursor shown over the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DragSession {
    pub dragging: bool,
    pub last_pointer: Vec2,
}

impl DragSession {
    /// Returns false if a drag was already in progress.
    pub fn begin(&mut self, pointer: Vec2) -> bool {
        if self.dragging {
            return false;
        }
        self.dragging = true;
        self.last_pointer = pointer;
        true
    }

    /// Delta against the previous sample, or `None` when not dragging.
    pub fn advance(&mut self, pointer: Vec2) -> Option<Vec2> {
        if !self.dragging {
            return None;
        }
        let delta = pointer - self.last_pointer;
        self.last_pointer = pointer;
        Some(delta)
    }

    pub fn end(&mut self) {
        self.dragging = false;
    }

    pub fn cursor(&self) -> Cursor {
        if self.dragging { Cursor::Grabbing } else { Cursor::Grab }
    }
}

/// The one pointer allowed to drive a drag. Samples from any other
/// pointer (a second finger, a stray mouse) are dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActivePointer(Option<i32>);

impl ActivePointer {
    /// Take ownership for `id`; false if another pointer already holds it.
    pub fn claim(&mut self, id: i32) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(id);
        true
    }

    pub fn owns(&self, id: i32) -> bool {
        self.0 == Some(id)
    }

    /// Give up ownership if `id` holds it.
    pub fn release(&mut self, id: i32) -> bool {
        if !self.owns(id) {
            return false;
        }
        self.0 = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_are_ignored_until_begin() {
        let mut drag = DragSession::default();
        assert_eq!(drag.advance(Vec2::new(10.0, 10.0)), None);
        assert_eq!(drag.cursor(), Cursor::Grab);
    }

    #[test]
    fn delta_is_against_previous_sample() {
        let mut drag = DragSession::default();
        assert!(drag.begin(Vec2::new(100.0, 100.0)));
        assert_eq!(drag.advance(Vec2::new(110.0, 100.0)), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(drag.advance(Vec2::new(115.0, 90.0)), Some(Vec2::new(5.0, -10.0)));
        assert_eq!(drag.cursor().as_css(), "grabbing");
    }

    #[test]
    fn begin_while_dragging_keeps_anchor() {
        let mut drag = DragSession::default();
        drag.begin(Vec2::new(1.0, 1.0));
        assert!(!drag.begin(Vec2::new(50.0, 50.0)));
        assert_eq!(drag.last_pointer, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn end_restores_grab() {
        let mut drag = DragSession::default();
        drag.begin(Vec2::ZERO);
        drag.end();
        assert!(!drag.dragging);
        assert_eq!(drag.cursor(), Cursor::Grab);
        assert_eq!(drag.advance(Vec2::ONE), None);
    }

    #[test]
    fn only_the_claiming_pointer_is_owned() {
        let mut active = ActivePointer::default();
        assert!(active.claim(7));
        assert!(!active.claim(8));
        assert!(active.owns(7));
        assert!(!active.owns(8));

        assert!(!active.release(8));
        assert!(active.release(7));
        assert!(!active.owns(7));
        assert!(active.claim(8));
    }
}
