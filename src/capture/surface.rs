/// Where captured strokes are echoed back to the user.
///
/// Window creation, cursors and the event loop belong to the implementor; the
/// capture session only issues these primitives.
pub trait DisplaySurface {
    /// Mark a single position, e.g. the start of a stroke.
    fn draw_point(&mut self, x: i32, y: i32);

    /// Draw a line from `(x1, y1)` to `(x2, y2)`.
    fn draw_line_segment(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Erase everything drawn so far.
    fn clear_surface(&mut self);
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn draw_point(&mut self, x: i32, y: i32) {
        (**self).draw_point(x, y)
    }

    fn draw_line_segment(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        (**self).draw_line_segment(x1, y1, x2, y2)
    }

    fn clear_surface(&mut self) {
        (**self).clear_surface()
    }
}
