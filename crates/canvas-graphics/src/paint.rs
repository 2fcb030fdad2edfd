//! Paint dispatch
//!
//! Applies resolved [`Style`](crate::Style)s to a [`DrawingSurface`] around a
//! single fill or stroke. Every styled call runs inside a save/restore scope,
//! so the surface state seen by the caller is unchanged afterwards, even when
//! the primitive fails.

use std::ops::{Deref, DerefMut};

use crate::style::{ResolvedStyles, StyleInput, StyleSheet};
use crate::surface::DrawingSurface;

/// Fill/stroke dispatcher bound to one surface
pub struct Painter<'a, S: DrawingSurface + ?Sized> {
    sheet: &'a StyleSheet,
    surface: &'a mut S,
}

/// Run `f` with a painter for `surface`, returning whatever `f` returns.
pub fn paint<S, R>(
    sheet: &StyleSheet,
    surface: &mut S,
    f: impl FnOnce(&mut Painter<'_, S>) -> R,
) -> R
where
    S: DrawingSurface + ?Sized,
{
    let mut painter = Painter::new(sheet, surface);
    f(&mut painter)
}

impl<'a, S: DrawingSurface + ?Sized> Painter<'a, S> {
    pub fn new(sheet: &'a StyleSheet, surface: &'a mut S) -> Self {
        Self { sheet, surface }
    }

    /// The bound surface, for building paths between calls
    pub fn surface(&mut self) -> &mut S {
        self.surface
    }

    pub fn sheet(&self) -> &'a StyleSheet {
        self.sheet
    }

    /// Fill the surface's current path with `styles`.
    pub fn fill<'i>(&mut self, styles: impl Into<StyleInput<'i>>) -> Result<(), S::Error> {
        let styles = styles.into();
        if styles.is_empty() {
            return self.surface.fill();
        }

        let resolved = self.sheet.resolve(styles);
        tracing::trace!("fill with {} resolved styles", resolved.len());

        let mut surface = SaveScope::enter(&mut *self.surface);
        apply_global(&mut *surface, &resolved);
        if let Some(paint) = resolved.paint() {
            surface.set_fill_paint(paint)?;
        }
        surface.fill()
    }

    /// Stroke the surface's current path with `styles`, clipping first when
    /// the resolved `clip` flag is set.
    pub fn stroke<'i>(&mut self, styles: impl Into<StyleInput<'i>>) -> Result<(), S::Error> {
        let styles = styles.into();
        if styles.is_empty() {
            return self.surface.stroke();
        }

        let resolved = self.sheet.resolve(styles);
        tracing::trace!("stroke with {} resolved styles", resolved.len());

        let mut surface = SaveScope::enter(&mut *self.surface);
        apply_global(&mut *surface, &resolved);
        if let Some(paint) = resolved.paint() {
            surface.set_stroke_paint(paint)?;
        }
        if let Some(width) = resolved.width() {
            surface.set_line_width(width);
        }
        if let Some(cap) = resolved.cap() {
            surface.set_line_cap(cap);
        }
        if let Some(join) = resolved.join() {
            surface.set_line_join(join);
        }
        if let Some(limit) = resolved.miter_limit() {
            surface.set_miter_limit(limit);
        }
        if resolved.clip() {
            surface.clip()?;
        }
        surface.stroke()
    }
}

fn apply_global<S: DrawingSurface + ?Sized>(surface: &mut S, resolved: &ResolvedStyles<'_>) {
    if let Some(alpha) = resolved.alpha() {
        surface.set_global_alpha(alpha);
    }
    if let Some(mode) = resolved.blend_mode() {
        surface.set_composite_operation(mode);
    }
}

/// Saved surface state, restored on drop
struct SaveScope<'s, S: DrawingSurface + ?Sized> {
    surface: &'s mut S,
}

impl<'s, S: DrawingSurface + ?Sized> SaveScope<'s, S> {
    fn enter(surface: &'s mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: DrawingSurface + ?Sized> Deref for SaveScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for SaveScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for SaveScope<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositing::CompositeOperation;
    use crate::context2d::{Color, LineCap, LineJoin, PaintSource};
    use crate::style::{Style, StyleId};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Save,
        Restore,
        Alpha(f64),
        Composite(CompositeOperation),
        FillPaint(PaintSource),
        StrokePaint(PaintSource),
        LineWidth(f64),
        LineCap(LineCap),
        LineJoin(LineJoin),
        MiterLimit(f64),
        Fill,
        Stroke,
        Clip,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_primitives: bool,
    }

    impl Recorder {
        fn primitive(&mut self, call: Call) -> Result<(), &'static str> {
            self.calls.push(call);
            if self.fail_primitives {
                Err("primitive failed")
            } else {
                Ok(())
            }
        }
    }

    impl DrawingSurface for Recorder {
        type Error = &'static str;

        fn save(&mut self) {
            self.calls.push(Call::Save);
        }
        fn restore(&mut self) {
            self.calls.push(Call::Restore);
        }
        fn set_global_alpha(&mut self, alpha: f64) {
            self.calls.push(Call::Alpha(alpha));
        }
        fn set_composite_operation(&mut self, op: CompositeOperation) {
            self.calls.push(Call::Composite(op));
        }
        fn set_fill_paint(&mut self, paint: &PaintSource) -> Result<(), Self::Error> {
            self.calls.push(Call::FillPaint(paint.clone()));
            Ok(())
        }
        fn set_stroke_paint(&mut self, paint: &PaintSource) -> Result<(), Self::Error> {
            self.calls.push(Call::StrokePaint(paint.clone()));
            Ok(())
        }
        fn set_line_width(&mut self, width: f64) {
            self.calls.push(Call::LineWidth(width));
        }
        fn set_line_cap(&mut self, cap: LineCap) {
            self.calls.push(Call::LineCap(cap));
        }
        fn set_line_join(&mut self, join: LineJoin) {
            self.calls.push(Call::LineJoin(join));
        }
        fn set_miter_limit(&mut self, limit: f64) {
            self.calls.push(Call::MiterLimit(limit));
        }
        fn fill(&mut self) -> Result<(), Self::Error> {
            self.primitive(Call::Fill)
        }
        fn stroke(&mut self) -> Result<(), Self::Error> {
            self.primitive(Call::Stroke)
        }
        fn clip(&mut self) -> Result<(), Self::Error> {
            self.primitive(Call::Clip)
        }
    }

    fn no_styles() -> &'static [StyleId] {
        &[]
    }

    #[test]
    fn test_empty_styles_skip_save_restore() {
        let sheet = StyleSheet::new();
        let mut surface = Recorder::default();

        paint(&sheet, &mut surface, |painter| {
            painter.fill(no_styles()).unwrap();
            painter.stroke(no_styles()).unwrap();
        });

        assert_eq!(surface.calls, vec![Call::Fill, Call::Stroke]);
    }

    #[test]
    fn test_fill_alpha_scoped() {
        let mut sheet = StyleSheet::new();
        let half = sheet.insert(Style::new().alpha(0.5));
        let mut surface = Recorder::default();

        Painter::new(&sheet, &mut surface).fill(&[half]).unwrap();

        assert_eq!(
            surface.calls,
            vec![Call::Save, Call::Alpha(0.5), Call::Fill, Call::Restore]
        );
    }

    #[test]
    fn test_stroke_clip_before_stroke() {
        let mut sheet = StyleSheet::new();
        let red = sheet.insert(Style::new().paint(Color::RED).width(2.0).clip(true));
        let mut surface = Recorder::default();

        Painter::new(&sheet, &mut surface).stroke(&[red]).unwrap();

        assert_eq!(
            surface.calls,
            vec![
                Call::Save,
                Call::StrokePaint(PaintSource::Color(Color::RED)),
                Call::LineWidth(2.0),
                Call::Clip,
                Call::Stroke,
                Call::Restore,
            ]
        );
    }

    #[test]
    fn test_stroke_applies_every_line_property() {
        let mut sheet = StyleSheet::new();
        let base = sheet.insert(
            Style::new()
                .cap(LineCap::Round)
                .join(LineJoin::Bevel)
                .miter_limit(4.0)
                .blend_mode(CompositeOperation::Multiply),
        );
        let top = sheet.insert(Style::new().width(3.0).uses(base));
        let mut surface = Recorder::default();

        Painter::new(&sheet, &mut surface).stroke(top).unwrap();

        assert_eq!(
            surface.calls,
            vec![
                Call::Save,
                Call::Composite(CompositeOperation::Multiply),
                Call::LineWidth(3.0),
                Call::LineCap(LineCap::Round),
                Call::LineJoin(LineJoin::Bevel),
                Call::MiterLimit(4.0),
                Call::Stroke,
                Call::Restore,
            ]
        );
    }

    #[test]
    fn test_own_paint_wins_inherited_alpha() {
        let mut sheet = StyleSheet::new();
        let b = sheet.insert(Style::new().paint(Color::RED).alpha(0.5));
        let a = sheet.insert(Style::new().paint(Color::BLUE).uses(b));
        let mut surface = Recorder::default();

        Painter::new(&sheet, &mut surface).fill(a).unwrap();

        assert_eq!(
            surface.calls,
            vec![
                Call::Save,
                Call::Alpha(0.5),
                Call::FillPaint(PaintSource::Color(Color::BLUE)),
                Call::Fill,
                Call::Restore,
            ]
        );
    }

    #[test]
    fn test_failed_primitive_still_restores() {
        let mut sheet = StyleSheet::new();
        let style = sheet.insert(Style::new().clip(true));
        let mut surface = Recorder { fail_primitives: true, ..Recorder::default() };

        let result = Painter::new(&sheet, &mut surface).stroke(style);

        assert_eq!(result, Err("primitive failed"));
        assert_eq!(surface.calls, vec![Call::Save, Call::Clip, Call::Restore]);
    }

    #[test]
    fn test_paint_returns_callback_result() {
        let sheet = StyleSheet::new();
        let mut surface = Recorder::default();

        let answer = paint(&sheet, &mut surface, |painter| {
            painter.fill(no_styles()).map(|_| 42)
        });

        assert_eq!(answer, Ok(42));
    }
}
