//! Paint styles
//!
//! A [`Style`] is a bag of optional drawing properties that may delegate to
//! other styles through its `uses` list. Styles live in a [`StyleSheet`] and are
//! referred to by [`StyleId`], so delegation forms a plain id graph where
//! cycles are harmless.
//!
//! Resolution flattens one or more styles into a list ordered by a pre-order
//! depth-first walk of `uses`, each style appearing once. Property lookup takes
//! the first style in that list that defines the property, so a style's own
//! values shadow everything it uses.

use std::collections::HashSet;

use crate::compositing::CompositeOperation;
use crate::context2d::{LineCap, LineJoin, PaintSource};

/// Identity of a style within its sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(u32);

impl StyleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Drawing properties.
///
/// Fill styles use `paint`, `alpha` and `blend_mode`; stroke styles add
/// `width`, `cap`, `join`, `miter_limit` and `clip`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub paint: Option<PaintSource>,
    pub alpha: Option<f64>,
    pub blend_mode: Option<CompositeOperation>,
    pub width: Option<f64>,
    pub cap: Option<LineCap>,
    pub join: Option<LineJoin>,
    pub miter_limit: Option<f64>,
    /// Clip to the path before stroking
    pub clip: Option<bool>,
    /// Fallback styles, consulted in order after this one
    pub uses: Vec<StyleId>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paint(mut self, paint: impl Into<PaintSource>) -> Self {
        self.paint = Some(paint.into());
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn blend_mode(mut self, mode: CompositeOperation) -> Self {
        self.blend_mode = Some(mode);
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn cap(mut self, cap: LineCap) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn join(mut self, join: LineJoin) -> Self {
        self.join = Some(join);
        self
    }

    pub fn miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = Some(limit);
        self
    }

    pub fn clip(mut self, clip: bool) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Append a fallback style
    pub fn uses(mut self, style: StyleId) -> Self {
        self.uses.push(style);
        self
    }
}

/// Arena owning every style a dispatch can reference
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: Vec<Style>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a style, returning its identity
    pub fn insert(&mut self, style: Style) -> StyleId {
        let id = StyleId(self.styles.len() as u32);
        self.styles.push(style);
        id
    }

    pub fn get(&self, id: StyleId) -> Option<&Style> {
        self.styles.get(id.index())
    }

    pub fn get_mut(&mut self, id: StyleId) -> Option<&mut Style> {
        self.styles.get_mut(id.index())
    }

    /// Make `style` fall back to `dependency`. Returns false for unknown ids.
    pub fn add_use(&mut self, style: StyleId, dependency: StyleId) -> bool {
        match self.styles.get_mut(style.index()) {
            Some(entry) => {
                entry.uses.push(dependency);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Drop every style; outstanding ids become dangling
    pub fn clear(&mut self) {
        self.styles.clear();
    }

    /// Flatten `styles` and everything they use.
    pub fn resolve<'i>(&self, styles: impl Into<StyleInput<'i>>) -> ResolvedStyles<'_> {
        let mut visited = HashSet::new();
        self.resolve_with(styles, &mut visited)
    }

    /// Like [`resolve`](Self::resolve), skipping styles already in `visited`.
    pub fn resolve_with<'i>(
        &self,
        styles: impl Into<StyleInput<'i>>,
        visited: &mut HashSet<StyleId>,
    ) -> ResolvedStyles<'_> {
        let mut order = Vec::new();
        self.walk(styles.into().as_slice(), visited, &mut order);
        ResolvedStyles { sheet: self, order }
    }

    // Pre-order depth-first walk on an explicit stack; children are pushed
    // reversed so they pop in declaration order.
    fn walk(&self, ids: &[StyleId], visited: &mut HashSet<StyleId>, order: &mut Vec<StyleId>) {
        let mut pending: Vec<StyleId> = ids.iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(style) = self.get(id) else {
                tracing::warn!("Skipping unknown style {:?}", id);
                continue;
            };
            order.push(id);
            pending.extend(style.uses.iter().rev().copied());
        }
    }
}

/// A single style or an ordered list of styles
#[derive(Debug, Clone, Copy)]
pub enum StyleInput<'a> {
    One(StyleId),
    Many(&'a [StyleId]),
}

impl StyleInput<'_> {
    pub fn as_slice(&self) -> &[StyleId] {
        match self {
            StyleInput::One(id) => std::slice::from_ref(id),
            StyleInput::Many(ids) => ids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<StyleId> for StyleInput<'_> {
    fn from(id: StyleId) -> Self {
        StyleInput::One(id)
    }
}

impl<'a> From<&'a [StyleId]> for StyleInput<'a> {
    fn from(ids: &'a [StyleId]) -> Self {
        StyleInput::Many(ids)
    }
}

impl<'a, const N: usize> From<&'a [StyleId; N]> for StyleInput<'a> {
    fn from(ids: &'a [StyleId; N]) -> Self {
        StyleInput::Many(ids)
    }
}

impl<'a> From<&'a Vec<StyleId>> for StyleInput<'a> {
    fn from(ids: &'a Vec<StyleId>) -> Self {
        StyleInput::Many(ids)
    }
}

/// Resolution result: styles in lookup order
#[derive(Debug, Clone)]
pub struct ResolvedStyles<'s> {
    sheet: &'s StyleSheet,
    order: Vec<StyleId>,
}

impl<'s> ResolvedStyles<'s> {
    /// Ids in lookup order
    pub fn ids(&self) -> &[StyleId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Styles in lookup order
    pub fn iter(&self) -> impl Iterator<Item = &'s Style> + '_ {
        self.order.iter().filter_map(|&id| self.sheet.get(id))
    }

    /// First value `property` yields, scanning in lookup order
    pub fn lookup<T>(&self, property: impl Fn(&'s Style) -> Option<T>) -> Option<T> {
        self.iter().find_map(property)
    }

    pub fn paint(&self) -> Option<&'s PaintSource> {
        self.lookup(|style| style.paint.as_ref())
    }

    pub fn alpha(&self) -> Option<f64> {
        self.lookup(|style| style.alpha)
    }

    pub fn blend_mode(&self) -> Option<CompositeOperation> {
        self.lookup(|style| style.blend_mode)
    }

    pub fn width(&self) -> Option<f64> {
        self.lookup(|style| style.width)
    }

    pub fn cap(&self) -> Option<LineCap> {
        self.lookup(|style| style.cap)
    }

    pub fn join(&self) -> Option<LineJoin> {
        self.lookup(|style| style.join)
    }

    pub fn miter_limit(&self) -> Option<f64> {
        self.lookup(|style| style.miter_limit)
    }

    /// Absent counts as false
    pub fn clip(&self) -> bool {
        self.lookup(|style| style.clip).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context2d::Color;

    #[test]
    fn test_plain_list_keeps_order() {
        let mut sheet = StyleSheet::new();
        let a = sheet.insert(Style::new().alpha(0.1));
        let b = sheet.insert(Style::new().alpha(0.2));
        let c = sheet.insert(Style::new());

        assert_eq!(sheet.resolve(&[c, a, b]).ids(), &[c, a, b]);
    }

    #[test]
    fn test_duplicates_kept_once() {
        let mut sheet = StyleSheet::new();
        let a = sheet.insert(Style::new());
        let b = sheet.insert(Style::new());

        assert_eq!(sheet.resolve(&[a, b, a, b]).ids(), &[a, b]);
    }

    #[test]
    fn test_uses_are_depth_first_preorder() {
        let mut sheet = StyleSheet::new();
        let d = sheet.insert(Style::new());
        let c = sheet.insert(Style::new());
        let b = sheet.insert(Style::new().uses(d));
        let a = sheet.insert(Style::new().uses(b).uses(c));
        let e = sheet.insert(Style::new().uses(c));

        assert_eq!(sheet.resolve(&[a, e]).ids(), &[a, b, d, c, e]);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut sheet = StyleSheet::new();
        let a = sheet.insert(Style::new());
        let b = sheet.insert(Style::new().uses(a));
        assert!(sheet.add_use(a, b));

        assert_eq!(sheet.resolve(a).ids(), &[a, b]);
        assert_eq!(sheet.resolve(b).ids(), &[b, a]);
    }

    #[test]
    fn test_self_use_terminates() {
        let mut sheet = StyleSheet::new();
        let a = sheet.insert(Style::new());
        sheet.add_use(a, a);

        assert_eq!(sheet.resolve(a).ids(), &[a]);
    }

    #[test]
    fn test_first_definition_wins() {
        let mut sheet = StyleSheet::new();
        let b = sheet.insert(Style::new().paint(Color::RED).alpha(0.5));
        let a = sheet.insert(Style::new().paint(Color::BLUE).uses(b));
        let resolved = sheet.resolve(a);

        assert_eq!(resolved.ids(), &[a, b]);
        assert_eq!(resolved.paint(), Some(&PaintSource::Color(Color::BLUE)));
        assert_eq!(resolved.alpha(), Some(0.5));
        assert_eq!(resolved.width(), None);
        assert!(!resolved.clip());
    }

    #[test]
    fn test_shadowed_value_never_leaks() {
        let mut sheet = StyleSheet::new();
        let front = sheet.insert(Style::new().width(4.0).clip(false));
        let back = sheet.insert(Style::new().width(9.0).clip(true));
        let resolved = sheet.resolve(&[front, back]);

        assert_eq!(resolved.width(), Some(4.0));
        assert!(!resolved.clip());
    }

    #[test]
    fn test_visited_set_is_honoured() {
        let mut sheet = StyleSheet::new();
        let a = sheet.insert(Style::new());
        let b = sheet.insert(Style::new().uses(a));
        let mut visited = HashSet::from([a]);

        assert_eq!(sheet.resolve_with(b, &mut visited).ids(), &[b]);
        assert!(visited.contains(&b));
    }

    #[test]
    fn test_unknown_ids_skipped() {
        let mut sheet = StyleSheet::new();
        let a = sheet.insert(Style::new());
        let mut other = StyleSheet::new();
        other.insert(Style::new());
        let stray = other.insert(Style::new());

        assert_eq!(sheet.resolve(&[stray, a]).ids(), &[a]);
    }

    #[test]
    fn test_long_use_chain() {
        let mut sheet = StyleSheet::new();
        let mut next = sheet.insert(Style::new().alpha(0.25));
        for _ in 0..200_000 {
            next = sheet.insert(Style::new().uses(next));
        }
        let resolved = sheet.resolve(next);

        assert_eq!(resolved.len(), 200_001);
        assert_eq!(resolved.ids()[0], next);
        assert_eq!(resolved.alpha(), Some(0.25));
    }

    #[test]
    fn test_empty_input() {
        let sheet = StyleSheet::new();
        let none: &[StyleId] = &[];

        assert!(StyleInput::from(none).is_empty());
        assert!(sheet.resolve(none).is_empty());
    }
}
