//! Zoom/translate state of the tree view and the fit-to-container rule.

use serde::{Deserialize, Serialize};

use crate::constants::{INITIAL_TRANSLATE_Y, WHEEL_ZOOM_RATE, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::geometry::{Bounds, GeometryProvider};
use crate::svg::num;

/// Screen position of a content point `p` is `translate + zoom * p`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f64,
    pub translate: (f64, f64),
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            translate: (0.0, 0.0),
        }
    }
}

/// Zoom and translate that fit `content` inside a `container_w` x
/// `container_h` viewport, centred, never enlarging past 100%.
/// Returns `None` while the content has no area yet.
pub fn fit_view(content: Bounds, container_w: f64, container_h: f64) -> Option<ViewState> {
    if !content.has_area() || container_w <= 0.0 || container_h <= 0.0 {
        return None;
    }
    let zoom = (container_w / content.width)
        .min(container_h / content.height)
        .min(1.0);
    let (cx, cy) = content.center();
    Some(ViewState {
        zoom,
        translate: (container_w / 2.0 - zoom * cx, container_h / 2.0 - zoom * cy),
    })
}

impl ViewState {
    /// The view a freshly mounted tree starts with: root centred horizontally,
    /// slightly below the top edge.
    pub fn initial(container_w: f64) -> Self {
        Self {
            zoom: 1.0,
            translate: (container_w / 2.0, INITIAL_TRANSLATE_Y),
        }
    }

    /// Fit the provider's content into the container. Leaves the state as is
    /// when the content has not been laid out yet; returns whether it changed.
    pub fn fit_to(
        &mut self,
        provider: &impl GeometryProvider,
        container_w: f64,
        container_h: f64,
    ) -> bool {
        match fit_view(provider.content_bounds(), container_w, container_h) {
            Some(v) => {
                tracing::debug!(zoom = v.zoom, tx = v.translate.0, ty = v.translate.1, "fit view");
                *self = v;
                true
            }
            None => false,
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(ZOOM_MIN);
    }

    /// Change the zoom (clamped) while the content point under the screen
    /// position `anchor` stays where it is.
    pub fn zoom_about(&mut self, zoom: f64, anchor: (f64, f64)) {
        let zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        let (px, py) = self.to_content(anchor);
        self.zoom = zoom;
        self.translate = (anchor.0 - zoom * px, anchor.1 - zoom * py);
    }

    /// Button zoom, anchored at the container centre.
    pub fn zoom_in_at(&mut self, anchor: (f64, f64)) {
        self.zoom_about(self.zoom + ZOOM_STEP, anchor);
    }

    pub fn zoom_out_at(&mut self, anchor: (f64, f64)) {
        self.zoom_about(self.zoom - ZOOM_STEP, anchor);
    }

    /// Wheel zoom; a negative `delta_y` (scrolling up) zooms in.
    pub fn wheel_zoom(&mut self, delta_y: f64, anchor: (f64, f64)) {
        if !delta_y.is_finite() || delta_y == 0.0 {
            return;
        }
        self.zoom_about(self.zoom * (-delta_y * WHEEL_ZOOM_RATE).exp(), anchor);
    }

    /// Move the view by a screen-space offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate.0 += dx;
        self.translate.1 += dy;
    }

    pub fn to_screen(&self, p: (f64, f64)) -> (f64, f64) {
        (
            self.translate.0 + self.zoom * p.0,
            self.translate.1 + self.zoom * p.1,
        )
    }

    pub fn to_content(&self, screen: (f64, f64)) -> (f64, f64) {
        (
            (screen.0 - self.translate.0) / self.zoom,
            (screen.1 - self.translate.1) / self.zoom,
        )
    }

    /// SVG transform attribute value for the root group.
    pub fn svg_transform(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            num(self.translate.0),
            num(self.translate.1),
            num(self.zoom)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn large_content_is_shrunk_and_centred() {
        let content = Bounds::new(-500.0, -20.0, 2000.0, 800.0);
        let v = fit_view(content, 1000.0, 600.0).unwrap();
        assert!(close(v.zoom, 0.5));
        let (sx, sy) = v.to_screen(content.center());
        assert!(close(sx, 500.0) && close(sy, 300.0));
    }

    #[test]
    fn small_content_is_not_enlarged() {
        let v = fit_view(Bounds::new(0.0, 0.0, 10.0, 10.0), 1000.0, 600.0).unwrap();
        assert_eq!(v.zoom, 1.0);
        assert_eq!(v.to_screen((5.0, 5.0)), (500.0, 300.0));
    }

    #[test]
    fn zero_area_is_a_no_op() {
        let mut v = ViewState::initial(800.0);
        let before = v;
        assert!(!v.fit_to(&Bounds::new(3.0, 4.0, 0.0, 50.0), 800.0, 600.0));
        assert!(!v.fit_to(&Bounds::new(3.0, 4.0, 50.0, 0.0), 800.0, 600.0));
        assert_eq!(v, before);
        assert!(v.fit_to(&Bounds::new(0.0, 0.0, 1600.0, 100.0), 800.0, 600.0));
        assert_eq!(v.zoom, 0.5);
    }

    #[test]
    fn zoom_buttons_are_clamped() {
        let mut v = ViewState::default();
        for _ in 0..20 {
            v.zoom_in();
        }
        assert_eq!(v.zoom, ZOOM_MAX);
        for _ in 0..30 {
            v.zoom_out();
        }
        assert_eq!(v.zoom, ZOOM_MIN);
    }

    #[test]
    fn transform_attribute() {
        let v = ViewState {
            zoom: 0.5,
            translate: (400.0, 100.25),
        };
        assert_eq!(v.svg_transform(), "translate(400,100.25) scale(0.5)");
    }

    #[test]
    fn zoom_keeps_the_anchor_still() {
        let mut v = ViewState {
            zoom: 0.8,
            translate: (120.0, -40.0),
        };
        let anchor = (400.0, 300.0);
        let under = v.to_content(anchor);
        v.zoom_in_at(anchor);
        assert!(close(v.zoom, 1.0));
        let (sx, sy) = v.to_screen(under);
        assert!(close(sx, 400.0) && close(sy, 300.0));
        v.zoom_out_at(anchor);
        v.zoom_out_at(anchor);
        assert!(close(v.zoom, 0.6));
        let (sx, sy) = v.to_screen(under);
        assert!(close(sx, 400.0) && close(sy, 300.0));
    }

    #[test]
    fn anchored_zoom_is_clamped() {
        let mut v = ViewState::default();
        v.zoom_about(50.0, (10.0, 10.0));
        assert_eq!(v.zoom, ZOOM_MAX);
        let (sx, sy) = v.to_screen(v.to_content((10.0, 10.0)));
        assert!(close(sx, 10.0) && close(sy, 10.0));
        v.zoom_about(0.0, (10.0, 10.0));
        assert_eq!(v.zoom, ZOOM_MIN);
    }

    #[test]
    fn wheel_direction_and_anchor() {
        let mut v = ViewState::initial(800.0);
        let cursor = (250.0, 180.0);
        let under = v.to_content(cursor);
        v.wheel_zoom(-100.0, cursor);
        assert!(v.zoom > 1.0);
        let (sx, sy) = v.to_screen(under);
        assert!(close(sx, 250.0) && close(sy, 180.0));
        let zoomed = v;
        v.wheel_zoom(0.0, cursor);
        v.wheel_zoom(f64::NAN, cursor);
        assert_eq!(v, zoomed);
        v.wheel_zoom(300.0, cursor);
        assert!(v.zoom < zoomed.zoom);
    }

    #[test]
    fn pan_moves_translate_only() {
        let mut v = ViewState::initial(800.0);
        v.pan_by(-30.0, 12.5);
        assert_eq!(v.translate, (370.0, 112.5));
        assert_eq!(v.zoom, 1.0);
    }
}
