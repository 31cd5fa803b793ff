//! Spherical Web-Mercator math on a 256px tile pyramid

use std::f64::consts::PI;

use super::LatLng;

const TILE_SIZE: f64 = 256.0;
const MAX_SIN_LAT: f64 = 0.9999;

/// Pixel dimensions of the rendered map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// World pixel coordinates of `point` at `zoom`
    pub fn project(point: LatLng, zoom: f64) -> (f64, f64) {
        let scale = TILE_SIZE * 2f64.powf(zoom);
        let x = (point.lng + 180.0) / 360.0 * scale;
        let sin = point.lat.to_radians().sin().clamp(-MAX_SIN_LAT, MAX_SIN_LAT);
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * scale;
        (x, y)
    }

    pub fn unproject((x, y): (f64, f64), zoom: f64) -> LatLng {
        let scale = TILE_SIZE * 2f64.powf(zoom);
        let lng = x / scale * 360.0 - 180.0;
        let n = PI - 2.0 * PI * y / scale;
        LatLng::new(n.sinh().atan().to_degrees(), lng)
    }

    /// South-west and north-east corners of the view centred on `center`
    pub fn bounds(&self, center: LatLng, zoom: f64) -> (LatLng, LatLng) {
        let (cx, cy) = Self::project(center, zoom);
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        (
            Self::unproject((cx - hw, cy + hh), zoom),
            Self::unproject((cx + hw, cy - hh), zoom),
        )
    }

    pub fn contains(&self, center: LatLng, zoom: f64, point: LatLng) -> bool {
        let (cx, cy) = Self::project(center, zoom);
        let (px, py) = Self::project(point, zoom);
        (px - cx).abs() <= self.width / 2.0 && (py - cy).abs() <= self.height / 2.0
    }

    /// Centre and highest integer zoom (capped at `max_zoom`) at which every
    /// point fits inside the viewport minus `padding` on each side.
    pub fn fit(&self, points: &[LatLng], padding: (f64, f64), max_zoom: u8) -> Option<(LatLng, f64)> {
        let first = points.first()?;
        let (mut south, mut west, mut north, mut east) = (first.lat, first.lng, first.lat, first.lng);
        for p in &points[1..] {
            south = south.min(p.lat);
            north = north.max(p.lat);
            west = west.min(p.lng);
            east = east.max(p.lng);
        }

        let sw = LatLng::new(south, west);
        let ne = LatLng::new(north, east);
        let avail_w = (self.width - 2.0 * padding.0).max(1.0);
        let avail_h = (self.height - 2.0 * padding.1).max(1.0);

        let zoom = (0..=max_zoom)
            .rev()
            .map(f64::from)
            .find(|&z| {
                let (x0, y0) = Self::project(sw, z);
                let (x1, y1) = Self::project(ne, z);
                (x1 - x0).abs() <= avail_w && (y1 - y0).abs() <= avail_h
            })
            .unwrap_or(0.0);

        let (x0, y0) = Self::project(sw, zoom);
        let (x1, y1) = Self::project(ne, zoom);
        let center = Self::unproject(((x0 + x1) / 2.0, (y0 + y1) / 2.0), zoom);
        Some((center, zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_project_origin_is_world_centre() {
        let (x, y) = Viewport::project(LatLng::new(0.0, 0.0), 0.0);
        assert!(close(x, 128.0));
        assert!(close(y, 128.0));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let p = LatLng::new(-2.3, 119.35);
        let back = Viewport::unproject(Viewport::project(p, 9.0), 9.0);
        assert!(close(back.lat, p.lat));
        assert!(close(back.lng, p.lng));
    }

    #[test]
    fn test_contains_edges_of_view() {
        let vp = Viewport::new(1024.0, 768.0);
        let center = LatLng::new(-2.3, 119.35);
        assert!(vp.contains(center, 13.0, center));
        assert!(!vp.contains(center, 13.0, LatLng::new(-2.3, 120.35)));
        // One degree of longitude is ~364px at zoom 9, inside the 512px half-width
        assert!(vp.contains(center, 9.0, LatLng::new(-2.3, 120.35)));
    }

    #[test]
    fn test_fit_single_point_uses_max_zoom() {
        let vp = Viewport::new(1024.0, 768.0);
        let p = LatLng::new(-2.5, 119.4);
        let (center, zoom) = vp.fit(&[p], (24.0, 24.0), 19).unwrap();
        assert_eq!(zoom, 19.0);
        assert!(close(center.lat, p.lat));
        assert!(close(center.lng, p.lng));
    }

    #[test]
    fn test_fit_keeps_all_points_in_view() {
        let vp = Viewport::new(1024.0, 768.0);
        let points = [
            LatLng::new(-2.5, 119.4),
            LatLng::new(-1.2, 118.9),
            LatLng::new(-3.1, 119.9),
        ];
        let (center, zoom) = vp.fit(&points, (24.0, 24.0), 19).unwrap();
        assert!(zoom < 19.0);
        assert!(points.iter().all(|&p| vp.contains(center, zoom, p)));
        // One level closer no longer fits
        assert!(!points.iter().all(|&p| vp.contains(center, zoom + 1.0, p)));
    }

    #[test]
    fn test_fit_empty_is_none() {
        assert!(Viewport::new(800.0, 600.0).fit(&[], (0.0, 0.0), 19).is_none());
    }
}
