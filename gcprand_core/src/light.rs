//! Index-to-light color conversion.
//!
//! The index is used as the hue of an HLS color (fixed lightness and
//! saturation), converted to sRGB, then projected to CIE 1931 xy for lights
//! that take chromaticity coordinates. Points outside the lamp's gamut
//! triangle are moved to the closest reachable point.

use gcprand_traits::LightColor;

const ONE_THIRD: f64 = 1.0 / 3.0;
const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

/// D65 white point, used for black where chromaticity is undefined.
pub const WHITE_POINT: (f64, f64) = (0.3127, 0.3290);

/// Convert hue/lightness/saturation (all in [0, 1]) to RGB in [0, 1].
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + ONE_THIRD),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - ONE_THIRD),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < ONE_SIXTH {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < TWO_THIRDS {
        m1 + (m2 - m1) * (TWO_THIRDS - hue) * 6.0
    } else {
        m1
    }
}

/// Triangle of xy points a lamp can reproduce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamut {
    pub red: (f64, f64),
    pub green: (f64, f64),
    pub blue: (f64, f64),
}

impl Gamut {
    /// Gamut of the common "B" class of color bulbs.
    pub const B: Gamut = Gamut {
        red: (0.675, 0.322),
        green: (0.4091, 0.518),
        blue: (0.167, 0.04),
    };

    pub fn contains(&self, p: (f64, f64)) -> bool {
        let v1 = sub(self.green, self.red);
        let v2 = sub(self.blue, self.red);
        let q = sub(p, self.red);
        let denom = cross(v1, v2);
        if denom == 0.0 {
            return false;
        }
        let s = cross(q, v2) / denom;
        let t = cross(v1, q) / denom;
        s >= 0.0 && t >= 0.0 && s + t <= 1.0
    }

    /// Closest point of the triangle to `p` (identity when inside).
    pub fn clamp(&self, p: (f64, f64)) -> (f64, f64) {
        if self.contains(p) {
            return p;
        }
        [
            closest_on_segment(self.red, self.green, p),
            closest_on_segment(self.blue, self.red, p),
            closest_on_segment(self.green, self.blue, p),
        ]
        .into_iter()
        .min_by(|a, b| dist2(*a, p).total_cmp(&dist2(*b, p)))
        .unwrap_or(p)
    }
}

fn sub(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0 - b.0, a.1 - b.1)
}

fn cross(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    let d = sub(a, b);
    d.0 * d.0 + d.1 * d.1
}

fn closest_on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> (f64, f64) {
    let ab = sub(b, a);
    let ap = sub(p, a);
    let len2 = ab.0 * ab.0 + ab.1 * ab.1;
    if len2 == 0.0 {
        return a;
    }
    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / len2).clamp(0.0, 1.0);
    (a.0 + ab.0 * t, a.1 + ab.1 * t)
}

fn linearize(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// Project sRGB (components in [0, 1]) onto CIE 1931 xy, clamped to `gamut`.
pub fn rgb_to_xy(rgb: (f64, f64, f64), gamut: &Gamut) -> (f64, f64) {
    let (r, g, b) = (linearize(rgb.0), linearize(rgb.1), linearize(rgb.2));
    let x = r * 0.664_511 + g * 0.154_324 + b * 0.162_028;
    let y = r * 0.283_881 + g * 0.668_433 + b * 0.047_685;
    let z = r * 0.000_088 + g * 0.072_310 + b * 0.986_039;
    let sum = x + y + z;
    if sum <= 0.0 {
        return WHITE_POINT;
    }
    gamut.clamp((x / sum, y / sum))
}

/// Light color for an index at the given lightness and saturation.
pub fn light_color(index: f64, lightness: f64, saturation: f64) -> LightColor {
    let rgb = hls_to_rgb(index, lightness, saturation);
    LightColor {
        rgb,
        xy: rgb_to_xy(rgb, &Gamut::B),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64, f64), b: (f64, f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9 && (a.2 - b.2).abs() < 1e-9
    }

    #[test]
    fn hls_primaries() {
        assert!(close(hls_to_rgb(0.0, 0.5, 1.0), (1.0, 0.0, 0.0)));
        assert!(close(hls_to_rgb(ONE_THIRD, 0.5, 1.0), (0.0, 1.0, 0.0)));
        assert!(close(hls_to_rgb(TWO_THIRDS, 0.5, 1.0), (0.0, 0.0, 1.0)));
        assert!(close(hls_to_rgb(0.7, 0.25, 0.0), (0.25, 0.25, 0.25)));
    }

    #[test]
    fn hue_wraps_around() {
        assert!(close(hls_to_rgb(1.0, 0.4, 0.4), hls_to_rgb(0.0, 0.4, 0.4)));
    }

    #[test]
    fn black_maps_to_white_point() {
        assert_eq!(rgb_to_xy((0.0, 0.0, 0.0), &Gamut::B), WHITE_POINT);
    }

    #[test]
    fn xy_stays_inside_gamut() {
        for i in 0..=20 {
            let c = light_color(f64::from(i) / 20.0, 0.4, 0.4);
            let p = c.xy;
            assert!(dist2(Gamut::B.clamp(p), p) < 1e-12, "{p:?} outside gamut");
        }
    }

    #[test]
    fn clamp_moves_outside_points_onto_edge() {
        let g = Gamut::B;
        let far = (0.9, 0.9);
        let c = g.clamp(far);
        assert_ne!(c, far);
        assert!(dist2(c, far) < dist2(g.red, far) + 1e-12);
    }
}
