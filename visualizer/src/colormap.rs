use plotters::prelude::RGBColor;

/// Viridis sampled at nine evenly spaced stops.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

/// Maps `value` within `[min, max]` onto viridis; out-of-range values clamp.
pub fn viridis(value: f64, min: f64, max: f64) -> RGBColor {
    let span = max - min;
    let t = if span > 0.0 {
        ((value - min) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(VIRIDIS.len() - 1);
    let frac = scaled - lower as f64;

    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    let (r0, g0, b0) = VIRIDIS[lower];
    let (r1, g1, b1) = VIRIDIS[upper];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_palette() {
        assert_eq!(viridis(0.0, 0.0, 1.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0, 0.0, 1.0), RGBColor(253, 231, 37));
        assert_eq!(viridis(0.5, 0.0, 1.0), RGBColor(33, 144, 141));
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(viridis(-3.0, 0.0, 1.0), viridis(0.0, 0.0, 1.0));
        assert_eq!(viridis(7.0, 0.0, 1.0), viridis(1.0, 0.0, 1.0));
    }

    #[test]
    fn degenerate_scale_maps_to_low_end() {
        assert_eq!(viridis(0.4, 1.0, 1.0), RGBColor(68, 1, 84));
    }
}
