/// HSV to RGB, all components in `[0, 1]`
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let h_prime = (h.rem_euclid(1.0) * 6.0) % 6.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

/// Terrain palette for a normalized height: sand, grass, rock, snow
pub fn height_color(t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    if t > 0.85 {
        return hsv_to_rgb(0.0, 0.0, 0.95);
    }
    // Hue sweeps from yellow (low) through green to brown-grey (high)
    let hue = 0.15 + 0.2 * (t * 2.0).min(1.0) - 0.3 * (t - 0.5).max(0.0);
    let saturation = 0.6 - 0.4 * t;
    let value = 0.55 + 0.3 * t;
    hsv_to_rgb(hue, saturation, value)
}
