//! Star fill colors from spectral classification.
//!
//! The leading letter of a spectral type (`G2V`, `M1-2Ia-Iab`, ...) selects a
//! hue and saturation; brightness falls off with apparent magnitude. Stars
//! without a recognizable class are drawn in grayscale.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HueSaturation {
    /// Degrees, `0..360`.
    pub hue: f32,
    /// Percent, `0..=100`.
    pub saturation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn gray(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Hue and saturation for the class letter at the start of `code`, or
/// `None` for an empty or unrecognized class.
pub fn spectral_hue_saturation(code: &str) -> Option<HueSaturation> {
    let (hue, saturation) = match code.trim_start().chars().next()? {
        'O' | 'W' => (240.0, 80.0),
        'B' => (240.0, 30.0),
        'A' => (240.0, 20.0),
        'F' => (240.0, 0.0),
        'G' => (50.0, 60.0),
        'K' => (350.0, 50.0),
        'M' | 'C' => (0.0, 90.0),
        _ => return None,
    };
    Some(HueSaturation { hue, saturation })
}

/// Fill color of a star label.
pub fn star_fill(spectra: &str, magnitude: f32) -> Rgb {
    match spectral_hue_saturation(spectra) {
        Some(HueSaturation { hue, saturation }) => {
            let brightness = 100.0 - (magnitude / 255.0) * 100.0;
            hsb_to_rgb(hue, saturation, brightness)
        }
        None => Rgb::gray((255.0 - magnitude).clamp(0.0, 255.0) as u8),
    }
}

/// HSB (hue in degrees, saturation and brightness in percent) to RGB.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> Rgb {
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let v = (brightness / 100.0).clamp(0.0, 1.0);
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_letters_map_to_hues() {
        assert_eq!(spectral_hue_saturation("G2V").map(|hs| hs.hue), Some(50.0));
        assert_eq!(spectral_hue_saturation("M5").map(|hs| hs.hue), Some(0.0));
        assert_eq!(spectral_hue_saturation("K0III").map(|hs| hs.hue), Some(350.0));
        assert_eq!(
            spectral_hue_saturation("WC8"),
            Some(HueSaturation {
                hue: 240.0,
                saturation: 80.0
            })
        );
        assert_eq!(spectral_hue_saturation("Z9"), None);
        assert_eq!(spectral_hue_saturation(""), None);
        assert_eq!(spectral_hue_saturation("g2v"), None);
    }

    #[test]
    fn unknown_class_falls_back_to_grayscale() {
        assert_eq!(star_fill("Z9", 5.0), Rgb::gray(250));
        assert_eq!(star_fill("", -1.0), Rgb::gray(255));
        assert_eq!(star_fill("", 300.0), Rgb::gray(0));
    }

    #[test]
    fn known_class_uses_hsb() {
        // F stars are unsaturated, so they come out as a gray of the brightness.
        assert_eq!(star_fill("F5", 0.0), Rgb::gray(255));
        let sunlike = star_fill("G2V", 0.0);
        assert!(sunlike.r == 255 && sunlike.g > sunlike.b);
    }

    #[test]
    fn hsb_primaries() {
        assert_eq!(hsb_to_rgb(0.0, 100.0, 100.0), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(hsb_to_rgb(120.0, 100.0, 100.0), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(hsb_to_rgb(240.0, 100.0, 100.0), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(hsb_to_rgb(360.0, 100.0, 50.0), Rgb { r: 128, g: 0, b: 0 });
        assert_eq!(Rgb { r: 255, g: 8, b: 171 }.to_hex(), "#FF08AB");
    }
}
