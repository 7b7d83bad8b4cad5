use std::{f64::consts::PI, fmt};

use crate::util::num::decimal_number_to_string;

/// An RGBA color with floating point components.
///
/// Components are nominally in `0.0..=1.0` but are not clamped while colors
/// are being computed, so `#fff + #fff - #fff` still gives white. Clamping
/// only happens when the color is converted to bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red:   f32,
    pub green: f32,
    pub blue:  f32,
    pub alpha: f32,
}

/// CSS named colors, sorted by name for binary search.
static COLOR_NAMES: &[(&str, [u8; 4])] = &[("aliceblue", [240, 248, 255, 255]),
                                           ("antiquewhite", [250, 235, 215, 255]),
                                           ("aqua", [0, 255, 255, 255]),
                                           ("aquamarine", [127, 255, 212, 255]),
                                           ("azure", [240, 255, 255, 255]),
                                           ("beige", [245, 245, 220, 255]),
                                           ("bisque", [255, 228, 196, 255]),
                                           ("black", [0, 0, 0, 255]),
                                           ("blanchedalmond", [255, 235, 205, 255]),
                                           ("blue", [0, 0, 255, 255]),
                                           ("blueviolet", [138, 43, 226, 255]),
                                           ("brown", [165, 42, 42, 255]),
                                           ("burlywood", [222, 184, 135, 255]),
                                           ("cadetblue", [95, 158, 160, 255]),
                                           ("chartreuse", [127, 255, 0, 255]),
                                           ("chocolate", [210, 105, 30, 255]),
                                           ("coral", [255, 127, 80, 255]),
                                           ("cornflowerblue", [100, 149, 237, 255]),
                                           ("cornsilk", [255, 248, 220, 255]),
                                           ("crimson", [220, 20, 60, 255]),
                                           ("cyan", [0, 255, 255, 255]),
                                           ("darkblue", [0, 0, 139, 255]),
                                           ("darkcyan", [0, 139, 139, 255]),
                                           ("darkgoldenrod", [184, 134, 11, 255]),
                                           ("darkgray", [169, 169, 169, 255]),
                                           ("darkgreen", [0, 100, 0, 255]),
                                           ("darkgrey", [169, 169, 169, 255]),
                                           ("darkkhaki", [189, 183, 107, 255]),
                                           ("darkmagenta", [139, 0, 139, 255]),
                                           ("darkolivegreen", [85, 107, 47, 255]),
                                           ("darkorange", [255, 140, 0, 255]),
                                           ("darkorchid", [153, 50, 204, 255]),
                                           ("darkred", [139, 0, 0, 255]),
                                           ("darksalmon", [233, 150, 122, 255]),
                                           ("darkseagreen", [143, 188, 143, 255]),
                                           ("darkslateblue", [72, 61, 139, 255]),
                                           ("darkslategray", [47, 79, 79, 255]),
                                           ("darkslategrey", [47, 79, 79, 255]),
                                           ("darkturquoise", [0, 206, 209, 255]),
                                           ("darkviolet", [148, 0, 211, 255]),
                                           ("deeppink", [255, 20, 147, 255]),
                                           ("deepskyblue", [0, 191, 255, 255]),
                                           ("dimgray", [105, 105, 105, 255]),
                                           ("dimgrey", [105, 105, 105, 255]),
                                           ("dodgerblue", [30, 144, 255, 255]),
                                           ("firebrick", [178, 34, 34, 255]),
                                           ("floralwhite", [255, 250, 240, 255]),
                                           ("forestgreen", [34, 139, 34, 255]),
                                           ("fuchsia", [255, 0, 255, 255]),
                                           ("gainsboro", [220, 220, 220, 255]),
                                           ("ghostwhite", [248, 248, 255, 255]),
                                           ("gold", [255, 215, 0, 255]),
                                           ("goldenrod", [218, 165, 32, 255]),
                                           ("gray", [128, 128, 128, 255]),
                                           ("green", [0, 128, 0, 255]),
                                           ("greenyellow", [173, 255, 47, 255]),
                                           ("grey", [128, 128, 128, 255]),
                                           ("honeydew", [240, 255, 240, 255]),
                                           ("hotpink", [255, 105, 180, 255]),
                                           ("indianred", [205, 92, 92, 255]),
                                           ("indigo", [75, 0, 130, 255]),
                                           ("ivory", [255, 255, 240, 255]),
                                           ("khaki", [240, 230, 140, 255]),
                                           ("lavender", [230, 230, 250, 255]),
                                           ("lavenderblush", [255, 240, 245, 255]),
                                           ("lawngreen", [124, 252, 0, 255]),
                                           ("lemonchiffon", [255, 250, 205, 255]),
                                           ("lightblue", [173, 216, 230, 255]),
                                           ("lightcoral", [240, 128, 128, 255]),
                                           ("lightcyan", [224, 255, 255, 255]),
                                           ("lightgoldenrodyellow", [250, 250, 210, 255]),
                                           ("lightgray", [211, 211, 211, 255]),
                                           ("lightgreen", [144, 238, 144, 255]),
                                           ("lightgrey", [211, 211, 211, 255]),
                                           ("lightpink", [255, 182, 193, 255]),
                                           ("lightsalmon", [255, 160, 122, 255]),
                                           ("lightseagreen", [32, 178, 170, 255]),
                                           ("lightskyblue", [135, 206, 250, 255]),
                                           ("lightslategray", [119, 136, 153, 255]),
                                           ("lightslategrey", [119, 136, 153, 255]),
                                           ("lightsteelblue", [176, 196, 222, 255]),
                                           ("lightyellow", [255, 255, 224, 255]),
                                           ("lime", [0, 255, 0, 255]),
                                           ("limegreen", [50, 205, 50, 255]),
                                           ("linen", [250, 240, 230, 255]),
                                           ("magenta", [255, 0, 255, 255]),
                                           ("maroon", [128, 0, 0, 255]),
                                           ("mediumaquamarine", [102, 205, 170, 255]),
                                           ("mediumblue", [0, 0, 205, 255]),
                                           ("mediumorchid", [186, 85, 211, 255]),
                                           ("mediumpurple", [147, 112, 219, 255]),
                                           ("mediumseagreen", [60, 179, 113, 255]),
                                           ("mediumslateblue", [123, 104, 238, 255]),
                                           ("mediumspringgreen", [0, 250, 154, 255]),
                                           ("mediumturquoise", [72, 209, 204, 255]),
                                           ("mediumvioletred", [199, 21, 133, 255]),
                                           ("midnightblue", [25, 25, 112, 255]),
                                           ("mintcream", [245, 255, 250, 255]),
                                           ("mistyrose", [255, 228, 225, 255]),
                                           ("moccasin", [255, 228, 181, 255]),
                                           ("navajowhite", [255, 222, 173, 255]),
                                           ("navy", [0, 0, 128, 255]),
                                           ("oldlace", [253, 245, 230, 255]),
                                           ("olive", [128, 128, 0, 255]),
                                           ("olivedrab", [107, 142, 35, 255]),
                                           ("orange", [255, 165, 0, 255]),
                                           ("orangered", [255, 69, 0, 255]),
                                           ("orchid", [218, 112, 214, 255]),
                                           ("palegoldenrod", [238, 232, 170, 255]),
                                           ("palegreen", [152, 251, 152, 255]),
                                           ("paleturquoise", [175, 238, 238, 255]),
                                           ("palevioletred", [219, 112, 147, 255]),
                                           ("papayawhip", [255, 239, 213, 255]),
                                           ("peachpuff", [255, 218, 185, 255]),
                                           ("peru", [205, 133, 63, 255]),
                                           ("pink", [255, 192, 203, 255]),
                                           ("plum", [221, 160, 221, 255]),
                                           ("powderblue", [176, 224, 230, 255]),
                                           ("purple", [128, 0, 128, 255]),
                                           ("red", [255, 0, 0, 255]),
                                           ("rosybrown", [188, 143, 143, 255]),
                                           ("royalblue", [65, 105, 225, 255]),
                                           ("saddlebrown", [139, 69, 19, 255]),
                                           ("salmon", [250, 128, 114, 255]),
                                           ("sandybrown", [244, 164, 96, 255]),
                                           ("seagreen", [46, 139, 87, 255]),
                                           ("seashell", [255, 245, 238, 255]),
                                           ("sienna", [160, 82, 45, 255]),
                                           ("silver", [192, 192, 192, 255]),
                                           ("skyblue", [135, 206, 235, 255]),
                                           ("slateblue", [106, 90, 205, 255]),
                                           ("slategray", [112, 128, 144, 255]),
                                           ("slategrey", [112, 128, 144, 255]),
                                           ("snow", [255, 250, 250, 255]),
                                           ("springgreen", [0, 255, 127, 255]),
                                           ("steelblue", [70, 130, 180, 255]),
                                           ("tan", [210, 180, 140, 255]),
                                           ("teal", [0, 128, 128, 255]),
                                           ("thistle", [216, 191, 216, 255]),
                                           ("tomato", [255, 99, 71, 255]),
                                           ("transparent", [0, 0, 0, 0]),
                                           ("turquoise", [64, 224, 208, 255]),
                                           ("violet", [238, 130, 238, 255]),
                                           ("wheat", [245, 222, 179, 255]),
                                           ("white", [255, 255, 255, 255]),
                                           ("whitesmoke", [245, 245, 245, 255]),
                                           ("yellow", [255, 255, 0, 255]),
                                           ("yellowgreen", [154, 205, 50, 255])];

/// Solid colors printed by name because the name is shorter than `#rrggbb`.
static SHORT_NAMES: &[(u32, &str)] = &[(0xff_c0_c0_c0, "silver"),
                                       (0xff_80_80_80, "gray"),
                                       (0xff_00_00_80, "maroon"),
                                       (0xff_00_00_ff, "red"),
                                       (0xff_80_00_80, "purple"),
                                       (0xff_00_80_00, "green"),
                                       (0xff_00_ff_00, "lime"),
                                       (0xff_00_80_80, "olive"),
                                       (0xff_80_00_00, "navy"),
                                       (0xff_ff_00_00, "blue"),
                                       (0xff_80_80_00, "teal"),
                                       (0xff_ff_ff_00, "aqua")];

impl Default for Color {
    /// Opaque black.
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// Converts one component to a byte, clamping to `0..=255`.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn component_to_byte(c: f32) -> u8 {
    if c >= 1.0 {
        255
    } else if c <= 0.0 {
        0
    } else {
        (c * 255.0 + 0.5) as u8
    }
}

impl Color {
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self { red,
               green,
               blue,
               alpha }
    }

    /// Creates a color from byte components.
    #[must_use]
    pub fn from_bytes(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self::new(f32::from(red) / 255.0,
                  f32::from(green) / 255.0,
                  f32::from(blue) / 255.0,
                  f32::from(alpha) / 255.0)
    }

    /// Looks up a CSS color name such as `white` or `transparent`.
    ///
    /// Names are expected in lowercase, as written in an identifier.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::color::Color;
    ///
    /// assert_eq!(Color::from_name("white"), Some(Color::new(1.0, 1.0, 1.0, 1.0)));
    /// assert_eq!(Color::from_name("fff"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        COLOR_NAMES.binary_search_by(|(n, _)| (*n).cmp(name))
                   .ok()
                   .map(|idx| {
                       let [r, g, b, a] = COLOR_NAMES[idx].1;
                       Self::from_bytes(r, g, b, a)
                   })
    }

    /// Parses the content of a `#hash` token: a color name or 3 or 6
    /// hexadecimal digits.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::color::Color;
    ///
    /// assert_eq!(Color::from_hash("f00"), Color::from_name("red"));
    /// assert_eq!(Color::from_hash("00ff00"), Color::from_name("lime"));
    /// assert_eq!(Color::from_hash("ffff"), None);
    /// ```
    #[must_use]
    pub fn from_hash(name: &str) -> Option<Self> {
        if let Some(c) = Self::from_name(name) {
            return Some(c);
        }
        if !name.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&name[i..=i], 16).ok();
        match name.len() {
            3 => Some(Self::from_bytes(digit(0)? * 0x11, digit(1)? * 0x11, digit(2)? * 0x11, 255)),
            6 => Some(Self::from_bytes(digit(0)? * 16 + digit(1)?,
                                       digit(2)? * 16 + digit(3)?,
                                       digit(4)? * 16 + digit(5)?,
                                       255)),
            _ => None,
        }
    }

    /// Builds a color from hue (in radians), saturation, lightness and alpha.
    ///
    /// Negative hues produce black, matching what the conversion formula
    /// gives outside of its domain.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let chroma = (1.0 - 2.0f64.mul_add(lightness, -1.0).abs()) * saturation;
        let h1 = 6.0 * (hue % (PI * 2.0)) / (PI * 2.0);
        let x = chroma * (1.0 - ((h1 % 2.0) - 1.0).abs());

        let (r, g, b) = if (0.0..1.0).contains(&h1) {
            (chroma, x, 0.0)
        } else if (1.0..2.0).contains(&h1) {
            (x, chroma, 0.0)
        } else if (2.0..3.0).contains(&h1) {
            (0.0, chroma, x)
        } else if (3.0..4.0).contains(&h1) {
            (0.0, x, chroma)
        } else if (4.0..5.0).contains(&h1) {
            (x, 0.0, chroma)
        } else if (5.0..6.0).contains(&h1) {
            (chroma, 0.0, x)
        } else {
            (0.0, 0.0, 0.0)
        };

        let m = 0.5f64.mul_add(-chroma, lightness);
        Self::new((r + m) as f32, (g + m) as f32, (b + m) as f32, alpha as f32)
    }

    /// Returns `(hue, saturation, lightness, alpha)` with the hue in radians.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn to_hsl(&self) -> (f64, f64, f64, f64) {
        let (r, g, b) = (f64::from(self.red), f64::from(self.green), f64::from(self.blue));
        let maximum = r.max(g).max(b);
        let minimum = r.min(g).min(b);
        let chroma = maximum - minimum;

        let mut hue = if chroma == 0.0 {
            0.0
        } else if maximum == r {
            (g - b) / chroma
        } else if maximum == g {
            (b - r) / chroma + 2.0
        } else {
            (r - g) / chroma + 4.0
        };
        if hue < 0.0 {
            hue += 6.0;
        }
        hue = (hue % 6.0) / 6.0 * PI * 2.0;

        let lightness = (minimum + maximum) / 2.0;
        let saturation = if lightness == 0.0 || lightness == 1.0 {
            0.0
        } else {
            chroma / (1.0 - lightness.mul_add(2.0, -1.0).abs())
        };

        (hue, saturation, lightness, f64::from(self.alpha))
    }

    /// Packs the clamped byte components as `0xAABBGGRR`.
    ///
    /// Two colors are considered equal when their packed values are.
    #[must_use]
    pub fn to_rgba(&self) -> u32 {
        u32::from(component_to_byte(self.red))
        | (u32::from(component_to_byte(self.green)) << 8)
        | (u32::from(component_to_byte(self.blue)) << 16)
        | (u32::from(component_to_byte(self.alpha)) << 24)
    }

    /// The clamped byte components.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 4] {
        [component_to_byte(self.red),
         component_to_byte(self.green),
         component_to_byte(self.blue),
         component_to_byte(self.alpha)]
    }
}

impl fmt::Display for Color {
    /// Writes the shortest CSS representation of the color.
    ///
    /// # Example
    /// ```
    /// use csspp_expr::interpreter::node::color::Color;
    ///
    /// assert_eq!(Color::from_bytes(255, 0, 0, 255).to_string(), "red");
    /// assert_eq!(Color::from_bytes(0x11, 0x22, 0x33, 255).to_string(), "#123");
    /// assert_eq!(Color::from_bytes(0x56, 0xaf, 0x9b, 255).to_string(), "#56af9b");
    /// assert_eq!(Color::from_bytes(0, 0, 0, 0).to_string(), "transparent");
    /// assert_eq!(Color::new(1.0, 0.0, 0.0, 0.5).to_string(), "rgba(255,0,0,.5)");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [red, green, blue, alpha] = self.to_bytes();

        if alpha == 255 {
            let packed = self.to_rgba();
            if let Some((_, name)) = SHORT_NAMES.iter().find(|(c, _)| *c == packed) {
                return f.write_str(name);
            }

            let short = |c: u8| (c >> 4) == (c & 15);
            if short(red) && short(green) && short(blue) {
                return write!(f, "#{:x}{:x}{:x}", red & 15, green & 15, blue & 15);
            }
            return write!(f, "#{red:02x}{green:02x}{blue:02x}");
        }

        if alpha == 0 {
            return f.write_str("transparent");
        }

        write!(f,
               "rgba({red},{green},{blue},{})",
               decimal_number_to_string(f64::from(self.alpha), 2, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_names_are_sorted() {
        assert!(COLOR_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn hsl_round_trip() {
        let c = Color::from_bytes(0x56, 0xaf, 0x9b, 255);
        let (h, s, l, a) = c.to_hsl();
        let back = Color::from_hsl(h, s, l, a);
        assert_eq!(back.to_rgba(), c.to_rgba());
    }

    #[test]
    fn complement_rotates_hue() {
        let c = Color::from_bytes(0x56, 0xaf, 0x9b, 255);
        let (h, s, l, a) = c.to_hsl();
        let complement = Color::from_hsl(h + PI, s, l, a);
        assert_eq!(complement.to_bytes(), [175, 86, 106, 255]);
    }

    #[test]
    fn out_of_range_components_are_clamped() {
        let c = Color::new(2.0, -1.0, 0.5, 1.0);
        assert_eq!(c.to_bytes(), [255, 0, 128, 255]);
    }
}
