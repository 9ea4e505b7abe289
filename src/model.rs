use std::fmt;

use clap::ValueEnum;
use itertools::Itertools; // for join() iterator function
use palette::encoding;
use palette::white_point::D65;
use palette::{FromColor, Hsl, Hsv, Hwb, Lab, Lch, Srgb, Xyz};

/// An 8-bit sRGB triple
pub type Rgb = [u8; 3];

/// Color model used for conversion and distance computation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum ColorModel {
    Cmyk,
    Hsl,
    Hsv,
    Hwb,
    #[default]
    Lab,
    Lch,
    Rgb,
    Xyz,
}

impl ColorModel {
    /// All models, in display order
    pub const ALL: [ColorModel; 8] = [
        ColorModel::Cmyk,
        ColorModel::Hsl,
        ColorModel::Hsv,
        ColorModel::Hwb,
        ColorModel::Lab,
        ColorModel::Lch,
        ColorModel::Rgb,
        ColorModel::Xyz,
    ];

    /// Position of the model in [`ColorModel::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of coordinates produced by this model
    pub fn arity(self) -> usize {
        match self {
            ColorModel::Cmyk => 4,
            _ => 3,
        }
    }

    /// Upper case name, as shown in headers and stored in preferences
    pub fn name(self) -> &'static str {
        match self {
            ColorModel::Cmyk => "CMYK",
            ColorModel::Hsl => "HSL",
            ColorModel::Hsv => "HSV",
            ColorModel::Hwb => "HWB",
            ColorModel::Lab => "LAB",
            ColorModel::Lch => "LCH",
            ColorModel::Rgb => "RGB",
            ColorModel::Xyz => "XYZ",
        }
    }

    /// Parse a model name, ignoring case
    pub fn from_name(name: &str) -> Option<ColorModel> {
        <ColorModel as ValueEnum>::from_str(name.trim(), true).ok()
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A point in one color model, with three or four channels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    values: [f64; 4],
    arity: usize,
}

impl Coordinates {
    fn three(values: [f64; 3]) -> Self {
        Self {
            values: [values[0], values[1], values[2], 0.0],
            arity: 3,
        }
    }

    fn four(values: [f64; 4]) -> Self {
        Self { values, arity: 4 }
    }

    /// The channel values
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.arity]
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Round every channel half up, so that 2.5 becomes 3 and -2.5 becomes -2
    pub fn rounded(self) -> Self {
        let mut values = self.values;
        for v in values.iter_mut().take(self.arity) {
            *v = round_half_up(*v);
        }
        Self { values, ..self }
    }

    /// Rounded channels, zero-padded to three digits and separated by commas
    pub fn display(&self) -> String {
        self.as_slice()
            .iter()
            .map(|v| format!("{:03}", round_half_up(*v) as i64))
            .join(",")
    }
}

pub(crate) fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Convert an sRGB triple into the coordinates of the specified model
///
/// Scales: hues in degrees, saturation/lightness/value/whiteness/blackness and
/// CMYK in percent, XYZ multiplied by 100, LAB/LCH lightness in 0-100.
pub fn convert(model: ColorModel, rgb: Rgb) -> Coordinates {
    let srgb = Srgb::new(rgb[0], rgb[1], rgb[2]).into_format::<f64>();
    match model {
        ColorModel::Cmyk => to_cmyk(srgb),
        ColorModel::Hsl => to_hsl(srgb),
        ColorModel::Hsv => to_hsv(srgb),
        ColorModel::Hwb => to_hwb(srgb),
        ColorModel::Lab => to_lab(srgb),
        ColorModel::Lch => to_lch(srgb),
        ColorModel::Rgb => Coordinates::three(rgb.map(f64::from)),
        ColorModel::Xyz => to_xyz(srgb),
    }
}

/// Convert into every model at once, indexed by [`ColorModel::index`]
pub fn convert_all(rgb: Rgb) -> [Coordinates; 8] {
    ColorModel::ALL.map(|model| convert(model, rgb))
}

fn to_cmyk(rgb: Srgb<f64>) -> Coordinates {
    let k = 1.0 - rgb.red.max(rgb.green).max(rgb.blue);
    // Pure black has no defined chromatic ink
    if k >= 1.0 {
        return Coordinates::four([0.0, 0.0, 0.0, 100.0]);
    }
    let ink = |channel: f64| (1.0 - channel - k) / (1.0 - k) * 100.0;
    Coordinates::four([ink(rgb.red), ink(rgb.green), ink(rgb.blue), k * 100.0])
}

fn to_hsl(rgb: Srgb<f64>) -> Coordinates {
    let hsl: Hsl<encoding::Srgb, f64> = Hsl::from_color(rgb);
    Coordinates::three([
        hsl.hue.into_positive_degrees(),
        hsl.saturation * 100.0,
        hsl.lightness * 100.0,
    ])
}

fn to_hsv(rgb: Srgb<f64>) -> Coordinates {
    let hsv: Hsv<encoding::Srgb, f64> = Hsv::from_color(rgb);
    Coordinates::three([
        hsv.hue.into_positive_degrees(),
        hsv.saturation * 100.0,
        hsv.value * 100.0,
    ])
}

fn to_hwb(rgb: Srgb<f64>) -> Coordinates {
    let hwb: Hwb<encoding::Srgb, f64> = Hwb::from_color(rgb);
    Coordinates::three([
        hwb.hue.into_positive_degrees(),
        hwb.whiteness * 100.0,
        hwb.blackness * 100.0,
    ])
}

fn to_lab(rgb: Srgb<f64>) -> Coordinates {
    let lab: Lab<D65, f64> = Lab::from_color(rgb);
    Coordinates::three([lab.l, lab.a, lab.b])
}

fn to_lch(rgb: Srgb<f64>) -> Coordinates {
    let lch: Lch<D65, f64> = Lch::from_color(rgb);
    Coordinates::three([lch.l, lch.chroma, lch.hue.into_positive_degrees()])
}

fn to_xyz(rgb: Srgb<f64>) -> Coordinates {
    let xyz: Xyz<D65, f64> = Xyz::from_color(rgb);
    Coordinates::three([xyz.x * 100.0, xyz.y * 100.0, xyz.z * 100.0])
}
