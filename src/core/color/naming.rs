//! Rule-based color naming
//!
//! Maps an HSV triple onto a closed palette through a fixed tier order:
//! black, grayscale, dark chromatic, pale chromatic, then the full hue wheel.
//! Each tier short-circuits the next. The cluster path and the single-pixel
//! path both go through [`ColorNamer::name`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::conversion::{Hsv, Pixel};

/// Output language for labels and descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "en")]
    English,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" | "indonesian" | "bahasa" => Ok(Language::Indonesian),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// Closed palette of color names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorName {
    Black,
    DarkGray,
    Gray,
    LightGray,
    White,
    DarkRed,
    Brown,
    DarkGreen,
    DarkBlue,
    DarkPurple,
    PalePink,
    Cream,
    PaleGreen,
    PaleBlue,
    PalePurple,
    Red,
    Orange,
    Yellow,
    YellowGreen,
    Green,
    TealGreen,
    Cyan,
    Blue,
    Purple,
    Magenta,
    Pink,
    /// Only produced by a learned model's label table
    LightBrown,
    /// Sentinel for detections that could not be attempted
    Unknown,
}

impl ColorName {
    pub const ALL: [ColorName; 28] = [
        ColorName::Black,
        ColorName::DarkGray,
        ColorName::Gray,
        ColorName::LightGray,
        ColorName::White,
        ColorName::DarkRed,
        ColorName::Brown,
        ColorName::DarkGreen,
        ColorName::DarkBlue,
        ColorName::DarkPurple,
        ColorName::PalePink,
        ColorName::Cream,
        ColorName::PaleGreen,
        ColorName::PaleBlue,
        ColorName::PalePurple,
        ColorName::Red,
        ColorName::Orange,
        ColorName::Yellow,
        ColorName::YellowGreen,
        ColorName::Green,
        ColorName::TealGreen,
        ColorName::Cyan,
        ColorName::Blue,
        ColorName::Purple,
        ColorName::Magenta,
        ColorName::Pink,
        ColorName::LightBrown,
        ColorName::Unknown,
    ];

    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::Indonesian => self.indonesian(),
            Language::English => self.english(),
        }
    }

    pub fn indonesian(&self) -> &'static str {
        match self {
            ColorName::Black => "Hitam",
            ColorName::DarkGray => "Abu-abu Gelap",
            ColorName::Gray => "Abu-abu",
            ColorName::LightGray => "Abu-abu Terang",
            ColorName::White => "Putih",
            ColorName::DarkRed => "Merah Tua",
            ColorName::Brown => "Cokelat",
            ColorName::DarkGreen => "Hijau Gelap",
            ColorName::DarkBlue => "Biru Tua",
            ColorName::DarkPurple => "Ungu Tua",
            ColorName::PalePink => "Merah Muda Pucat",
            ColorName::Cream => "Krem",
            ColorName::PaleGreen => "Hijau Pucat",
            ColorName::PaleBlue => "Biru Pucat",
            ColorName::PalePurple => "Ungu Pucat",
            ColorName::Red => "Merah",
            ColorName::Orange => "Jingga",
            ColorName::Yellow => "Kuning",
            ColorName::YellowGreen => "Kuning Hijau",
            ColorName::Green => "Hijau",
            ColorName::TealGreen => "Hijau Biru",
            ColorName::Cyan => "Cyan",
            ColorName::Blue => "Biru",
            ColorName::Purple => "Ungu",
            ColorName::Magenta => "Magenta",
            ColorName::Pink => "Merah Muda",
            ColorName::LightBrown => "Cokelat Muda",
            ColorName::Unknown => "Tidak Diketahui",
        }
    }

    pub fn english(&self) -> &'static str {
        match self {
            ColorName::Black => "black",
            ColorName::DarkGray => "dark gray",
            ColorName::Gray => "gray",
            ColorName::LightGray => "light gray",
            ColorName::White => "white",
            ColorName::DarkRed => "deep red",
            ColorName::Brown => "brown",
            ColorName::DarkGreen => "deep green",
            ColorName::DarkBlue => "deep blue",
            ColorName::DarkPurple => "deep purple",
            ColorName::PalePink => "pale pink",
            ColorName::Cream => "cream",
            ColorName::PaleGreen => "pale green",
            ColorName::PaleBlue => "pale blue",
            ColorName::PalePurple => "pale purple",
            ColorName::Red => "red",
            ColorName::Orange => "orange",
            ColorName::Yellow => "yellow",
            ColorName::YellowGreen => "yellow-green",
            ColorName::Green => "green",
            ColorName::TealGreen => "teal green",
            ColorName::Cyan => "cyan",
            ColorName::Blue => "blue",
            ColorName::Purple => "purple",
            ColorName::Magenta => "magenta",
            ColorName::Pink => "pink",
            ColorName::LightBrown => "light brown",
            ColorName::Unknown => "unknown color",
        }
    }

    /// Everyday comparison for the color, used in spoken/readable descriptions
    pub fn hint(&self, language: Language) -> Option<&'static str> {
        let (id, en) = match self {
            ColorName::Red => ("Warna seperti buah tomat matang", "Like a ripe tomato"),
            ColorName::Green => ("Warna seperti rumput", "Like fresh grass"),
            ColorName::Blue => ("Warna seperti langit cerah tanpa awan", "Like a clear cloudless sky"),
            ColorName::Yellow => ("Warna seperti kulit pisang matang", "Like a ripe banana peel"),
            ColorName::Purple => ("Warna seperti kulit buah terong", "Like an eggplant skin"),
            ColorName::Orange => ("Warna seperti buah jeruk mandarin matang", "Like a ripe mandarin orange"),
            ColorName::Pink => ("Warna seperti bunga mawar muda", "Like a young rose"),
            ColorName::Brown => ("Warna seperti tanah liat yang lembab", "Like damp clay"),
            ColorName::Black => ("Warna seperti bulu burung gagak", "Like a crow's feathers"),
            ColorName::White => ("Warna seperti salju", "Like snow"),
            ColorName::Gray => ("Warna seperti batu kali yang kering", "Like a dry river stone"),
            ColorName::DarkGray => ("Warna seperti batu basalt", "Like basalt rock"),
            ColorName::LightGray => ("Warna seperti batu kerikil halus berpasir", "Like fine sandy gravel"),
            ColorName::Cream => ("Warna seperti pasir pantai yang halus", "Like fine beach sand"),
            ColorName::Cyan => ("Warna seperti air laut jernih di pantai tropis", "Like clear water on a tropical beach"),
            ColorName::Magenta => ("Warna seperti buah delima matang", "Like a ripe pomegranate"),
            ColorName::DarkGreen => ("Warna seperti daun pinus atau lumut tua", "Like pine needles or old moss"),
            ColorName::DarkBlue => ("Warna seperti air danau yang dalam", "Like a deep lake"),
            ColorName::YellowGreen => ("Warna seperti daun muda yang mulai tumbuh", "Like a freshly sprouted leaf"),
            ColorName::LightBrown => ("Warna seperti batang pohon cemara muda", "Like a young fir trunk"),
            ColorName::DarkRed => ("Warna seperti buah ceri ranum", "Like a ripe cherry"),
            ColorName::PaleGreen => ("Warna seperti daging melon yang matang muda", "Like honeydew melon flesh"),
            ColorName::PaleBlue => ("Warna seperti sayap kupu-kupu biru muda", "Like a light blue butterfly wing"),
            ColorName::PalePurple => ("Warna seperti kelopak bunga violet yang sangat muda", "Like a young violet petal"),
            ColorName::PalePink => ("Warna seperti kelopak bunga sakura muda", "Like a young cherry blossom petal"),
            ColorName::TealGreen => ("Warna seperti permukaan laut di perairan dangkal", "Like shallow sea water"),
            ColorName::DarkPurple => ("Warna seperti buah anggur sangat matang", "Like very ripe grapes"),
            ColorName::Unknown => return None,
        };
        Some(match language {
            Language::Indonesian => id,
            Language::English => en,
        })
    }

    /// Short comparison attached to per-cluster descriptions
    ///
    /// Only the common base colors have one; the rest get no comparison.
    pub fn comparison(&self, language: Language) -> Option<&'static str> {
        let (id, en) = match self {
            ColorName::Red => ("Seperti warna darah atau tomat matang", "Like blood or a ripe tomato"),
            ColorName::Green => ("Seperti warna daun atau rumput", "Like leaves or grass"),
            ColorName::Blue => ("Seperti warna langit atau laut", "Like the sky or the sea"),
            ColorName::Yellow => ("Seperti warna matahari atau pisang", "Like the sun or a banana"),
            ColorName::Orange => ("Seperti warna jeruk atau sunset", "Like an orange or a sunset"),
            ColorName::Purple => ("Seperti warna lavender atau anggur", "Like lavender or grapes"),
            ColorName::Black => ("Warna gelap seperti malam", "Dark like the night"),
            ColorName::White => ("Warna terang seperti salju", "Bright like snow"),
            ColorName::Brown => ("Seperti warna kayu atau tanah", "Like wood or soil"),
            ColorName::Gray => ("Warna netral antara hitam dan putih", "Neutral between black and white"),
            ColorName::Cyan => ("Seperti warna air laut tropis", "Like tropical sea water"),
            ColorName::Magenta => ("Seperti warna bunga fuchsia", "Like a fuchsia flower"),
            ColorName::Cream => ("Seperti warna krim atau vanilla", "Like cream or vanilla"),
            ColorName::YellowGreen => ("Seperti warna daun muda", "Like a young leaf"),
            ColorName::Pink => ("Seperti warna bunga sakura", "Like a cherry blossom"),
            _ => return None,
        };
        Some(match language {
            Language::Indonesian => id,
            Language::English => en,
        })
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.indonesian())
    }
}

impl FromStr for ColorName {
    type Err = String;

    /// Accepts either the Indonesian or the English label, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        if needle == "oranye" {
            return Ok(ColorName::Orange);
        }
        ColorName::ALL
            .iter()
            .copied()
            .find(|name| {
                name.indonesian().to_lowercase() == needle || name.english() == needle
            })
            .ok_or_else(|| format!("unknown color label: {}", s))
    }
}

/// Tier thresholds for the naming decision tree, in HSV percent units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingThresholds {
    /// Below this value everything is black
    pub black_value: f64,
    /// Below this saturation the color is treated as grayscale
    pub gray_saturation: f64,
    /// Value cut points between dark gray / gray / light gray / white
    pub gray_levels: [f64; 3],
    /// Below this value a chromatic color gets its "deep" variant
    pub dark_value: f64,
    /// Below this saturation a bright color gets its "pale" variant
    pub pale_saturation: f64,
}

impl Default for NamingThresholds {
    fn default() -> Self {
        Self {
            black_value: 20.0,
            gray_saturation: 18.0,
            gray_levels: [50.0, 75.0, 90.0],
            dark_value: 50.0,
            pale_saturation: 35.0,
        }
    }
}

/// Closed hue interval `[start, end]` in degrees
type HueBand = (f64, f64, ColorName);

const DARK_BANDS: &[HueBand] = &[
    (0.0, 20.0, ColorName::DarkRed),
    (340.0, 360.0, ColorName::DarkRed),
    (21.0, 45.0, ColorName::Brown),
    (46.0, 150.0, ColorName::DarkGreen),
    (151.0, 260.0, ColorName::DarkBlue),
    (261.0, 339.0, ColorName::DarkPurple),
];

const PALE_BANDS: &[HueBand] = &[
    (0.0, 25.0, ColorName::PalePink),
    (335.0, 360.0, ColorName::PalePink),
    (26.0, 55.0, ColorName::Cream),
    (56.0, 160.0, ColorName::PaleGreen),
    (161.0, 270.0, ColorName::PaleBlue),
];

const STANDARD_BANDS: &[HueBand] = &[
    (0.0, 15.0, ColorName::Red),
    (345.0, 360.0, ColorName::Red),
    (16.0, 40.0, ColorName::Orange),
    (41.0, 65.0, ColorName::Yellow),
    (66.0, 85.0, ColorName::YellowGreen),
    (86.0, 160.0, ColorName::Green),
    (161.0, 190.0, ColorName::TealGreen),
    (191.0, 220.0, ColorName::Cyan),
    (221.0, 260.0, ColorName::Blue),
    (261.0, 300.0, ColorName::Purple),
    (301.0, 330.0, ColorName::Magenta),
];

fn match_band(hue: f64, bands: &[HueBand], fallback: ColorName) -> ColorName {
    bands
        .iter()
        .find(|(start, end, _)| hue >= *start && hue <= *end)
        .map(|(_, _, name)| *name)
        .unwrap_or(fallback)
}

/// Name an HSV triple using the given thresholds
pub fn name_color(hsv: Hsv, thresholds: &NamingThresholds) -> ColorName {
    let Hsv { h, s, v } = hsv;

    if v < thresholds.black_value {
        return ColorName::Black;
    }

    if s < thresholds.gray_saturation {
        let [dark, mid, light] = thresholds.gray_levels;
        return if v < dark {
            ColorName::DarkGray
        } else if v < mid {
            ColorName::Gray
        } else if v < light {
            ColorName::LightGray
        } else {
            ColorName::White
        };
    }

    if v < thresholds.dark_value {
        return match_band(h, DARK_BANDS, ColorName::Brown);
    }

    if s < thresholds.pale_saturation {
        return match_band(h, PALE_BANDS, ColorName::PalePurple);
    }

    match_band(h, STANDARD_BANDS, ColorName::Pink)
}

/// Rule-based namer carrying its thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorNamer {
    thresholds: NamingThresholds,
}

impl ColorNamer {
    pub fn new(thresholds: NamingThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &NamingThresholds {
        &self.thresholds
    }

    pub fn name(&self, hsv: Hsv) -> ColorName {
        name_color(hsv, &self.thresholds)
    }

    pub fn name_pixel(&self, pixel: Pixel) -> ColorName {
        self.name(pixel.to_hsv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_rgb(r: u8, g: u8, b: u8) -> ColorName {
        ColorNamer::default().name_pixel(Pixel::from_u8(r, g, b))
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(name_rgb(255, 0, 0), ColorName::Red);
        assert_eq!(name_rgb(10, 10, 10), ColorName::Black);
        assert_eq!(name_rgb(200, 200, 200), ColorName::LightGray);
    }

    #[test]
    fn test_black_ignores_hue_and_saturation() {
        // fully saturated but very dark blue
        assert_eq!(name_rgb(0, 0, 45), ColorName::Black);
    }

    #[test]
    fn test_gray_ladder() {
        let namer = ColorNamer::default();
        assert_eq!(namer.name(Hsv::new(0.0, 5.0, 30.0)), ColorName::DarkGray);
        assert_eq!(namer.name(Hsv::new(0.0, 5.0, 60.0)), ColorName::Gray);
        assert_eq!(namer.name(Hsv::new(0.0, 5.0, 80.0)), ColorName::LightGray);
        assert_eq!(namer.name(Hsv::new(0.0, 5.0, 95.0)), ColorName::White);
    }

    #[test]
    fn test_dark_tier() {
        let namer = ColorNamer::default();
        assert_eq!(namer.name(Hsv::new(10.0, 80.0, 40.0)), ColorName::DarkRed);
        assert_eq!(namer.name(Hsv::new(350.0, 80.0, 40.0)), ColorName::DarkRed);
        assert_eq!(namer.name(Hsv::new(30.0, 80.0, 40.0)), ColorName::Brown);
        assert_eq!(namer.name(Hsv::new(100.0, 80.0, 40.0)), ColorName::DarkGreen);
        assert_eq!(namer.name(Hsv::new(200.0, 80.0, 40.0)), ColorName::DarkBlue);
        assert_eq!(namer.name(Hsv::new(300.0, 80.0, 40.0)), ColorName::DarkPurple);
        // gap between closed bands falls to the catch-all
        assert_eq!(namer.name(Hsv::new(20.5, 80.0, 40.0)), ColorName::Brown);
    }

    #[test]
    fn test_pale_tier() {
        let namer = ColorNamer::default();
        assert_eq!(namer.name(Hsv::new(5.0, 25.0, 90.0)), ColorName::PalePink);
        assert_eq!(namer.name(Hsv::new(40.0, 25.0, 90.0)), ColorName::Cream);
        assert_eq!(namer.name(Hsv::new(120.0, 25.0, 90.0)), ColorName::PaleGreen);
        assert_eq!(namer.name(Hsv::new(200.0, 25.0, 90.0)), ColorName::PaleBlue);
        assert_eq!(namer.name(Hsv::new(300.0, 25.0, 90.0)), ColorName::PalePurple);
    }

    #[test]
    fn test_standard_wheel() {
        let namer = ColorNamer::default();
        let cases = [
            (0.0, ColorName::Red),
            (30.0, ColorName::Orange),
            (60.0, ColorName::Yellow),
            (75.0, ColorName::YellowGreen),
            (120.0, ColorName::Green),
            (175.0, ColorName::TealGreen),
            (200.0, ColorName::Cyan),
            (240.0, ColorName::Blue),
            (280.0, ColorName::Purple),
            (315.0, ColorName::Magenta),
            (335.0, ColorName::Pink),
            (350.0, ColorName::Red),
        ];
        for (hue, expected) in cases {
            assert_eq!(namer.name(Hsv::new(hue, 90.0, 90.0)), expected, "hue {}", hue);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = NamingThresholds {
            black_value: 50.0,
            ..NamingThresholds::default()
        };
        let namer = ColorNamer::new(thresholds);
        assert_eq!(namer.name(Hsv::new(0.0, 100.0, 45.0)), ColorName::Black);
        assert_eq!(ColorNamer::default().name(Hsv::new(0.0, 100.0, 45.0)), ColorName::DarkRed);
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("Merah".parse::<ColorName>(), Ok(ColorName::Red));
        assert_eq!("abu-abu terang".parse::<ColorName>(), Ok(ColorName::LightGray));
        assert_eq!("light gray".parse::<ColorName>(), Ok(ColorName::LightGray));
        assert_eq!("Oranye".parse::<ColorName>(), Ok(ColorName::Orange));
        assert_eq!("Cokelat Muda".parse::<ColorName>(), Ok(ColorName::LightBrown));
        assert!("Chartreuse".parse::<ColorName>().is_err());
    }

    #[test]
    fn test_every_named_color_has_hint_except_unknown() {
        for name in ColorName::ALL {
            assert_eq!(name.hint(Language::English).is_some(), name != ColorName::Unknown);
        }
    }

    #[test]
    fn test_comparison_only_for_base_colors() {
        assert_eq!(ColorName::Red.comparison(Language::Indonesian), Some("Seperti warna darah atau tomat matang"));
        assert_eq!(ColorName::Pink.comparison(Language::English), Some("Like a cherry blossom"));
        assert_eq!(ColorName::DarkRed.comparison(Language::Indonesian), None);
        assert_eq!(ColorName::Unknown.comparison(Language::English), None);
        let count = ColorName::ALL.iter().filter(|n| n.comparison(Language::English).is_some()).count();
        assert_eq!(count, 15);
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("EN".parse::<Language>(), Ok(Language::English));
        assert_eq!("id".parse::<Language>(), Ok(Language::Indonesian));
        assert!("fr".parse::<Language>().is_err());
    }
}
