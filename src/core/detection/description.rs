//! Human readable summaries of detection results

use super::result::{ColorResult, DetectionResult};
use crate::core::color::{ColorName, Language};

/// Secondary colors listed after the primary one
const SECONDARY_COLORS: usize = 2;

/// One decimal place, with a decimal comma for Indonesian
pub fn format_percent(value: f64, language: Language) -> String {
    let text = format!("{:.1}", value);
    match language {
        Language::Indonesian => text.replace('.', ","),
        Language::English => text,
    }
}

struct Phrases {
    color: &'static str,
    primary: &'static str,
    dominance: &'static str,
    confidence: &'static str,
    others: &'static str,
}

fn phrases(language: Language) -> Phrases {
    match language {
        Language::Indonesian => Phrases {
            color: "Warna",
            primary: "Warna utama",
            dominance: "Dominasi",
            confidence: "Keyakinan",
            others: "Warna dominan lainnya:",
        },
        Language::English => Phrases {
            color: "Color",
            primary: "Primary color",
            dominance: "Dominance",
            confidence: "Confidence",
            others: "Other dominant colors:",
        },
    }
}

fn push_hint(text: &mut String, hint: Option<&str>) {
    if let Some(hint) = hint {
        text.push_str(&format!("\n💡 {}", hint));
    }
}

/// Short text attached to each dominant color
pub fn describe_cluster(
    name: ColorName,
    percentage: f64,
    confidence: f64,
    language: Language,
) -> String {
    let p = phrases(language);
    let mut text = format!("🎨 {}: {}", p.color, name.label(language));
    text.push_str(&format!("\n📊 {}: {}%", p.dominance, format_percent(percentage, language)));
    text.push_str(&format!(
        "\n🎯 {}: {}%",
        p.confidence,
        format_percent(confidence * 100.0, language)
    ));
    push_hint(&mut text, name.comparison(language));
    text
}

/// Same as [`describe_cluster`] for an existing result
pub fn describe_color(result: &ColorResult, language: Language) -> String {
    describe_cluster(result.name, result.percentage, result.confidence, language)
}

/// Accessibility summary: primary color, confidence, up to two secondary
/// colors and an everyday comparison for the primary color
pub fn describe_for_accessibility(result: &DetectionResult, language: Language) -> String {
    let p = phrases(language);
    let mut text = format!("🎨 {}: {}", p.primary, result.primary.label(language));
    text.push_str(&format!(
        "\n📊 {}: {}%",
        p.confidence,
        format_percent(result.confidence * 100.0, language)
    ));

    if result.dominant_colors.len() > 1 {
        text.push('\n');
        text.push_str(p.others);
        for color in result.dominant_colors.iter().skip(1).take(SECONDARY_COLORS) {
            text.push_str(&format!(
                "\n- {} ({}%)",
                color.name.label(language),
                format_percent(color.percentage, language)
            ));
        }
    }

    push_hint(&mut text, result.primary.hint(language));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::Pixel;
    use crate::core::detection::result::{DetectionSource, DominantColor};

    fn dominant(name: ColorName, percentage: f64) -> DominantColor {
        DominantColor {
            name,
            rgb: Pixel::BLACK,
            percentage,
        }
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.345, Language::Indonesian), "12,3");
        assert_eq!(format_percent(12.345, Language::English), "12.3");
        assert_eq!(format_percent(100.0, Language::Indonesian), "100,0");
    }

    #[test]
    fn test_cluster_description() {
        let text = describe_cluster(ColorName::Red, 45.26, 0.88, Language::Indonesian);
        assert_eq!(
            text,
            "🎨 Warna: Merah\n📊 Dominasi: 45,3%\n🎯 Keyakinan: 88,0%\n💡 Seperti warna darah atau tomat matang"
        );
    }

    #[test]
    fn test_cluster_description_without_comparison() {
        let text = describe_cluster(ColorName::DarkGreen, 30.0, 0.7, Language::English);
        assert_eq!(text, "🎨 Color: deep green\n📊 Dominance: 30.0%\n🎯 Confidence: 70.0%");
    }

    #[test]
    fn test_accessibility_lists_two_secondary_colors() {
        let result = DetectionResult {
            primary: ColorName::Blue,
            confidence: 0.875,
            dominant_colors: vec![
                dominant(ColorName::Blue, 60.0),
                dominant(ColorName::White, 25.0),
                dominant(ColorName::Gray, 10.0),
                dominant(ColorName::Black, 5.0),
            ],
            rgb: (0, 0, 255),
            source: DetectionSource::Clusters,
        };

        let text = describe_for_accessibility(&result, Language::English);
        assert!(text.starts_with("🎨 Primary color: blue\n📊 Confidence: 87.5%"));
        assert!(text.contains("Other dominant colors:\n- white (25.0%)\n- gray (10.0%)"));
        assert!(!text.contains("black"));
        assert!(text.ends_with("💡 Like a clear cloudless sky"));
    }

    #[test]
    fn test_accessibility_for_unknown() {
        let text = describe_for_accessibility(&DetectionResult::unknown(), Language::Indonesian);
        assert_eq!(text, "🎨 Warna utama: Tidak Diketahui\n📊 Keyakinan: 0,0%");
    }
}
