//! Heuristic Analyzer - color statistics, no model required
//!
//! Always available. Used alone when the model is not loaded and as the
//! source of default disease/solution text when it is.

use image::RgbImage;

use super::types::{AnalysisResult, AnalysisSource, Metrics};

/// Brightness below this is reported as underexposed.
pub const UNDEREXPOSED_BRIGHTNESS: f64 = 0.20;
/// Chlorophyll score above this is reported as healthy.
pub const HEALTHY_CHLOROPHYLL: f64 = 0.05;
/// Dryness score above this suggests scorch.
pub const SCORCH_DRYNESS: f64 = 0.08;
/// Mean green below this suggests nutrient deficiency.
pub const DEFICIENT_GREEN: f64 = 0.30;

const METRIC_DECIMALS: u32 = 3;

/// Channel means of an image normalised to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStats {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub brightness: f64,
}

impl ColorStats {
    /// `None` for a zero-pixel image.
    pub fn from_image(img: &RgbImage) -> Option<Self> {
        let pixels = img.width() as u64 * img.height() as u64;
        if pixels == 0 {
            return None;
        }

        let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
        for px in img.pixels() {
            r += px[0] as u64;
            g += px[1] as u64;
            b += px[2] as u64;
        }

        let scale = 255.0 * pixels as f64;
        let red = r as f64 / scale;
        let green = g as f64 / scale;
        let blue = b as f64 / scale;

        Some(Self {
            red,
            green,
            blue,
            brightness: (red + green + blue) / 3.0,
        })
    }

    pub fn chlorophyll_score(&self) -> f64 {
        self.green - 0.5 * (self.red + self.blue)
    }

    pub fn dryness_score(&self) -> f64 {
        self.red - self.green
    }
}

/// Result for an image with no pixels.
pub fn empty_result() -> AnalysisResult {
    AnalysisResult {
        leaf_name: "Unknown Leaf".to_string(),
        leaf_label: None,
        disease: "No image data".to_string(),
        solution: "Re-capture the image.".to_string(),
        metrics: Metrics::new(),
    }
}

/// Classify a decoded image from its color statistics.
pub fn analyze(img: &RgbImage) -> AnalysisResult {
    let Some(stats) = ColorStats::from_image(img) else {
        return empty_result();
    };
    classify(&stats)
}

/// Apply the threshold rules; first match wins in each group.
pub fn classify(stats: &ColorStats) -> AnalysisResult {
    let chlorophyll = stats.chlorophyll_score();
    let dryness = stats.dryness_score();

    let leaf_name = if stats.brightness < UNDEREXPOSED_BRIGHTNESS {
        "Underexposed Leaf"
    } else if chlorophyll > HEALTHY_CHLOROPHYLL {
        "Healthy Leaf"
    } else {
        "Stressed Leaf"
    };

    let (disease, solution) = if dryness > SCORCH_DRYNESS {
        ("Possible Leaf Scorch", "Increase watering and check for pests.")
    } else if stats.green < DEFICIENT_GREEN {
        ("Nutrient Deficiency Suspected", "Apply balanced fertilizer and monitor.")
    } else {
        ("No obvious disease", "Continue regular care.")
    };

    let mut metrics = Metrics::new();
    metrics.insert_float("brightness", stats.brightness, METRIC_DECIMALS);
    metrics.insert_float("mean_red", stats.red, METRIC_DECIMALS);
    metrics.insert_float("mean_green", stats.green, METRIC_DECIMALS);
    metrics.insert_float("mean_blue", stats.blue, METRIC_DECIMALS);
    metrics.insert_float("chlorophyll_score", chlorophyll, METRIC_DECIMALS);
    metrics.insert_float("dryness_score", dryness, METRIC_DECIMALS);
    metrics.set_source(AnalysisSource::Heuristic);

    AnalysisResult {
        leaf_name: leaf_name.to_string(),
        leaf_label: None,
        disease: disease.to_string(),
        solution: solution.to_string(),
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn uniform(r: u8, g: u8, b: u8) -> RgbImage {
        RgbImage::from_pixel(8, 6, Rgb([r, g, b]))
    }

    fn metric(result: &AnalysisResult, key: &str) -> f64 {
        result.metrics.get(key).and_then(|v| v.as_f64()).unwrap()
    }

    #[test]
    fn test_green_leaf_is_healthy() {
        let result = analyze(&uniform(50, 200, 50));
        assert_eq!(result.leaf_name, "Healthy Leaf");
        assert_eq!(result.disease, "No obvious disease");
        assert_eq!(result.solution, "Continue regular care.");
        assert_eq!(metric(&result, "brightness"), 0.392);
        assert_eq!(metric(&result, "chlorophyll_score"), 0.588);
        assert_eq!(metric(&result, "dryness_score"), -0.588);
        assert_eq!(result.source(), Some("heuristic"));
        assert_eq!(result.metrics.len(), 7);
    }

    #[test]
    fn test_zero_pixel_image() {
        let result = analyze(&RgbImage::new(0, 0));
        assert_eq!(result, empty_result());
        assert_eq!(result.leaf_name, "Unknown Leaf");
        assert_eq!(result.disease, "No image data");
        assert_eq!(result.solution, "Re-capture the image.");
        assert!(result.metrics.is_empty());
    }

    #[test]
    fn test_dark_image_is_underexposed() {
        let result = analyze(&uniform(10, 30, 10));
        assert_eq!(result.leaf_name, "Underexposed Leaf");
        // mean green ~0.118
        assert_eq!(result.disease, "Nutrient Deficiency Suspected");
    }

    #[test]
    fn test_red_leaf_suggests_scorch() {
        let result = analyze(&uniform(200, 120, 60));
        assert_eq!(result.leaf_name, "Stressed Leaf");
        assert_eq!(result.disease, "Possible Leaf Scorch");
        assert_eq!(result.solution, "Increase watering and check for pests.");
    }

    #[test]
    fn test_channel_means_over_mixed_pixels() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));

        let stats = ColorStats::from_image(&img).unwrap();
        assert!((stats.red - 0.5).abs() < 1e-9);
        assert!((stats.green - 0.5).abs() < 1e-9);
        assert_eq!(stats.blue, 0.0);
        assert!((stats.brightness - 1.0 / 3.0).abs() < 1e-9);
    }
}
