//! Degree → size and color encoding

use super::color::Rgb;

/// Node color for the least connected object
pub const DEFAULT_MIN_COLOR: Rgb = Rgb::new(0xFF, 0x69, 0xB4);
/// Node color for the most connected object
pub const DEFAULT_MAX_COLOR: Rgb = Rgb::new(0x1E, 0x90, 0xFF);
pub const DEFAULT_AVG_SIZE: f64 = 30.0;

// border interpolation stops at 80% of the palette
const BORDER_SHADE: f64 = 0.8;

/// User-chosen palette and base size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualStyle {
    pub min_color: Rgb,
    pub max_color: Rgb,
    pub avg_size: f64,
}

impl Default for VisualStyle {
    fn default() -> Self {
        Self {
            min_color: DEFAULT_MIN_COLOR,
            max_color: DEFAULT_MAX_COLOR,
            avg_size: DEFAULT_AVG_SIZE,
        }
    }
}

/// Maps degrees onto a style, relative to the degree range of one graph
#[derive(Debug, Clone, PartialEq)]
pub struct VisualEncoder {
    style: VisualStyle,
    min_degree: usize,
    max_degree: usize,
}

impl VisualEncoder {
    /// Encoder for a graph whose node degrees are `degrees`
    pub fn new(style: VisualStyle, degrees: &[usize]) -> Self {
        let min_degree = degrees.iter().copied().min().unwrap_or(0);
        let max_degree = degrees.iter().copied().max().unwrap_or(0);
        Self {
            style,
            min_degree,
            max_degree,
        }
    }

    pub fn style(&self) -> &VisualStyle {
        &self.style
    }

    /// Position of `degree` within the range, 0 when the range is flat
    pub fn normalized(&self, degree: f64) -> f64 {
        if self.max_degree == self.min_degree {
            return 0.0;
        }
        let min = self.min_degree as f64;
        let max = self.max_degree as f64;
        (degree - min) / (max - min)
    }

    pub fn node_size(&self, degree: usize) -> f64 {
        self.style.avg_size * (1.0 + self.normalized(degree as f64))
    }

    pub fn node_color(&self, degree: usize) -> Rgb {
        self.style
            .min_color
            .lerp(&self.style.max_color, self.normalized(degree as f64))
    }

    pub fn border_color(&self, degree: usize) -> Rgb {
        self.style
            .min_color
            .lerp(&self.style.max_color, self.normalized(degree as f64) * BORDER_SHADE)
    }

    /// Edge color from the mean degree of its endpoints
    pub fn edge_color(&self, source_degree: usize, target_degree: usize) -> Rgb {
        let mean = (source_degree + target_degree) as f64 / 2.0;
        self.style.min_color.lerp(&self.style.max_color, self.normalized(mean))
    }
}
