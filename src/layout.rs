//! Page geometry and declarative draw instructions
//!
//! Composers describe a page as a list of [`DrawOp`]s in PDF points with the
//! origin at the bottom-left. The renderer in `pdf::render` turns them into a
//! content stream.

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self {
            width: Length::from_mm(210.0),
            height: Length::from_mm(297.0),
        }
    }

    /// Width in points
    pub fn width_pt(&self) -> f32 {
        self.width.pt() as f32
    }

    /// Height in points
    pub fn height_pt(&self) -> f32 {
        self.height.pt() as f32
    }
}

/// The standard fonts used on generated pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Helvetica, Font::HelveticaBold, Font::HelveticaOblique];

    /// PostScript name of the standard Type1 font
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Name under which the font is registered in page resources
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::HelveticaOblique => "F3",
        }
    }
}

/// One drawing instruction, coordinates in points
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline starting at (x, y)
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        text: String,
    },
    /// Stroked straight line
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
    },
    /// Image XObject placed with its bottom-left corner at (x, y)
    Image {
        name: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// A page described as an ordered list of draw instructions
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page: PageDimensions,
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    pub fn new(page: PageDimensions) -> Self {
        Self { page, ops: Vec::new() }
    }

    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: impl Into<String>) {
        self.ops.push(DrawOp::Text { x, y, font, size, text: text.into() });
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32) {
        self.ops.push(DrawOp::Line { from, to, width });
    }

    pub fn image(&mut self, name: impl Into<String>, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Image { name: name.into(), x, y, width, height });
    }

    /// All text drawn on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Fit a `width × width*aspect` box into the area of `max_width × max_height`,
/// keeping the aspect ratio (height / width). Returns (width, height).
pub fn fit_width(max_width: f32, max_height: f32, aspect_ratio: f32) -> (f32, f32) {
    let height = max_width * aspect_ratio;
    if height <= max_height || aspect_ratio <= 0.0 {
        (max_width, height)
    } else {
        (max_height / aspect_ratio, max_height)
    }
}
