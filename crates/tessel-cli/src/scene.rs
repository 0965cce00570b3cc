//! The JSON scene format
//!
//! ```json
//! { "width": 64, "height": 64, "background": "#ffffffff",
//!   "shapes": [ { "color": "#ff0000ff",
//!                 "polygons": [[[0,0],[32,0],[0,32]]],
//!                 "circles": [ { "center": [48,48], "radius": 10 } ] } ] }
//! ```

use serde::Deserialize;
use tessel::{error::Result, error::TesselError, Color, Point, Shape};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub shapes: Vec<SceneShape>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneShape {
    pub color: String,
    #[serde(default)]
    pub polygons: Vec<Vec<[f32; 2]>>,
    #[serde(default)]
    pub circles: Vec<SceneCircle>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneCircle {
    pub center: [f32; 2],
    pub radius: f32,
    #[serde(default)]
    pub counter_clockwise: bool,
}

impl Scene {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| TesselError::ConfigError(format!("Invalid scene: {}", e)))
    }

    /// Parsed background, if the scene sets one
    pub fn background(&self) -> Result<Option<Color>> {
        self.background.as_deref().map(str::parse).transpose()
    }

    /// Convert to renderable shapes, in file order
    pub fn shapes(&self) -> Result<Vec<Shape>> {
        self.shapes.iter().map(SceneShape::to_shape).collect()
    }
}

impl SceneShape {
    fn to_shape(&self) -> Result<Shape> {
        let mut shape = Shape::new(self.color.parse()?);
        for polygon in &self.polygons {
            shape = shape.with_polygon(polygon.iter().map(|&[x, y]| Point::new(x, y)).collect());
        }
        for circle in &self.circles {
            let [x, y] = circle.center;
            if !(circle.radius.is_finite() && circle.radius > 0.0) {
                return Err(TesselError::ConfigError(format!(
                    "Circle radius must be positive, got {}",
                    circle.radius
                )));
            }
            shape = shape.with_circle(Point::new(x, y), circle.radius, circle.counter_clockwise);
        }
        Ok(shape)
    }
}
