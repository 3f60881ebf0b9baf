mod color;
mod noise;

pub use color::{height_color, hsv_to_rgb};
pub use noise::ValueNoise;
