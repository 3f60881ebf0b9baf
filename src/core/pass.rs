use std::fmt;
use std::str::FromStr;

/// Named render pass configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    Solid,
    Wireframe,
}

impl PassKind {
    pub const ALL: [PassKind; 2] = [PassKind::Solid, PassKind::Wireframe];

    pub const fn name(self) -> &'static str {
        match self {
            PassKind::Solid => "solid",
            PassKind::Wireframe => "wireframe",
        }
    }

    /// Tag handed to shaders so materials can branch per pass
    pub const fn shader_tag(self) -> u32 {
        match self {
            PassKind::Solid => 0,
            PassKind::Wireframe => 1,
        }
    }

    /// Complete rasterization state for this pass
    pub const fn raster_state(self) -> RasterState {
        match self {
            PassKind::Solid => RasterState {
                polygon_mode: PolygonMode::Fill,
                depth_bias: DepthBias::NONE,
            },
            // Negative bias pulls lines toward the viewer so they win against
            // a coincident solid pass.
            PassKind::Wireframe => RasterState {
                polygon_mode: PolygonMode::Line,
                depth_bias: DepthBias {
                    constant: -1,
                    slope_scale: -1.0,
                },
            },
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown render pass '{0}'")]
pub struct UnknownPass(pub String);

impl FromStr for PassKind {
    type Err = UnknownPass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(PassKind::Solid),
            "wireframe" => Ok(PassKind::Wireframe),
            other => Err(UnknownPass(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    Fill,
    Line,
}

impl From<PolygonMode> for wgpu::PolygonMode {
    fn from(mode: PolygonMode) -> Self {
        match mode {
            PolygonMode::Fill => wgpu::PolygonMode::Fill,
            PolygonMode::Line => wgpu::PolygonMode::Line,
        }
    }
}

/// Depth offset applied while rasterizing a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBias {
    pub constant: i32,
    pub slope_scale: f32,
}

impl DepthBias {
    pub const NONE: DepthBias = DepthBias {
        constant: 0,
        slope_scale: 0.0,
    };

    pub fn is_none(&self) -> bool {
        self.constant == 0 && self.slope_scale == 0.0
    }
}

impl From<DepthBias> for wgpu::DepthBiasState {
    fn from(bias: DepthBias) -> Self {
        wgpu::DepthBiasState {
            constant: bias.constant,
            slope_scale: bias.slope_scale,
            clamp: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterState {
    pub polygon_mode: PolygonMode,
    pub depth_bias: DepthBias,
}

impl RasterState {
    /// Hashable identity, used to cache pipelines per state
    pub fn key(&self) -> RasterKey {
        RasterKey {
            polygon_mode: self.polygon_mode,
            bias_constant: self.depth_bias.constant,
            bias_slope_bits: self.depth_bias.slope_scale.to_bits(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterKey {
    polygon_mode: PolygonMode,
    bias_constant: i32,
    bias_slope_bits: u32,
}
