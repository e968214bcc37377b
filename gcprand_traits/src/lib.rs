pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

/// One raw sample from the indicator: the marker offset and the extent of the
/// coordinate space it was measured in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    pub position: f64,
    pub scale: f64,
}

impl RawReading {
    pub fn new(position: f64, scale: f64) -> Self {
        Self { position, scale }
    }
}

/// Source of raw readings (a rendered chart, a replay file, a simulator).
pub trait Indicator {
    fn read(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<RawReading, Box<dyn std::error::Error + Send + Sync>>;
}

/// Color handed to a light: sRGB components in [0, 1] and the CIE 1931 xy
/// chromaticity of the same color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColor {
    pub rgb: (f64, f64, f64),
    pub xy: (f64, f64),
}

/// Output device that can show a color.
pub trait LightSink {
    fn apply(&mut self, color: &LightColor) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: Indicator + ?Sized> Indicator for Box<T> {
    fn read(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<RawReading, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read(timeout)
    }
}

impl<T: LightSink + ?Sized> LightSink for Box<T> {
    fn apply(&mut self, color: &LightColor) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).apply(color)
    }
}
