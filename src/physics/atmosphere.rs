// ---------------------------------------------------------------------------
// Exponential atmosphere with a hard ceiling
// ---------------------------------------------------------------------------

/// Atmospheric properties at a given altitude.
#[derive(Debug, Clone, Copy)]
pub struct Atmo {
    pub density: f64, // kg/m^3
}

/// Isothermal exponential atmosphere that ends abruptly at `ceiling`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmosphere {
    pub surface_density: f64, // kg/m^3
    pub scale_height: f64,    // m
    pub ceiling: f64,         // m
}

impl Atmosphere {
    /// Kerbin: 1.223 kg/m^3 at sea level, ~5.6 km scale height, 70 km ceiling.
    pub fn kerbin() -> Self {
        Self {
            surface_density: 1.223,
            scale_height: 5_600.0,
            ceiling: 70_000.0,
        }
    }

    /// Properties at `altitude` (m). Negative altitudes clamp to the surface;
    /// vacuum at and above the ceiling.
    pub fn at(&self, altitude: f64) -> Atmo {
        let h = altitude.max(0.0);
        if h >= self.ceiling {
            return Atmo { density: 0.0 };
        }
        Atmo { density: self.surface_density * (-h / self.scale_height).exp() }
    }
}
