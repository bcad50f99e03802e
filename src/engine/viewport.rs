//! Viewportafmetingen en de daarvan afgeleide eenheidsfactoren.

/// Huidige viewportafmetingen, aangeleverd door de host-omgeving.
///
/// Eén `vw`/`vh`-eenheid is een honderdste van de betreffende dimensie;
/// `vmin` en `vmax` volgen de kleinste respectievelijk grootste dimensie.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        let mut viewport = Self::default();
        viewport.set_size(width, height);
        viewport
    }

    /// Neem nieuwe afmetingen over. Negatieve waarden worden op nul geklemd.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Pixels per `vw`-eenheid.
    #[must_use]
    pub fn vw(&self) -> f32 {
        self.width / 100.0
    }

    /// Pixels per `vh`-eenheid.
    #[must_use]
    pub fn vh(&self) -> f32 {
        self.height / 100.0
    }

    /// Pixels per `vmin`-eenheid.
    #[must_use]
    pub fn vmin(&self) -> f32 {
        self.width.min(self.height) / 100.0
    }

    /// Pixels per `vmax`-eenheid.
    #[must_use]
    pub fn vmax(&self) -> f32 {
        self.width.max(self.height) / 100.0
    }
}
