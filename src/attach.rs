//! Het koppelvlak naar de externe attach-stap: per hersamenstelling wordt
//! één `matrix3d(...)`-string afgeleverd, fire-and-forget.

/// Ontvanger van de geserialiseerde matrix van een sequentie.
///
/// De kern schrijft zelf nooit naar een visueel oppervlak; de host hangt
/// hier zijn eigen stijl-update aan.
pub trait AttachTarget {
    /// Ontvang de actuele `matrix3d(...)`-string.
    fn apply(&mut self, matrix: &str);
}

impl<F: FnMut(&str)> AttachTarget for F {
    fn apply(&mut self, matrix: &str) {
        self(matrix);
    }
}

/// Attach-doel dat de string naar het logkanaal schrijft; handig tijdens
/// ontwikkeling en in voorbeelden.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAttach;

impl AttachTarget for LogAttach {
    fn apply(&mut self, matrix: &str) {
        log::debug!("transform bijgewerkt: {matrix}");
    }
}
