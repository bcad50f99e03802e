//! Het vlakke geheugenmodel van de engine: één aaneengesloten blok 32-bit
//! woorden, zowel als `f32` als als `u32` benaderbaar, verdeeld in vijf
//! vaste regio's.

use super::matrix::Mat4;

/// Aantal woorden per transformatiestap-record.
pub const STEP_RECORD_WORDS: usize = 0x8;
/// Woordoffset van het dial-gewicht binnen een stap-record.
pub const STEP_DIAL_OFFSET: usize = 0x2;
/// Woordoffset van de eerste operand-parameter binnen een stap-record.
pub const STEP_OPERAND_OFFSET: usize = 0x4;
/// Maximaal aantal operand-lanes per stap.
pub const STEP_OPERAND_LANES: usize = 0x4;

/// Aantal woorden per parameter-record.
pub const PARAM_RECORD_WORDS: usize = 0x2;
/// Woordoffset van de ruwe waarde binnen een parameter-record.
pub const PARAM_RAW_OFFSET: usize = 0x0;
/// Woordoffset van de canonieke waarde binnen een parameter-record.
pub const PARAM_CANONICAL_OFFSET: usize = 0x1;

const MATRIX_WORDS: usize = 0x10;

/// Basisadressen en tabelgroottes van de geheugenregio's.
///
/// De bootstrap-laag levert deze aan zodat de regio's verplaatsbaar zijn;
/// de defaults volgen de referentie-layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    /// Basisadres (in woorden) van de resultaatmatrix.
    pub result: usize,
    /// Basisadres van de accumulatormatrix.
    pub accumulator: usize,
    /// Basisadres van de kladmatrix voor de huidige stap.
    pub store: usize,
    /// Basisadres van de transformatiestap-tabel.
    pub step_table: usize,
    /// Aantal stap-records dat de tabel kan bevatten.
    pub step_capacity: usize,
    /// Basisadres van de parametertabel.
    pub param_table: usize,
    /// Aantal parameter-records dat de tabel kan bevatten.
    pub param_capacity: usize,
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self {
            result: 0x1000,
            accumulator: 0x1010,
            store: 0x1020,
            step_table: 0x1030,
            step_capacity: 0x100,
            param_table: 0x2000,
            param_capacity: 0x400,
        }
    }
}

impl MemoryLayout {
    /// Totaal aantal woorden dat deze layout nodig heeft.
    #[must_use]
    pub fn words_required(&self) -> usize {
        let ends = [
            self.result + MATRIX_WORDS,
            self.accumulator + MATRIX_WORDS,
            self.store + MATRIX_WORDS,
            self.step_table + self.step_capacity * STEP_RECORD_WORDS,
            self.param_table + self.param_capacity * PARAM_RECORD_WORDS,
        ];
        ends.into_iter().max().unwrap_or(0)
    }

    /// Controleer dat geen twee regio's elkaar overlappen.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.step_capacity == 0 || self.param_capacity == 0 {
            return Err(LayoutError::EmptyTable);
        }

        let regions = [
            ("result", self.result, MATRIX_WORDS),
            ("accumulator", self.accumulator, MATRIX_WORDS),
            ("store", self.store, MATRIX_WORDS),
            (
                "step table",
                self.step_table,
                self.step_capacity * STEP_RECORD_WORDS,
            ),
            (
                "parameter table",
                self.param_table,
                self.param_capacity * PARAM_RECORD_WORDS,
            ),
        ];

        for (index, (name_a, start_a, len_a)) in regions.iter().enumerate() {
            for (name_b, start_b, len_b) in regions.iter().skip(index + 1) {
                let disjoint = start_a + len_a <= *start_b || start_b + len_b <= *start_a;
                if !disjoint {
                    return Err(LayoutError::Overlap {
                        first: name_a,
                        second: name_b,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Error for an unusable region layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("memory regions `{first}` and `{second}` overlap")]
    Overlap {
        first: &'static str,
        second: &'static str,
    },
    #[error("step and parameter tables need room for at least one record")]
    EmptyTable,
}

/// Het voorgealloceerde engine-geheugen.
#[derive(Debug, Clone)]
pub struct EngineMemory {
    words: Vec<u32>,
    layout: MemoryLayout,
}

impl EngineMemory {
    /// Alloceer een buffer voor de gegeven layout.
    pub fn new(layout: MemoryLayout) -> Result<Self, LayoutError> {
        layout.validate()?;
        Ok(Self {
            words: vec![0; layout.words_required()],
            layout,
        })
    }

    #[must_use]
    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    #[must_use]
    pub fn f32_at(&self, index: usize) -> f32 {
        f32::from_bits(self.words[index])
    }

    pub fn set_f32_at(&mut self, index: usize, value: f32) {
        self.words[index] = value.to_bits();
    }

    #[must_use]
    pub fn u32_at(&self, index: usize) -> u32 {
        self.words[index]
    }

    pub fn set_u32_at(&mut self, index: usize, value: u32) {
        self.words[index] = value;
    }

    // ── parametertabel ──────────────────────────────────────────────────────

    fn param_base(&self, slot: usize) -> usize {
        debug_assert!(slot < self.layout.param_capacity, "parameter slot buiten tabel");
        self.layout.param_table + slot * PARAM_RECORD_WORDS
    }

    /// Ruwe (door de aanroeper gezette) waarde van een parameter-slot.
    #[must_use]
    pub fn raw(&self, slot: usize) -> f32 {
        self.f32_at(self.param_base(slot) + PARAM_RAW_OFFSET)
    }

    pub fn write_raw(&mut self, slot: usize, value: f32) {
        let index = self.param_base(slot) + PARAM_RAW_OFFSET;
        self.set_f32_at(index, value);
    }

    /// Canonieke waarde (pixels/radialen/getal) van een parameter-slot.
    #[must_use]
    pub fn canonical(&self, slot: usize) -> f32 {
        self.f32_at(self.param_base(slot) + PARAM_CANONICAL_OFFSET)
    }

    pub fn write_canonical(&mut self, slot: usize, value: f32) {
        let index = self.param_base(slot) + PARAM_CANONICAL_OFFSET;
        self.set_f32_at(index, value);
    }

    // ── staptabel ───────────────────────────────────────────────────────────

    fn step_base(&self, step: usize) -> usize {
        debug_assert!(step < self.layout.step_capacity, "stap-slot buiten tabel");
        self.layout.step_table + step * STEP_RECORD_WORDS
    }

    #[must_use]
    pub fn dial(&self, step: usize) -> f32 {
        self.f32_at(self.step_base(step) + STEP_DIAL_OFFSET)
    }

    pub fn set_dial(&mut self, step: usize, value: f32) {
        let index = self.step_base(step) + STEP_DIAL_OFFSET;
        self.set_f32_at(index, value);
    }

    #[must_use]
    pub fn operand(&self, step: usize, lane: usize) -> u32 {
        debug_assert!(lane < STEP_OPERAND_LANES, "operand-lane buiten record");
        self.u32_at(self.step_base(step) + STEP_OPERAND_OFFSET + lane)
    }

    pub fn set_operand(&mut self, step: usize, lane: usize, address: u32) {
        debug_assert!(lane < STEP_OPERAND_LANES, "operand-lane buiten record");
        let index = self.step_base(step) + STEP_OPERAND_OFFSET + lane;
        self.set_u32_at(index, address);
    }

    /// Canonieke waarde van de parameter waarnaar een operand-lane verwijst.
    #[must_use]
    pub fn operand_canonical(&self, step: usize, lane: usize) -> f32 {
        let slot = self.operand(step, lane) as usize;
        self.canonical(slot)
    }

    // ── matrixregio's ───────────────────────────────────────────────────────

    fn read_matrix(&self, base: usize) -> Mat4 {
        let mut m = [0.0_f32; 16];
        for (offset, entry) in m.iter_mut().enumerate() {
            *entry = self.f32_at(base + offset);
        }
        Mat4::new(m)
    }

    fn write_matrix(&mut self, base: usize, matrix: &Mat4) {
        for (offset, entry) in matrix.m.iter().enumerate() {
            self.set_f32_at(base + offset, *entry);
        }
    }

    #[must_use]
    pub fn result_matrix(&self) -> Mat4 {
        self.read_matrix(self.layout.result)
    }

    pub fn write_result(&mut self, matrix: &Mat4) {
        self.write_matrix(self.layout.result, matrix);
    }

    #[must_use]
    pub fn accumulator_matrix(&self) -> Mat4 {
        self.read_matrix(self.layout.accumulator)
    }

    pub fn write_accumulator(&mut self, matrix: &Mat4) {
        self.write_matrix(self.layout.accumulator, matrix);
    }

    #[must_use]
    pub fn store_matrix(&self) -> Mat4 {
        self.read_matrix(self.layout.store)
    }

    pub fn write_store(&mut self, matrix: &Mat4) {
        self.write_matrix(self.layout.store, matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineMemory, LayoutError, MemoryLayout};
    use crate::engine::matrix::Mat4;

    #[test]
    fn default_layout_is_valid() {
        assert!(MemoryLayout::default().validate().is_ok());
    }

    #[test]
    fn overlapping_regions_are_rejected() {
        let layout = MemoryLayout {
            accumulator: 0x1008,
            ..MemoryLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::Overlap { .. })
        ));
    }

    #[test]
    fn relocated_layout_behaves_identically() {
        let layout = MemoryLayout {
            result: 0x0,
            accumulator: 0x10,
            store: 0x20,
            step_table: 0x30,
            step_capacity: 4,
            param_table: 0x100,
            param_capacity: 8,
        };
        let mut memory = EngineMemory::new(layout).expect("layout is geldig");

        memory.write_raw(3, 2.5);
        memory.write_canonical(3, 240.0);
        assert_eq!(memory.raw(3), 2.5);
        assert_eq!(memory.canonical(3), 240.0);

        memory.set_dial(2, 0.5);
        memory.set_operand(2, 0, 3);
        assert_eq!(memory.dial(2), 0.5);
        assert_eq!(memory.operand_canonical(2, 0), 240.0);
    }

    #[test]
    fn parameter_cells_are_independent() {
        let mut memory = EngineMemory::new(MemoryLayout::default()).unwrap();
        memory.write_raw(0, 1.0);
        memory.write_raw(1, 2.0);
        memory.write_canonical(0, 96.0);

        assert_eq!(memory.raw(0), 1.0);
        assert_eq!(memory.raw(1), 2.0);
        assert_eq!(memory.canonical(0), 96.0);
        assert_eq!(memory.canonical(1), 0.0);
    }

    #[test]
    fn matrix_regions_roundtrip() {
        let mut memory = EngineMemory::new(MemoryLayout::default()).unwrap();
        let mut m = Mat4::IDENTITY;
        m.m[12] = 7.0;

        memory.write_store(&m);
        memory.write_accumulator(&Mat4::IDENTITY);
        assert_eq!(memory.store_matrix(), m);
        assert_eq!(memory.accumulator_matrix(), Mat4::IDENTITY);
        assert_eq!(memory.result_matrix().m[0], 0.0);
    }
}
