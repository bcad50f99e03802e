//! De compose-engine: ketent opeenvolgende stapmatrices tot één lopend
//! product in de accumulatorregio.

use super::matrix::Mat4;
use super::memory::{EngineMemory, STEP_OPERAND_LANES};
use super::synthesis::{self, TransformKind};

/// Zet de accumulator op de identiteitsmatrix.
pub fn reset(memory: &mut EngineMemory) {
    memory.write_accumulator(&Mat4::IDENTITY);
}

/// Synthetiseer de stap in de kladregio en vermenigvuldig die in het
/// lopende product.
///
/// Leest het dial-gewicht en de operand-adressen uit het stap-record,
/// schrijft de gesynthetiseerde matrix naar de kladregio en roept daarna
/// [`product`] aan. Stappen moeten één voor één en in sequentievolgorde
/// langskomen: de gedeelde klad- en accumulatorregio's verdragen geen
/// herordening.
pub fn advance(memory: &mut EngineMemory, step: usize, kind: TransformKind) {
    let dial = memory.dial(step);

    let mut operands = [0.0_f32; STEP_OPERAND_LANES];
    let count = kind.operand_count();
    for (lane, value) in operands.iter_mut().enumerate().take(count) {
        *value = memory.operand_canonical(step, lane);
    }

    let matrix = synthesis::synthesize(kind, dial, &operands[..count]);
    memory.write_store(&matrix);
    product(memory);
}

/// `resultaat = klad × accumulator`, daarna `accumulator = resultaat`.
///
/// De accumulator bevat hierna het product van alle tot dusver
/// geavanceerde stappen; de jongste stap is links bijgevoegd
/// (pre-multiplicatie).
pub fn product(memory: &mut EngineMemory) {
    let result = memory.store_matrix().multiplied(memory.accumulator_matrix());
    memory.write_result(&result);
    memory.write_accumulator(&result);
}
