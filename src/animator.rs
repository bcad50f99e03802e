//! De aansturing: bezit het engine-geheugen, de viewport en de graph, en
//! vertaalt elke bladwijziging synchroon en diepte-eerst in een volledige
//! hersamenstelling van de afhankelijke sequenties.

use std::collections::{BTreeMap, BTreeSet};

use crate::attach::AttachTarget;
use crate::engine::compose;
use crate::engine::memory::{EngineMemory, LayoutError, MemoryLayout};
use crate::engine::synthesis::TransformKind;
use crate::engine::units::{self, Unit};
use crate::engine::viewport::Viewport;
use crate::graph::param::{CalcOp, ParamId, ParamKind};
use crate::graph::sequence::{Entry, SequenceId};
use crate::graph::step::StepId;
use crate::graph::{GraphError, Subscriber, TransformGraph};

/// Het publieke bouw- en aanstuurvlak van de kern.
///
/// Enkeldradig en synchroon: één hersamenstelling loopt altijd volledig af
/// (reset → advance per stap → serialisatie) voordat een volgende begint;
/// de gedeelde matrixregio's worden uitsluitend via `&mut self` geraakt.
pub struct Animator {
    memory: EngineMemory,
    viewport: Viewport,
    graph: TransformGraph,
    viewport_params: BTreeSet<ParamId>,
    attachments: BTreeMap<SequenceId, Box<dyn AttachTarget>>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// Maak een animator met de referentie-geheugenlayout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_layout(MemoryLayout::default()).expect("default layout is geldig")
    }

    /// Maak een animator met een door de bootstrap aangeleverde layout.
    pub fn with_layout(layout: MemoryLayout) -> Result<Self, LayoutError> {
        Ok(Self {
            memory: EngineMemory::new(layout)?,
            viewport: Viewport::default(),
            graph: TransformGraph::new(),
            viewport_params: BTreeSet::new(),
            attachments: BTreeMap::new(),
        })
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn memory(&self) -> &EngineMemory {
        &self.memory
    }

    // ── constructie ─────────────────────────────────────────────────────────

    /// Maak een bladparameter aan en schrijf zijn cellen.
    pub fn parameter(&mut self, unit: Unit, value: f64) -> Result<ParamId, GraphError> {
        self.ensure_param_capacity()?;
        let id = self.graph.add_leaf(unit, value);
        if unit.is_viewport_relative() {
            self.viewport_params.insert(id);
        }
        self.refresh_param_cells(id);
        Ok(id)
    }

    /// Maak een calc-knoop aan over eerder aangemaakte operanden.
    /// De bedrading ligt daarna vast.
    pub fn calc(&mut self, op: CalcOp, operands: &[ParamId]) -> Result<ParamId, GraphError> {
        for operand in operands {
            self.graph.param(*operand)?;
        }
        if !op.accepts(operands.len()) {
            return Err(GraphError::OperandArity {
                op: op.name(),
                expected: op.expected_arity(),
                got: operands.len(),
            });
        }
        self.ensure_param_capacity()?;

        let id = self.graph.add_calc(op, operands.to_vec());
        for operand in operands {
            self.graph.params[operand.0]
                .subscribers
                .insert(Subscriber::Calc(id));
        }
        self.refresh_param_cells(id);
        Ok(id)
    }

    /// Maak een transformatiestap aan. Ontbrekende operanden worden met
    /// soortspecifieke identiteitsinvoer aangevuld (lengte nul, hoek nul,
    /// schaalfactor één; 2D/3D-schaal herhaalt een enkele factor).
    pub fn transformation(
        &mut self,
        kind: TransformKind,
        operands: &[ParamId],
    ) -> Result<StepId, GraphError> {
        for operand in operands {
            self.graph.param(*operand)?;
        }
        let max = kind.operand_count();
        if operands.len() > max {
            return Err(GraphError::TooManyOperands {
                kind: kind.name(),
                max,
                got: operands.len(),
            });
        }
        self.ensure_step_capacity()?;

        let full = self.complete_operands(kind, operands)?;
        let id = self.graph.add_step(kind, full);

        #[allow(clippy::cast_possible_truncation)]
        for (lane, operand) in self.graph.steps[id.0].operands.clone().iter().enumerate() {
            self.memory.set_operand(id.0, lane, operand.0 as u32);
            self.graph.params[operand.0]
                .subscribers
                .insert(Subscriber::Step(id));
        }
        Ok(id)
    }

    /// Maak een lege sequentie aan.
    pub fn sequence(&mut self) -> SequenceId {
        self.graph.add_sequence()
    }

    /// Vervang de entrylijst van een sequentie in zijn geheel: de huidige
    /// entries worden afgemeld, de nieuwe aangemeld. Er volgt geen
    /// hersamenstelling totdat de voortgang of een invoer wijzigt.
    pub fn set_entries(&mut self, id: SequenceId, entries: Vec<Entry>) -> Result<(), GraphError> {
        self.graph.sequence(id)?;
        for entry in &entries {
            if let Entry::Step(step) = entry {
                self.graph.step(*step)?;
            }
        }

        let current = self.graph.sequences[id.0].entries.clone();
        for entry in current {
            if let Entry::Step(step) = entry {
                self.graph.steps[step.0].subscribers.remove(&id);
            }
        }
        for entry in &entries {
            if let Entry::Step(step) = entry {
                self.graph.steps[step.0].subscribers.insert(id);
            }
        }
        self.graph.sequences[id.0].entries = entries;
        Ok(())
    }

    /// Meld alle entries af en laat de lijst leeg achter.
    pub fn clear_entries(&mut self, id: SequenceId) -> Result<(), GraphError> {
        self.set_entries(id, Vec::new())
    }

    /// Koppel een attach-doel aan een sequentie; het ontvangt vanaf nu elke
    /// geserialiseerde matrix.
    pub fn attach(
        &mut self,
        id: SequenceId,
        target: Box<dyn AttachTarget>,
    ) -> Result<(), GraphError> {
        self.graph.sequence(id)?;
        self.attachments.insert(id, target);
        Ok(())
    }

    /// Bewaar een oorsprong van drie lengteparameters bij de sequentie.
    /// Wordt doorgegeven aan de attach-stap en laat de compositie ongemoeid.
    pub fn set_origin(&mut self, id: SequenceId, origin: [ParamId; 3]) -> Result<(), GraphError> {
        for parameter in origin {
            self.graph.param(parameter)?;
        }
        self.graph.sequence_mut(id)?.origin = Some(origin);
        Ok(())
    }

    pub fn origin(&self, id: SequenceId) -> Result<Option<[ParamId; 3]>, GraphError> {
        Ok(self.graph.sequence(id)?.origin)
    }

    // ── waarden en voortgang ────────────────────────────────────────────────

    /// Wijs een bladparameter een nieuwe ruwe waarde toe. Een toewijzing
    /// van de huidige waarde is een no-op en veroorzaakt geen propagatie.
    #[allow(clippy::float_cmp)]
    pub fn set_value(&mut self, id: ParamId, value: f64) -> Result<(), GraphError> {
        match &mut self.graph.param_mut(id)?.kind {
            ParamKind::Leaf { raw, .. } => {
                if *raw == value {
                    return Ok(());
                }
                *raw = value;
            }
            ParamKind::Calc { .. } => return Err(GraphError::NotALeaf(id.0)),
        }
        self.trigger_param(id);
        Ok(())
    }

    /// Ruwe waarde van een blad, of de actuele uitkomst van een calc.
    pub fn value(&self, id: ParamId) -> Result<f64, GraphError> {
        match &self.graph.param(id)?.kind {
            ParamKind::Leaf { raw, .. } => Ok(*raw),
            ParamKind::Calc { .. } => Ok(self.graph.canonical(id, &self.viewport)),
        }
    }

    /// De eenheid van een blad; `None` voor calc-knopen.
    pub fn unit(&self, id: ParamId) -> Result<Option<Unit>, GraphError> {
        match &self.graph.param(id)?.kind {
            ParamKind::Leaf { unit, .. } => Ok(Some(*unit)),
            ParamKind::Calc { .. } => Ok(None),
        }
    }

    /// Canonieke waarde van een knoop (pixels/radialen/getal).
    pub fn canonical(&self, id: ParamId) -> Result<f64, GraphError> {
        self.graph.param(id)?;
        Ok(self.graph.canonical(id, &self.viewport))
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.graph.params.len()
    }

    /// Zet de topniveau-voortgang en stel de sequentie opnieuw samen.
    /// Anders dan bij bladwaarden wordt hier niet op gelijkheid gefilterd.
    pub fn set_progress(&mut self, id: SequenceId, progress: f64) -> Result<(), GraphError> {
        self.graph.sequence_mut(id)?.progress = progress;
        self.recompute(id);
        Ok(())
    }

    pub fn progress(&self, id: SequenceId) -> Result<f64, GraphError> {
        Ok(self.graph.sequence(id)?.progress)
    }

    /// De laatst geserialiseerde matrix van een sequentie, of `None` zolang
    /// er nog niets is samengesteld.
    pub fn matrix(&self, id: SequenceId) -> Result<Option<&str>, GraphError> {
        Ok(self.graph.sequence(id)?.matrix.as_deref())
    }

    /// Neem nieuwe viewportafmetingen over en converteer elke
    /// viewport-relatieve bladparameter opnieuw, inclusief propagatie.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        #[allow(clippy::cast_possible_truncation)]
        self.viewport.set_size(width as f32, height as f32);
        let params: Vec<ParamId> = self.viewport_params.iter().copied().collect();
        for id in params {
            self.trigger_param(id);
        }
    }

    // ── propagatie ──────────────────────────────────────────────────────────

    /// Schrijf de cellen van een knoop en licht synchroon en diepte-eerst
    /// alle abonnees in. Geen coalescing: elke onafhankelijke wijziging
    /// leidt tot een eigen volledige hersamenstelling.
    fn trigger_param(&mut self, id: ParamId) {
        self.refresh_param_cells(id);

        let subscribers: Vec<Subscriber> =
            self.graph.params[id.0].subscribers.iter().copied().collect();
        for subscriber in subscribers {
            match subscriber {
                Subscriber::Calc(calc) => self.trigger_param(calc),
                Subscriber::Step(step) => {
                    let sequences: Vec<SequenceId> =
                        self.graph.steps[step.0].subscribers.iter().copied().collect();
                    for sequence in sequences {
                        self.recompute(sequence);
                    }
                }
            }
        }
    }

    /// Schrijf de ruwe en canonieke cel van een parameter-slot.
    #[allow(clippy::cast_possible_truncation)]
    fn refresh_param_cells(&mut self, id: ParamId) {
        let (value, factor) = match &self.graph.params[id.0].kind {
            ParamKind::Leaf { raw, unit } => (*raw, unit.factor(&self.viewport)),
            ParamKind::Calc { .. } => (self.graph.canonical(id, &self.viewport), 1.0),
        };
        self.memory.write_raw(id.0, value as f32);
        units::convert(&mut self.memory, id.0, factor);
    }

    /// Volledige hersamenstelling van één sequentie: reset, daarna de
    /// entrylijst van links naar rechts.
    #[allow(clippy::cast_possible_truncation)]
    fn recompute(&mut self, id: SequenceId) {
        let (entries, top_progress) = {
            let sequence = &self.graph.sequences[id.0];
            (sequence.entries.clone(), sequence.progress)
        };

        compose::reset(&mut self.memory);
        let mut effective = top_progress;
        for entry in entries {
            match entry {
                Entry::Step(step) => {
                    let kind = self.graph.steps[step.0].kind;
                    self.memory.set_dial(step.0, effective as f32);
                    compose::advance(&mut self.memory, step.0, kind);
                }
                // Hervertaalt altijd vanuit de oorspronkelijke
                // topniveau-voortgang, niet vanuit het lopende gewicht.
                Entry::Dial(curve) => effective = curve.apply(top_progress),
            }
        }

        let matrix = self.memory.accumulator_matrix().to_matrix3d();
        log::debug!("sequentie {} hersamengesteld: {matrix}", id.0);
        self.graph.sequences[id.0].matrix = Some(matrix.clone());
        if let Some(target) = self.attachments.get_mut(&id) {
            target.apply(&matrix);
        }
    }

    // ── capaciteit ──────────────────────────────────────────────────────────

    fn ensure_param_capacity(&self) -> Result<(), GraphError> {
        let capacity = self.memory.layout().param_capacity;
        if self.graph.params.len() >= capacity {
            return Err(GraphError::TableFull {
                table: "parametertabel",
                capacity,
            });
        }
        Ok(())
    }

    fn ensure_step_capacity(&self) -> Result<(), GraphError> {
        let capacity = self.memory.layout().step_capacity;
        if self.graph.steps.len() >= capacity {
            return Err(GraphError::TableFull {
                table: "staptabel",
                capacity,
            });
        }
        Ok(())
    }

    /// Vul een operandlijst aan tot het aantal dat de soort leest.
    fn complete_operands(
        &mut self,
        kind: TransformKind,
        given: &[ParamId],
    ) -> Result<Vec<ParamId>, GraphError> {
        use TransformKind as K;

        let mut operands = given.to_vec();
        let count = kind.operand_count();
        match kind {
            K::Translate | K::Translate3d | K::TranslateX | K::TranslateY | K::TranslateZ => {
                while operands.len() < count {
                    operands.push(self.parameter(Unit::Px, 0.0)?);
                }
            }
            K::Rotate3d => {
                while operands.len() < 3 {
                    operands.push(self.parameter(Unit::Number, 0.0)?);
                }
                if operands.len() < 4 {
                    operands.push(self.parameter(Unit::Rad, 0.0)?);
                }
            }
            K::RotateX | K::RotateY | K::RotateZ | K::Skew | K::SkewX | K::SkewY => {
                while operands.len() < count {
                    operands.push(self.parameter(Unit::Rad, 0.0)?);
                }
            }
            K::Scale => {
                if operands.is_empty() {
                    operands.push(self.parameter(Unit::Number, 1.0)?);
                }
                if operands.len() < 2 {
                    // y volgt x bij een enkele factor
                    operands.push(operands[0]);
                }
            }
            K::Scale3d => {
                if operands.is_empty() {
                    operands.push(self.parameter(Unit::Number, 1.0)?);
                }
                if operands.len() == 1 {
                    operands.push(operands[0]);
                    operands.push(operands[0]);
                } else if operands.len() == 2 {
                    operands.push(self.parameter(Unit::Number, 1.0)?);
                }
            }
            K::ScaleX | K::ScaleY | K::ScaleZ => {
                while operands.len() < count {
                    operands.push(self.parameter(Unit::Number, 1.0)?);
                }
            }
        }
        Ok(operands)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Animator;
    use crate::engine::memory::MemoryLayout;
    use crate::engine::synthesis::TransformKind;
    use crate::engine::units::Unit;
    use crate::graph::GraphError;
    use crate::graph::dial::DialCurve;
    use crate::graph::param::CalcOp;
    use crate::graph::sequence::Entry;

    fn counting_attach(animator: &mut Animator, sequence: crate::graph::sequence::SequenceId)
    -> Rc<RefCell<Vec<String>>> {
        let received: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&received);
        animator
            .attach(
                sequence,
                Box::new(move |matrix: &str| sink.borrow_mut().push(matrix.to_owned())),
            )
            .expect("sequentie bestaat");
        received
    }

    #[test]
    fn leaf_change_propagates_to_sequence() {
        let mut animator = Animator::new();
        let length = animator.parameter(Unit::Px, 0.0).unwrap();
        let step = animator
            .transformation(TransformKind::TranslateX, &[length])
            .unwrap();
        let sequence = animator.sequence();
        animator.set_entries(sequence, vec![Entry::Step(step)]).unwrap();
        animator.set_progress(sequence, 1.0).unwrap();

        animator.set_value(length, 25.0).unwrap();
        let matrix = animator.matrix(sequence).unwrap().unwrap();
        assert!(matrix.starts_with("matrix3d(1, 0, 0, 0,"));
        assert!(matrix.contains(", 25, 0, 0, 1)"));
    }

    #[test]
    fn noop_assignment_triggers_nothing() {
        let mut animator = Animator::new();
        let length = animator.parameter(Unit::Px, 10.0).unwrap();
        let step = animator
            .transformation(TransformKind::TranslateX, &[length])
            .unwrap();
        let sequence = animator.sequence();
        animator.set_entries(sequence, vec![Entry::Step(step)]).unwrap();
        let received = counting_attach(&mut animator, sequence);

        animator.set_progress(sequence, 1.0).unwrap();
        assert_eq!(received.borrow().len(), 1);

        animator.set_value(length, 10.0).unwrap();
        assert_eq!(received.borrow().len(), 1, "no-op mag niets triggeren");

        animator.set_value(length, 11.0).unwrap();
        assert_eq!(received.borrow().len(), 2);
    }

    #[test]
    fn calc_chain_recomputes_depth_first() {
        let mut animator = Animator::new();
        let a = animator.parameter(Unit::Px, 10.0).unwrap();
        let b = animator.parameter(Unit::Px, 20.0).unwrap();
        let sum = animator.calc(CalcOp::Add, &[a, b]).unwrap();
        let doubled = animator.calc(CalcOp::Mul, &[sum, sum]).unwrap();

        assert_eq!(animator.value(sum).unwrap(), 30.0);
        assert_eq!(animator.value(doubled).unwrap(), 900.0);

        animator.set_value(a, 15.0).unwrap();
        assert_eq!(animator.value(sum).unwrap(), 35.0);
        assert_eq!(animator.canonical(doubled).unwrap(), 1225.0);
        // De geheugencel loopt mee met de graph.
        assert!((animator.memory().canonical(doubled.0) - 1225.0).abs() < 1e-3);
    }

    #[test]
    fn calc_values_are_not_assignable() {
        let mut animator = Animator::new();
        let a = animator.parameter(Unit::Px, 1.0).unwrap();
        let calc = animator.calc(CalcOp::Sqrt, &[a]).unwrap();
        assert!(matches!(
            animator.set_value(calc, 2.0),
            Err(GraphError::NotALeaf(_))
        ));
    }

    #[test]
    fn arity_violations_are_rejected() {
        let mut animator = Animator::new();
        let a = animator.parameter(Unit::Px, 1.0).unwrap();
        assert!(matches!(
            animator.calc(CalcOp::Div, &[a]),
            Err(GraphError::OperandArity { .. })
        ));
        assert!(matches!(
            animator.transformation(TransformKind::TranslateX, &[a, a]),
            Err(GraphError::TooManyOperands { .. })
        ));
    }

    #[test]
    fn viewport_change_reconverts_relative_leaves() {
        let mut animator = Animator::new();
        animator.set_viewport(1000.0, 500.0);

        let width = animator.parameter(Unit::Vw, 10.0).unwrap();
        assert_eq!(animator.canonical(width).unwrap(), 100.0);

        let step = animator
            .transformation(TransformKind::TranslateX, &[width])
            .unwrap();
        let sequence = animator.sequence();
        animator.set_entries(sequence, vec![Entry::Step(step)]).unwrap();
        animator.set_progress(sequence, 1.0).unwrap();
        let received = counting_attach(&mut animator, sequence);

        animator.set_viewport(2000.0, 500.0);
        assert_eq!(animator.canonical(width).unwrap(), 200.0);
        assert_eq!(received.borrow().len(), 1);
        assert!(received.borrow()[0].contains(", 200, 0, 0, 1)"));
    }

    #[test]
    fn dial_remap_rederives_from_top_progress() {
        let mut animator = Animator::new();
        let length = animator.parameter(Unit::Px, 100.0).unwrap();
        let first = animator
            .transformation(TransformKind::TranslateX, &[length])
            .unwrap();
        let second = animator
            .transformation(TransformKind::TranslateX, &[length])
            .unwrap();
        let sequence = animator.sequence();
        animator
            .set_entries(
                sequence,
                vec![
                    Entry::Step(first),
                    Entry::Dial(DialCurve::Square),
                    Entry::Dial(DialCurve::Square),
                    Entry::Step(second),
                ],
            )
            .unwrap();

        // Tweemaal kwadrateren componeert niet: de tweede hervertaling
        // begint weer bij de topniveau-voortgang.
        animator.set_progress(sequence, 0.5).unwrap();
        let matrix = animator.matrix(sequence).unwrap().unwrap();
        // eerste stap: 100 × 0.5 = 50; tweede stap: 100 × 0.25 = 25
        assert!(matrix.contains(", 75, 0, 0, 1)"));
    }

    #[test]
    fn replacing_entries_unsubscribes_the_old_list() {
        let mut animator = Animator::new();
        let length = animator.parameter(Unit::Px, 10.0).unwrap();
        let step = animator
            .transformation(TransformKind::TranslateX, &[length])
            .unwrap();
        let sequence = animator.sequence();
        animator.set_entries(sequence, vec![Entry::Step(step)]).unwrap();
        let received = counting_attach(&mut animator, sequence);

        animator.clear_entries(sequence).unwrap();
        animator.set_value(length, 20.0).unwrap();
        assert!(received.borrow().is_empty(), "afgemelde stap triggert niet");
    }

    #[test]
    fn table_capacity_is_enforced() {
        let layout = MemoryLayout {
            result: 0x0,
            accumulator: 0x10,
            store: 0x20,
            step_table: 0x30,
            step_capacity: 1,
            param_table: 0x40,
            param_capacity: 2,
        };
        let mut animator = Animator::with_layout(layout).unwrap();

        let a = animator.parameter(Unit::Px, 1.0).unwrap();
        let _b = animator.parameter(Unit::Px, 2.0).unwrap();
        assert!(matches!(
            animator.parameter(Unit::Px, 3.0),
            Err(GraphError::TableFull { .. })
        ));

        animator.transformation(TransformKind::TranslateX, &[a]).unwrap();
        assert!(matches!(
            animator.transformation(TransformKind::TranslateX, &[a]),
            Err(GraphError::TableFull { .. })
        ));
    }
}
