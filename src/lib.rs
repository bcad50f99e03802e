#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animator;
pub mod attach;
pub mod engine;
pub mod graph;

use animator::Animator;
use engine::synthesis::TransformKind;
use engine::units::Unit;
use graph::dial::DialCurve;
use graph::param::{CalcOp, ParamId};
use graph::sequence::{Entry, SequenceId};
use graph::step::StepId;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    log::set_logger(&DEFAULT_LOGGER).expect("error initializing logger");
    log::set_max_level(LevelFilter::Debug);
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Entry-specificatie zoals de host die aanlevert bij `set_entries`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum EntrySpec {
    Step { id: u32 },
    Dial { curve: String },
}

/// Momentopname van een bladparameter voor UI-generatie.
#[derive(Debug, Serialize)]
struct ParameterExport {
    id: u32,
    unit: String,
    value: f64,
    canonical: f64,
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    animator: Animator,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Engine {
            animator: Animator::new(),
        }
    }

    /// Neem nieuwe viewportafmetingen (in pixels) over.
    #[wasm_bindgen]
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.animator.set_viewport(width, height);
    }

    /// Maak een bladparameter aan; geeft het adres terug.
    #[wasm_bindgen]
    pub fn parameter(&mut self, unit: &str, value: f64) -> Result<u32, JsValue> {
        let unit = match Unit::parse(unit) {
            Some(unit) => unit,
            None => return Err(js_error(&format!("onbekende eenheid `{unit}`"))),
        };
        let id = self.animator.parameter(unit, value).map_err(to_js_error)?;
        Ok(id.0 as u32)
    }

    /// Maak een calc-knoop aan over eerder aangemaakte parameters.
    #[wasm_bindgen]
    pub fn calc(&mut self, op: &str, operands: Vec<u32>) -> Result<u32, JsValue> {
        let op = match CalcOp::parse(op) {
            Some(op) => op,
            None => return Err(js_error(&format!("onbekende operatie `{op}`"))),
        };
        let operands: Vec<ParamId> = operands
            .into_iter()
            .map(|id| ParamId::new(id as usize))
            .collect();
        let id = self.animator.calc(op, &operands).map_err(to_js_error)?;
        Ok(id.0 as u32)
    }

    /// Maak een transformatiestap aan; ontbrekende operanden worden met
    /// identiteitsinvoer aangevuld.
    #[wasm_bindgen]
    pub fn transformation(&mut self, kind: &str, operands: Vec<u32>) -> Result<u32, JsValue> {
        let kind = match TransformKind::parse(kind) {
            Some(kind) => kind,
            None => return Err(js_error(&format!("onbekende transformatiesoort `{kind}`"))),
        };
        let operands: Vec<ParamId> = operands
            .into_iter()
            .map(|id| ParamId::new(id as usize))
            .collect();
        let id = self
            .animator
            .transformation(kind, &operands)
            .map_err(to_js_error)?;
        Ok(id.0 as u32)
    }

    /// Maak een lege sequentie aan.
    #[wasm_bindgen]
    pub fn sequence(&mut self) -> u32 {
        self.animator.sequence().0 as u32
    }

    /// Vervang de entrylijst van een sequentie in zijn geheel. Verwacht een
    /// array van `{ type: "step", id }` en `{ type: "dial", curve }`.
    #[wasm_bindgen]
    pub fn set_entries(&mut self, sequence: u32, entries: JsValue) -> Result<(), JsValue> {
        let specs: Vec<EntrySpec> = serde_wasm_bindgen::from_value(entries)
            .map_err(|err| JsValue::from(JsError::new(&err.to_string())))?;

        let mut resolved = Vec::with_capacity(specs.len());
        for spec in specs {
            match spec {
                EntrySpec::Step { id } => resolved.push(Entry::Step(StepId::new(id as usize))),
                EntrySpec::Dial { curve } => match DialCurve::parse(&curve) {
                    Some(curve) => resolved.push(Entry::Dial(curve)),
                    None => return Err(js_error(&format!("onbekende dial-curve `{curve}`"))),
                },
            }
        }

        self.animator
            .set_entries(SequenceId::new(sequence as usize), resolved)
            .map_err(to_js_error)
    }

    /// Wijs een bladparameter een nieuwe ruwe waarde toe.
    #[wasm_bindgen]
    pub fn set_value(&mut self, parameter: u32, value: f64) -> Result<(), JsValue> {
        if !value.is_finite() {
            return Err(JsError::new("parameterwaarde moet een eindig getal zijn").into());
        }
        self.animator
            .set_value(ParamId::new(parameter as usize), value)
            .map_err(to_js_error)
    }

    /// Zet de topniveau-voortgang van een sequentie en stel opnieuw samen.
    #[wasm_bindgen]
    pub fn set_progress(&mut self, sequence: u32, progress: f64) -> Result<(), JsValue> {
        if !progress.is_finite() {
            return Err(JsError::new("voortgang moet een eindig getal zijn").into());
        }
        self.animator
            .set_progress(SequenceId::new(sequence as usize), progress)
            .map_err(to_js_error)
    }

    /// De actuele topniveau-voortgang van een sequentie.
    #[wasm_bindgen]
    pub fn progress(&self, sequence: u32) -> Result<f64, JsValue> {
        self.animator
            .progress(SequenceId::new(sequence as usize))
            .map_err(to_js_error)
    }

    /// Bewaar een oorsprong van drie lengteparameters bij een sequentie.
    #[wasm_bindgen]
    pub fn set_origin(&mut self, sequence: u32, x: u32, y: u32, z: u32) -> Result<(), JsValue> {
        self.animator
            .set_origin(
                SequenceId::new(sequence as usize),
                [
                    ParamId::new(x as usize),
                    ParamId::new(y as usize),
                    ParamId::new(z as usize),
                ],
            )
            .map_err(to_js_error)
    }

    /// De laatst geserialiseerde `matrix3d(...)`-string van een sequentie,
    /// of `undefined` zolang er nog niets is samengesteld.
    #[wasm_bindgen]
    pub fn matrix(&self, sequence: u32) -> Result<Option<String>, JsValue> {
        self.animator
            .matrix(SequenceId::new(sequence as usize))
            .map(|matrix| matrix.map(str::to_owned))
            .map_err(to_js_error)
    }

    /// Exporteer alle bladparameters met hun ruwe en canonieke waarde.
    #[wasm_bindgen]
    pub fn describe_parameters(&self) -> Result<JsValue, JsValue> {
        let mut exports = Vec::new();
        for index in 0..self.animator.parameter_count() {
            let id = ParamId::new(index);
            let unit = self.animator.unit(id).map_err(to_js_error)?;
            let Some(unit) = unit else {
                continue; // calc-knopen zijn geen invoer
            };
            exports.push(ParameterExport {
                id: index as u32,
                unit: unit.tag().to_owned(),
                value: self.animator.value(id).map_err(to_js_error)?,
                canonical: self.animator.canonical(id).map_err(to_js_error)?,
            });
        }

        serde_wasm_bindgen::to_value(&exports).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

fn to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
