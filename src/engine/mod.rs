//! De transform-engine: een voorgealloceerd vlak geheugen met pure
//! conversie-, synthese- en compositiefuncties daaroverheen.

pub mod compose;
pub mod matrix;
pub mod memory;
pub mod synthesis;
pub mod units;
pub mod viewport;

pub use matrix::Mat4;
pub use memory::{EngineMemory, LayoutError, MemoryLayout};
pub use synthesis::TransformKind;
pub use units::Unit;
pub use viewport::Viewport;
