pub mod active;
pub mod constants;
pub mod ease;
pub mod error;
pub mod hide;
pub mod host;
pub mod interp;
pub mod orchestrator;
pub mod pin;
pub mod presets;
pub mod progress;
pub mod reveal;
pub mod runtime;
pub mod style;
pub mod trigger;
pub mod window;

pub use active::*;
pub use ease::Ease;
pub use error::{ChoreoError, Result};
pub use hide::ScrollHide;
pub use host::*;
pub use interp::{Property, Rgba, Track, Value};
pub use orchestrator::*;
pub use pin::*;
pub use progress::*;
pub use reveal::{Reveal, RevealConfig};
pub use style::{compose, Declarations, StyleDecl};
pub use trigger::*;
pub use window::*;
