//! # symbios-flora
//!
//! An engine-agnostic plant generator that turns L-System grammars into
//! GPU-ready triangle buffers using glam.
//!
//! The pipeline has three stages, each usable on its own:
//!
//! 1. [`Grammar`] rewrites an axiom for a number of iterations.
//! 2. [`TurtleInterpreter`] walks the rewritten string with a pose stack and
//!    produces a [`Skeleton`] of branches and tagged markers.
//! 3. [`BranchMeshBuilder`] and [`MarkerMeshBuilder`] instance pre-parsed
//!    [`BaseMesh`]es along the skeleton into merged [`MeshBuffers`].
//!
//! [`PlantScene`] chains the stages and owns all generation state.
//!
//! ```
//! use symbios_flora::{Grammar, Rule, TurtleInterpreter};
//!
//! let grammar = Grammar::load(vec![Rule::new('R', "FA")]).unwrap();
//! let symbols = grammar.rewrite(1);
//! let skeleton = TurtleInterpreter::default().interpret(&symbols, 2.0, 22.5).unwrap();
//! assert_eq!(skeleton.branches.len(), 1);
//! ```

pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod mesh;
pub mod mesher;
pub mod presets;
pub mod scene;
pub mod skeleton;
pub mod turtle;

pub use error::*;
pub use grammar::*;
pub use interpreter::*;
pub use mesh::*;
pub use mesher::*;
pub use scene::*;
pub use skeleton::*;
pub use turtle::*;
