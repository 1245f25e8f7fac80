//! Scene driver running grammar → turtle → mesh synthesis as one pass.
//!
//! [`PlantScene`] owns every piece of generation state explicitly; nothing is
//! kept in globals. Each [`regenerate`](PlantScene::regenerate) discards the
//! previous [`PlantGeometry`] and rebuilds it from scratch.

use crate::error::{AssetError, ConfigError, FloraError};
use crate::grammar::Grammar;
use crate::interpreter::TurtleInterpreter;
use crate::mesh::{BaseMesh, MeshBuffers};
use crate::mesher::{BranchMeshBuilder, MarkerMeshBuilder};
use crate::skeleton::Skeleton;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Deepest rewrite the driver accepts; string length grows exponentially with it.
pub const MAX_ITERATIONS: u32 = 8;

/// User-facing generation parameters, as a GUI or config file would supply them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParams {
    /// Distance covered per forward symbol. Must be positive.
    pub step: f32,
    /// Turn angle in degrees.
    pub angle: f32,
    /// Number of rewriting passes, `0..=MAX_ITERATIONS`.
    pub iterations: u32,
    /// Seed for marker thinning and rotation.
    pub seed: u64,
}

impl Default for PlantParams {
    fn default() -> Self {
        Self {
            step: 2.0,
            angle: 22.5,
            iterations: 7,
            seed: 0,
        }
    }
}

impl PlantParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "step",
                reason: format!("must be a positive finite number, got {}", self.step),
            });
        }
        if !self.angle.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "angle",
                reason: format!("must be finite, got {}", self.angle),
            });
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::InvalidParameter {
                name: "iterations",
                reason: format!("must be at most {MAX_ITERATIONS}, got {}", self.iterations),
            });
        }
        Ok(())
    }
}

/// Output of one generation pass.
///
/// The two bakes fail independently: a broken flower asset leaves the branch
/// buffers intact. The rewritten string itself stays in the scene's grammar,
/// see [`Grammar::current`].
#[derive(Clone, Debug)]
pub struct PlantGeometry {
    pub skeleton: Skeleton,
    pub branches: Result<MeshBuffers, AssetError>,
    pub markers: Result<MeshBuffers, AssetError>,
}

/// Explicit context for the whole pipeline.
#[derive(Clone, Debug)]
pub struct PlantScene {
    grammar: Grammar,
    interpreter: TurtleInterpreter,
    branch_builder: BranchMeshBuilder,
    marker_builder: MarkerMeshBuilder,
    branch_mesh: Option<BaseMesh>,
    marker_mesh: Option<BaseMesh>,
    params: PlantParams,
    geometry: Option<PlantGeometry>,
}

impl PlantScene {
    /// Starts a scene whose parameters come from the grammar's defaults.
    pub fn new(grammar: Grammar) -> Self {
        let params = PlantParams {
            step: grammar.default_step(),
            angle: grammar.default_angle(),
            ..Default::default()
        };
        Self {
            grammar,
            interpreter: TurtleInterpreter::default(),
            branch_builder: BranchMeshBuilder::default(),
            marker_builder: MarkerMeshBuilder::default(),
            branch_mesh: None,
            marker_mesh: None,
            params,
            geometry: None,
        }
    }

    pub fn with_interpreter(mut self, interpreter: TurtleInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_branch_builder(mut self, builder: BranchMeshBuilder) -> Self {
        self.branch_builder = builder;
        self
    }

    pub fn with_marker_builder(mut self, builder: MarkerMeshBuilder) -> Self {
        self.marker_builder = builder;
        self
    }

    /// Base mesh instanced along every branch.
    pub fn with_branch_mesh(mut self, mesh: BaseMesh) -> Self {
        self.branch_mesh = Some(mesh);
        self
    }

    /// Base mesh instanced at the kept markers.
    pub fn with_marker_mesh(mut self, mesh: BaseMesh) -> Self {
        self.marker_mesh = Some(mesh);
        self
    }

    pub fn with_params(mut self, params: PlantParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &PlantParams {
        &self.params
    }

    /// Takes effect on the next [`regenerate`](Self::regenerate).
    pub fn set_params(&mut self, params: PlantParams) {
        self.params = params;
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Last successful generation, if any.
    pub fn geometry(&self) -> Option<&PlantGeometry> {
        self.geometry.as_ref()
    }

    /// Runs the full pipeline with the current parameters.
    ///
    /// Config and interpreter errors abort the pass and leave no geometry behind.
    /// Asset problems only affect the bake that hit them and are reported inside
    /// the returned [`PlantGeometry`].
    pub fn regenerate(&mut self) -> Result<&PlantGeometry, FloraError> {
        self.geometry = None;
        self.params.validate()?;

        self.grammar.set_default_step(self.params.step);
        self.grammar.set_default_angle(self.params.angle);
        let symbols = self.grammar.process(self.params.iterations);
        let symbol_count = symbols.len();

        let skeleton = self
            .interpreter
            .interpret(symbols, self.params.step, self.params.angle)?;

        let branches = self
            .branch_mesh
            .as_ref()
            .ok_or(AssetError::NotLoaded("branch"))
            .map(|mesh| self.branch_builder.build(&skeleton.branches, mesh));

        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let markers = self
            .marker_mesh
            .as_ref()
            .ok_or(AssetError::NotLoaded("marker"))
            .map(|mesh| self.marker_builder.build(&skeleton.markers, mesh, &mut rng));

        debug!(
            symbols = symbol_count,
            branches = skeleton.branches.len(),
            markers = skeleton.markers.len(),
            seed = self.params.seed,
            "plant regenerated"
        );

        Ok(&*self.geometry.insert(PlantGeometry {
            skeleton,
            branches,
            markers,
        }))
    }
}
