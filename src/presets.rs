//! Ready-made plant grammars together with the step, angle and depth they were
//! tuned for.

use crate::error::ConfigError;
use crate::grammar::Grammar;
use crate::scene::PlantParams;

/// A grammar listing plus the parameters it looks right with.
#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub name: &'static str,
    /// Axiom first, then `"X -> replacement"` rules.
    pub program: &'static [&'static str],
    pub step: f32,
    pub angle: f32,
    pub iterations: u32,
}

impl Preset {
    pub fn grammar(&self) -> Result<Grammar, ConfigError> {
        Ok(Grammar::from_program(self.program)?.with_defaults(self.step, self.angle))
    }

    /// Parameters for this preset, keeping `seed`.
    pub fn params(&self, seed: u64) -> PlantParams {
        PlantParams {
            step: self.step,
            angle: self.angle,
            iterations: self.iterations,
            seed,
        }
    }
}

/// Flat fractal bush that branches into leaf markers.
pub const BUSH: Preset = Preset {
    name: "bush",
    program: &["X", "X -> F[-X]F[-X]+F[X]", "F -> FF"],
    step: 1.0,
    angle: 30.0,
    iterations: 2,
};

/// Three-way whorled blossom tree with flower markers on every tip.
pub const BLOSSOM: Preset = Preset {
    name: "blossom",
    program: &[
        "R",
        "R -> FA",
        "A -> [&FL!A]/////[&FL!A]///////[&FL!A]",
        "F -> LS//L//F",
        "S -> FL",
        "L -> [∧∧{-f+f+f-|-f+f+f}]",
    ],
    step: 2.0,
    angle: 22.5,
    iterations: 7,
};

/// Bushy shrub whose `D` clusters end in leaf markers.
pub const SHRUB: Preset = Preset {
    name: "shrub",
    program: &[
        "A",
        "A -> B+[A+E]--//[--D]B[++D]-[AE]++AE",
        "B -> FC[//&&D][//^^D]FC",
        "C -> CFC",
        "D -> [X]",
        "E -> [&&&G/H////H////H////H////H]",
        "G -> FF",
        "H -> [^F][Y]",
    ],
    step: 2.0,
    angle: 18.0,
    iterations: 5,
};

pub const ALL: [Preset; 3] = [BUSH, BLOSSOM, SHRUB];

/// Looks a preset up by name.
pub fn by_name(name: &str) -> Option<Preset> {
    ALL.into_iter().find(|p| p.name == name)
}
