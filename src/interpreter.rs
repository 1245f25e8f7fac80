//! Interpreter that converts a rewritten symbol string into a [`Skeleton`].
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`TurtleConfig`],
//! register symbol-to-operation mappings via [`TurtleInterpreter::set_op`] or
//! [`TurtleInterpreter::populate_standard_symbols`], then call
//! [`TurtleInterpreter::interpret`] with the output of
//! [`Grammar::rewrite`](crate::grammar::Grammar::rewrite).

use crate::error::InterpreterError;
use crate::skeleton::{Branch, GeometryMarker, Skeleton};
use crate::turtle::{TurtleOp, TurtlePose};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::PI;
use tracing::debug;

/// Tag of the flower marker (`!`).
pub const FLOWER_TAG: char = '!';
/// Tag of the leaf marker (`X`).
pub const LEAF_TAG: char = 'X';

/// Configuration for turtle interpretation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
    /// Reject strings that leave pushes open at the end.
    pub require_balanced: bool,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: 1024,
            require_balanced: true,
        }
    }
}

/// Walks symbol strings with a pose stack and records branches and markers.
#[derive(Clone, Debug)]
pub struct TurtleInterpreter {
    op_map: HashMap<char, TurtleOp>,
    config: TurtleConfig,
}

impl Default for TurtleInterpreter {
    /// An interpreter with the default config and the standard symbol table.
    fn default() -> Self {
        let mut interpreter = Self::new(TurtleConfig::default());
        interpreter.populate_standard_symbols();
        interpreter
    }
}

impl TurtleInterpreter {
    /// Creates a new interpreter with the given configuration and an empty symbol map.
    ///
    /// Register operations with [`set_op`](Self::set_op) or
    /// [`populate_standard_symbols`](Self::populate_standard_symbols) before calling
    /// [`interpret`](Self::interpret).
    pub fn new(config: TurtleConfig) -> Self {
        Self {
            op_map: HashMap::new(),
            config,
        }
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    pub fn with_map(mut self, map: HashMap<char, TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol, replacing any previous mapping.
    pub fn set_op(&mut self, symbol: char, op: TurtleOp) {
        self.op_map.insert(symbol, op);
    }

    /// The operation `symbol` resolves to; unmapped symbols are [`TurtleOp::Ignore`].
    pub fn op(&self, symbol: char) -> TurtleOp {
        self.op_map.get(&symbol).copied().unwrap_or(TurtleOp::Ignore)
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    /// Registers the conventional plant symbols.
    ///
    /// | Symbol | Operation |
    /// |---|---|
    /// | `F` | draw forward |
    /// | `f` | move forward |
    /// | `+` `-` | yaw ± |
    /// | `&` `^` `∧` | pitch + / − / − |
    /// | `\` `/` | roll ± |
    /// | `\|` | turn around |
    /// | `[` `]` | push / pop |
    /// | `!` | flower marker |
    /// | `X` | leaf marker |
    pub fn populate_standard_symbols(&mut self) {
        let mappings = [
            // Spatial
            ('F', TurtleOp::Draw),
            ('f', TurtleOp::Move),
            ('+', TurtleOp::Yaw(1.0)),
            ('-', TurtleOp::Yaw(-1.0)),
            ('&', TurtleOp::Pitch(1.0)),
            ('^', TurtleOp::Pitch(-1.0)),
            ('∧', TurtleOp::Pitch(-1.0)), // Logical-and glyph some grammars use for `^`
            ('\\', TurtleOp::Roll(1.0)),
            ('/', TurtleOp::Roll(-1.0)),
            ('|', TurtleOp::TurnAround),
            // Markers
            (FLOWER_TAG, TurtleOp::Marker(FLOWER_TAG)),
            (LEAF_TAG, TurtleOp::Marker(LEAF_TAG)),
            // Flow
            ('[', TurtleOp::Push),
            (']', TurtleOp::Pop),
        ];

        for (sym, op) in mappings {
            self.set_op(sym, op);
        }
    }

    /// Resolves every symbol of `symbols` to its operation once, up front.
    pub fn compile(&self, symbols: &str) -> Vec<TurtleOp> {
        symbols.chars().map(|c| self.op(c)).collect()
    }

    /// Interprets `symbols` and returns the resulting [`Skeleton`].
    ///
    /// The turtle starts at the world origin facing `+Z` with `+Y` up. `step` is
    /// the distance covered by each forward op and `angle_degrees` the magnitude
    /// of each rotation op.
    ///
    /// # Push / Pop
    ///
    /// `[` saves the full pose onto a stack and `]` restores it exactly. A pop on
    /// an empty stack, a push past `max_stack_depth` and (with `require_balanced`)
    /// pushes left open at the end abort the whole run.
    pub fn interpret(
        &self,
        symbols: &str,
        step: f32,
        angle_degrees: f32,
    ) -> Result<Skeleton, InterpreterError> {
        self.run(&self.compile(symbols), step, angle_degrees)
    }

    /// Executes an already compiled program.
    pub fn run(
        &self,
        program: &[TurtleOp],
        step: f32,
        angle_degrees: f32,
    ) -> Result<Skeleton, InterpreterError> {
        let angle = angle_degrees.to_radians();
        let mut skeleton = Skeleton::new();
        let mut turtle = TurtlePose::default();
        let mut stack: Vec<TurtlePose> = Vec::new();

        for (index, op) in program.iter().enumerate() {
            match *op {
                // --- SPATIAL ---
                TurtleOp::Draw => {
                    let start = turtle.position;
                    turtle.advance(step);
                    skeleton.add_branch(Branch::new(start, turtle.position));
                }
                TurtleOp::Move => turtle.advance(step),
                TurtleOp::Yaw(s) => turtle.yaw(angle * s),
                TurtleOp::Pitch(s) => turtle.pitch(angle * s),
                TurtleOp::Roll(s) => turtle.roll(angle * s),
                TurtleOp::TurnAround => turtle.yaw(PI),

                // --- GEOMETRY ---
                TurtleOp::Marker(tag) => skeleton.add_marker(GeometryMarker {
                    tag,
                    position: turtle.position,
                }),

                // --- FLOW ---
                TurtleOp::Push => {
                    if stack.len() >= self.config.max_stack_depth {
                        return Err(InterpreterError::StackOverflow {
                            index,
                            max_depth: self.config.max_stack_depth,
                        });
                    }
                    stack.push(turtle);
                }
                TurtleOp::Pop => {
                    turtle = stack
                        .pop()
                        .ok_or(InterpreterError::UnmatchedPop { index })?;
                }
                TurtleOp::Ignore => {}
            }
        }

        if self.config.require_balanced && !stack.is_empty() {
            return Err(InterpreterError::UnclosedPush { open: stack.len() });
        }

        debug!(
            ops = program.len(),
            branches = skeleton.branches.len(),
            markers = skeleton.markers.len(),
            "turtle interpretation finished"
        );
        Ok(skeleton)
    }
}
