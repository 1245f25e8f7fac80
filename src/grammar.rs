//! Context-free L-System rewriting over single-character symbols.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Separator between the symbol and its replacement in textual rules.
const ARROW: &str = "->";

/// A production `symbol -> replacement`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub symbol: char,
    pub replacement: String,
}

impl Rule {
    pub fn new(symbol: char, replacement: impl Into<String>) -> Self {
        Self {
            symbol,
            replacement: replacement.into(),
        }
    }

    /// Parses a rule written as `"X -> replacement"`.
    ///
    /// Whitespace around both sides is ignored. The left side must be exactly one
    /// symbol; the replacement may be empty (an erasing rule).
    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let malformed = |reason| ConfigError::MalformedRule {
            rule: line.to_string(),
            reason,
        };

        let (lhs, rhs) = line.split_once(ARROW).ok_or(malformed("missing `->`"))?;
        let mut chars = lhs.trim().chars();
        let symbol = chars.next().ok_or(malformed("missing left-hand symbol"))?;
        if chars.next().is_some() {
            return Err(malformed("left-hand side must be a single symbol"));
        }

        Ok(Self::new(symbol, rhs.trim()))
    }
}

/// Serialized form of a [`Grammar`]: axiom, ordered rules and turtle defaults.
///
/// Deserializing a `Grammar` goes through [`Grammar::with_axiom`], so the same
/// [`ConfigError`] checks apply to config files as to code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrammarConfig {
    pub axiom: String,
    pub rules: Vec<Rule>,
    #[serde(default = "default_step")]
    pub default_step: f32,
    #[serde(default = "default_angle")]
    pub default_angle: f32,
}

fn default_step() -> f32 {
    1.0
}

fn default_angle() -> f32 {
    25.0
}

impl TryFrom<GrammarConfig> for Grammar {
    type Error = ConfigError;

    fn try_from(config: GrammarConfig) -> Result<Self, Self::Error> {
        Ok(Self::with_axiom(config.axiom, config.rules)?
            .with_defaults(config.default_step, config.default_angle))
    }
}

/// Rule set, axiom and the turtle defaults that travel with a grammar.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "GrammarConfig")]
pub struct Grammar {
    axiom: String,
    rules: HashMap<char, String>,
    /// Step length handed to the turtle for each forward symbol.
    default_step: f32,
    /// Turn angle in degrees handed to the turtle for each rotation symbol.
    default_angle: f32,
    /// Result of the last [`process`](Self::process) call.
    current: String,
}

impl Grammar {
    /// Builds a grammar whose axiom is the first rule's left-hand symbol.
    pub fn load(rules: Vec<Rule>) -> Result<Self, ConfigError> {
        let axiom = rules
            .first()
            .map(|r| r.symbol.to_string())
            .ok_or(ConfigError::EmptyRuleSet)?;
        Self::with_axiom(axiom, rules)
    }

    /// Builds a grammar with an explicit axiom string.
    ///
    /// Later rules for the same symbol replace earlier ones.
    pub fn with_axiom(axiom: impl Into<String>, rules: Vec<Rule>) -> Result<Self, ConfigError> {
        let axiom = axiom.into();
        if axiom.is_empty() {
            return Err(ConfigError::MissingAxiom);
        }
        if rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet);
        }

        let mut map = HashMap::with_capacity(rules.len());
        for rule in rules {
            if let Some(previous) = map.insert(rule.symbol, rule.replacement) {
                warn!(
                    symbol = %rule.symbol,
                    previous = %previous,
                    "duplicate rule replaces an earlier one"
                );
            }
        }

        Ok(Self {
            current: axiom.clone(),
            axiom,
            rules: map,
            default_step: default_step(),
            default_angle: default_angle(),
        })
    }

    /// Builds a grammar from a program listing: the first entry is the axiom,
    /// every following entry is a rule in `"X -> replacement"` form.
    ///
    /// ```
    /// use symbios_flora::Grammar;
    ///
    /// let g = Grammar::from_program(&["X", "X -> F[-X]F[-X]+F[X]", "F -> FF"]).unwrap();
    /// assert_eq!(g.rewrite(1), "F[-X]F[-X]+F[X]");
    /// ```
    pub fn from_program(lines: &[&str]) -> Result<Self, ConfigError> {
        let (axiom, rule_lines) = lines.split_first().ok_or(ConfigError::MissingAxiom)?;
        let rules = rule_lines
            .iter()
            .map(|line| Rule::parse(line))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_axiom(axiom.trim(), rules)
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    /// Replacement for `symbol`, or `None` when it is terminal.
    pub fn rule(&self, symbol: char) -> Option<&str> {
        self.rules.get(&symbol).map(String::as_str)
    }

    pub fn default_step(&self) -> f32 {
        self.default_step
    }

    pub fn default_angle(&self) -> f32 {
        self.default_angle
    }

    pub fn set_default_step(&mut self, step: f32) {
        self.default_step = step;
    }

    pub fn set_default_angle(&mut self, degrees: f32) {
        self.default_angle = degrees;
    }

    /// Builder form of [`set_default_step`](Self::set_default_step) and
    /// [`set_default_angle`](Self::set_default_angle).
    pub fn with_defaults(mut self, step: f32, angle_degrees: f32) -> Self {
        self.default_step = step;
        self.default_angle = angle_degrees;
        self
    }

    /// Runs `iterations` full rewriting passes starting from the axiom.
    ///
    /// Growth is exponential in the branching factor of the rules and there is no
    /// cycle detection; bounding `iterations` is the caller's job.
    pub fn rewrite(&self, iterations: u32) -> String {
        let mut current = self.axiom.clone();
        for _ in 0..iterations {
            current = self.step(&current);
        }
        current
    }

    /// Regenerates the current string from scratch and returns it.
    pub fn process(&mut self, iterations: u32) -> &str {
        self.current = self.rewrite(iterations);
        debug!(
            iterations,
            symbols = self.current.chars().count(),
            "grammar rewritten"
        );
        &self.current
    }

    /// The string produced by the last [`process`](Self::process) call (the axiom
    /// before the first call).
    pub fn current(&self) -> &str {
        &self.current
    }

    fn step(&self, input: &str) -> String {
        let mut next = String::with_capacity(input.len() * 2);
        for ch in input.chars() {
            match self.rules.get(&ch) {
                Some(replacement) => next.push_str(replacement),
                None => next.push(ch),
            }
        }
        next
    }
}
