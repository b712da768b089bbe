//! Reference resolution between variables.
//!
//! A string value may refer to another variable with `$(Name)`:
//!
//! ```yaml
//! registry: ghcr.io/acme
//! image: $(registry)/app:$(version)
//! version: 1.4.0
//! ```
//!
//! Substitution runs in passes over the whole mapping until a pass changes
//! nothing or [`MAX_PASSES`] is reached. References to names that do not
//! exist are kept as written, and so are references still pending when the
//! pass budget runs out (e.g. cycles).

use pipevars_core::{FlatMapping, Value};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;

/// Default upper bound on substitution passes.
pub const MAX_PASSES: usize = 10;

// Regex for matching $(...) references
static REF_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\(([^)]+)\)").unwrap());

/// Result of a resolver run.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The mapping with references substituted.
    pub mapping: FlatMapping,
    /// Number of passes executed, including the final unchanged one.
    pub passes: usize,
    /// Whether a fixed point was reached within the pass budget.
    pub converged: bool,
}

/// Bounded fixed-point substitution of `$(Name)` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    max_passes: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            max_passes: MAX_PASSES,
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the pass budget. At least one pass always runs.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Resolve references in `mapping`.
    ///
    /// Entries are visited in order and each sees the values already
    /// rewritten earlier in the same pass.
    pub fn resolve(&self, mut mapping: FlatMapping) -> Resolution {
        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_passes {
            passes += 1;
            if !substitute_pass(&mut mapping) {
                converged = true;
                break;
            }
        }

        if converged {
            debug!(passes, "References resolved");
        } else {
            debug!(passes, "Reference resolution stopped at pass limit");
        }

        Resolution {
            mapping,
            passes,
            converged,
        }
    }
}

/// Resolve with the default pass budget.
pub fn resolve_references(mapping: FlatMapping) -> FlatMapping {
    Resolver::default().resolve(mapping).mapping
}

/// Names still referenced by a `$(Name)` placeholder, in order of first use.
pub fn unresolved_references(mapping: &FlatMapping) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for value in mapping.values().filter_map(Value::as_str) {
        for caps in REF_REGEX.captures_iter(value) {
            let name = &caps[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Run one pass over every string entry. Returns whether anything changed.
fn substitute_pass(mapping: &mut FlatMapping) -> bool {
    let mut changed = false;

    for index in 0..mapping.len() {
        let updated = match &mapping[index] {
            Value::String(current) => match substitute(current, mapping) {
                Cow::Owned(new_value) if new_value != *current => Some(new_value),
                _ => None,
            },
            _ => None,
        };

        if let Some(new_value) = updated {
            mapping[index] = Value::String(new_value);
            changed = true;
        }
    }

    changed
}

/// Replace every placeholder in `input` at once from the current mapping.
fn substitute<'a>(input: &'a str, mapping: &FlatMapping) -> Cow<'a, str> {
    REF_REGEX.replace_all(input, |caps: &Captures| match mapping.get(&caps[1]) {
        Some(value) => value.to_env_string(),
        None => caps[0].to_string(),
    })
}
