//! FixerRegistry: ordered generators, first claimant wins.

use serde::{Deserialize, Serialize};

use stratguard_core::config::{FixerConfig, ValidatorConfig};
use stratguard_core::FxHashSet;

use crate::issues::Issue;

use super::generators::{
    CallbackRelocationFixer, FieldInitFixer, GuardCheckFixer, IndentationRealignFixer,
    OrphanedBranchFixer, UndefinedVariableFixer,
};
use super::traits::FixGenerator;
use super::types::{Fix, FixGenerationFailure};

/// Output of one generation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixProposals {
    pub fixes: Vec<Fix>,
    pub failures: Vec<FixGenerationFailure>,
}

/// Generators in priority order. The order decides which generator gets the
/// single attempt at an issue several of them could claim.
pub struct FixerRegistry {
    generators: Vec<Box<dyn FixGenerator>>,
    disabled: FxHashSet<String>,
}

impl FixerRegistry {
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
            disabled: FxHashSet::default(),
        }
    }

    /// Append a generator at the lowest priority.
    pub fn register(&mut self, generator: Box<dyn FixGenerator>) {
        self.generators.push(generator);
    }

    pub fn disable(&mut self, id: &str) {
        self.disabled.insert(id.to_string());
    }

    pub fn enable(&mut self, id: &str) {
        self.disabled.remove(id);
    }

    pub fn count(&self) -> usize {
        self.generators.len()
    }

    /// Ids in priority order.
    pub fn ids(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.id()).collect()
    }

    /// Ask the first enabled generator that claims `issue` for a fix.
    pub fn generate(&self, issue: &Issue, lines: &[String]) -> Result<Fix, FixGenerationFailure> {
        let Some(generator) = self
            .generators
            .iter()
            .filter(|g| !self.disabled.contains(g.id()))
            .find(|g| g.claims(issue, lines))
        else {
            return Err(FixGenerationFailure {
                issue: issue.clone(),
                generator: None,
                reason: format!("no generator handles `{}`", issue.category),
            });
        };

        let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            generator.generate(issue, lines)
        }));
        match attempt {
            Ok(Some(fix)) => {
                tracing::debug!(
                    generator = generator.id(),
                    line = fix.line,
                    fix_type = %fix.fix_type,
                    confidence = fix.confidence,
                    "fix proposed"
                );
                Ok(fix.from_generator(generator.id()))
            }
            Ok(None) => {
                tracing::debug!(generator = generator.id(), line = issue.line, "no fix available");
                Err(FixGenerationFailure {
                    issue: issue.clone(),
                    generator: Some(generator.id().to_string()),
                    reason: "no fix available".to_string(),
                })
            }
            Err(_) => {
                tracing::error!(generator = generator.id(), line = issue.line, "fix generator panicked");
                Err(FixGenerationFailure {
                    issue: issue.clone(),
                    generator: Some(generator.id().to_string()),
                    reason: "generator panicked".to_string(),
                })
            }
        }
    }

    /// One pass over `issues`, in order.
    pub fn generate_all(&self, issues: &[Issue], lines: &[String]) -> FixProposals {
        let mut proposals = FixProposals::default();
        for issue in issues {
            match self.generate(issue, lines) {
                Ok(fix) => proposals.fixes.push(fix),
                Err(failure) => proposals.failures.push(failure),
            }
        }
        proposals
    }
}

impl Default for FixerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in generators in their fixed priority order.
pub fn create_default_fixers(fixer: &FixerConfig, validator: &ValidatorConfig) -> FixerRegistry {
    let mut registry = FixerRegistry::new();
    registry.register(Box::new(CallbackRelocationFixer::new(fixer)));
    registry.register(Box::new(OrphanedBranchFixer::new(fixer)));
    registry.register(Box::new(IndentationRealignFixer::new(fixer, validator)));
    registry.register(Box::new(FieldInitFixer::new(fixer, validator)));
    registry.register(Box::new(GuardCheckFixer::new(fixer, validator)));
    registry.register(Box::new(UndefinedVariableFixer::new(fixer)));

    for id in &fixer.disabled_generators {
        registry.disable(id);
    }
    registry
}
