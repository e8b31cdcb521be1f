//! DetectorRegistry: register, enable/disable, run in registration order.

use stratguard_core::config::ValidatorConfig;
use stratguard_core::FxHashSet;

use crate::issues::Issue;

use super::context::DetectionContext;
use super::traits::{DetectionMode, Detector};

/// Ordered set of detectors. Registration order is report order.
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
    disabled: FxHashSet<String>,
}

impl DetectorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            disabled: FxHashSet::default(),
        }
    }

    /// Register a detector.
    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Disable a specific detector by ID.
    pub fn disable(&mut self, id: &str) {
        self.disabled.insert(id.to_string());
    }

    /// Enable a previously disabled detector.
    pub fn enable(&mut self, id: &str) {
        self.disabled.remove(id);
    }

    /// Run every enabled detector.
    pub fn run_all(&self, ctx: &DetectionContext) -> Vec<Issue> {
        self.run_filtered(ctx, |_| true)
    }

    /// Run only detectors of the given mode.
    pub fn run_mode(&self, mode: DetectionMode, ctx: &DetectionContext) -> Vec<Issue> {
        self.run_filtered(ctx, |d| d.mode() == mode)
    }

    fn run_filtered(&self, ctx: &DetectionContext, keep: impl Fn(&dyn Detector) -> bool) -> Vec<Issue> {
        let mut issues = Vec::new();
        for detector in &self.detectors {
            if !self.should_run(detector.as_ref()) || !keep(detector.as_ref()) {
                continue;
            }
            if detector.mode() == DetectionMode::Tree && ctx.tree().is_none() {
                continue;
            }
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                detector.detect(ctx)
            }));
            match result {
                Ok(found) => {
                    tracing::debug!(
                        detector_id = detector.id(),
                        unit = ctx.unit.name(),
                        count = found.len(),
                        "detector finished"
                    );
                    issues.extend(found);
                }
                Err(_) => {
                    tracing::error!(
                        detector_id = detector.id(),
                        unit = ctx.unit.name(),
                        "detector panicked during detection"
                    );
                }
            }
        }
        issues
    }

    /// Total number of registered detectors.
    pub fn count(&self) -> usize {
        self.detectors.len()
    }

    /// Number of enabled detectors.
    pub fn enabled_count(&self) -> usize {
        self.detectors
            .iter()
            .filter(|d| self.should_run(d.as_ref()))
            .count()
    }

    /// Ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.id()).collect()
    }

    fn should_run(&self, detector: &dyn Detector) -> bool {
        !self.disabled.contains(detector.id())
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry with every built-in detector, honoring the config's
/// disabled list.
pub fn create_default_registry(config: &ValidatorConfig) -> DetectorRegistry {
    let mut registry = DetectorRegistry::new();

    // Text-level structure first: these are the fatal defects.
    registry.register(Box::new(super::orphaned_branch::OrphanedBranchDetector));
    registry.register(Box::new(super::indentation::IndentationMismatchDetector));

    // Tree-level strategy shape.
    registry.register(Box::new(super::required_methods::RequiredMethodDetector));
    registry.register(Box::new(super::field_init::FieldInitDetector));
    registry.register(Box::new(super::guard_check::GuardCheckDetector));
    registry.register(Box::new(super::variables::VariableReferenceDetector));

    for id in &config.disabled_detectors {
        registry.disable(id);
    }
    registry
}
