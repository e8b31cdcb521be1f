//! Detector tests: each defect category, registry enable/disable, panic
//! safety and the syntax-error gate.

use stratguard_analysis::detectors::{
    create_default_registry, DetectionContext, DetectionMode, Detector, DetectorRegistry,
};
use stratguard_analysis::issues::{Issue, IssueCategory};
use stratguard_analysis::parsers::SourceUnit;
use stratguard_analysis::validator::Validator;
use stratguard_core::config::ValidatorConfig;
use stratguard_core::Severity;

// ---- Helpers ----

fn unit(src: &str) -> SourceUnit {
    SourceUnit::parse("strategy.py", src).unwrap()
}

fn validate(src: &str) -> Vec<Issue> {
    Validator::default().validate(&unit(src))
}

fn of(issues: &[Issue], category: IssueCategory) -> Vec<&Issue> {
    issues.iter().filter(|i| i.category == category).collect()
}

const CLEAN: &str = r#"import backtrader as bt


class SmaCross(bt.Strategy):
    params = (("period", 20),)

    def __init__(self):
        self.order = None
        self.sma = bt.indicators.SMA(self.data, period=self.p.period)

    def notify_order(self, order):
        if order.status in [order.Completed]:
            self.order = None

    def next(self):
        if self.order:
            return
        if self.data.close[0] > self.sma[0]:
            self.order = self.buy()
        elif self.position:
            self.order = self.sell()
"#;

// ---- Clean input ----

#[test]
fn clean_strategy_has_no_issues() {
    assert!(validate(CLEAN).is_empty());
}

#[test]
fn validating_clean_input_twice_is_identical() {
    let first = validate(CLEAN);
    let second = validate(CLEAN);
    assert!(first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn empty_input_is_valid_and_clean() {
    let empty = unit("");
    assert!(empty.is_valid());
    assert_eq!(empty.line_count(), 0);
    assert!(Validator::default().validate(&empty).is_empty());
}

// ---- Syntax errors ----

#[test]
fn syntax_error_yields_single_critical_issue() {
    let issues = validate("class S(Strategy):\n    def next(self)\n        pass\n");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].category, IssueCategory::SyntaxError);
    assert_eq!(issues[0].severity, Severity::Critical);
    assert!(issues[0].line >= 1 && issues[0].line <= 3);
}

// ---- Orphaned branches ----

#[test]
fn orphaned_elif_is_reported_at_its_line() {
    let src = "def init(self):\n    self.x = 1\n    elif self.x > 0:\n        pass\n";
    let unit = unit(src);
    assert!(!unit.is_valid());

    let issues = Validator::default().validate_text_only(&unit);
    let orphans = of(&issues, IssueCategory::OrphanedBranch);
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].severity, Severity::Critical);
    assert_eq!(orphans[0].line, 3);
    assert_eq!(orphans[0].snippet.as_deref(), Some("elif self.x > 0:"));
}

#[test]
fn branch_continuing_across_method_boundary() {
    let src = "\
class S(bt.Strategy):
    def next(self):
        if self.order:
            return
    def notify_order(self, order):
        elif order.status in [order.Completed]:
            self.order = None
";
    let issues = Validator::default().validate_text_only(&unit(src));
    let confused = of(&issues, IssueCategory::MethodBoundaryConfusion);
    assert_eq!(confused.len(), 1);
    assert_eq!(confused[0].line, 6);
    assert!(confused[0].message.contains("line 3"));
    assert!(of(&issues, IssueCategory::OrphanedBranch).is_empty());
}

#[test]
fn misaligned_else_is_indentation_mismatch() {
    let src = "\
class S(bt.Strategy):
    def next(self):
        if self.order:
            return
          else:
            self.buy()
";
    let issues = Validator::default().validate_text_only(&unit(src));
    let mismatched = of(&issues, IssueCategory::IndentationMismatch);
    assert_eq!(mismatched.len(), 1);
    assert_eq!(mismatched[0].severity, Severity::High);
    assert_eq!(mismatched[0].line, 5);
    assert!(of(&issues, IssueCategory::OrphanedBranch).is_empty());
}

#[test]
fn for_else_and_try_else_are_not_orphans() {
    let src = "\
def scan(xs):
    for x in xs:
        if x:
            break
    else:
        x = None
    try:
        y = int(x)
    except ValueError:
        y = 0
    else:
        y += 1
    return y
";
    assert!(validate(src).is_empty());
}

// ---- Strategy shape ----

#[test]
fn missing_step_hook_is_high_issue_naming_method() {
    let src = "\
from backtrader import Strategy

class OnlyInit(Strategy):
    def __init__(self):
        self.order = None
";
    let issues = validate(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].category, IssueCategory::MissingRequiredMethod);
    assert_eq!(issues[0].severity, Severity::High);
    assert_eq!(issues[0].line, 3);
    assert!(issues[0].message.contains("`next`"));
}

#[test]
fn inherited_methods_satisfy_requirements() {
    let src = "\
import backtrader as bt

class Base(bt.Strategy):
    def __init__(self):
        self.order = None

    def next(self):
        if self.order:
            return

class Child(Base):
    pass
";
    assert!(validate(src).is_empty());
}

#[test]
fn non_strategy_classes_are_ignored() {
    let src = "class Helper:\n    def run(self):\n        return 1\n";
    assert!(validate(src).is_empty());
}

#[test]
fn missing_field_init_is_medium_at_initializer() {
    let src = "\
import backtrader as bt

class S(bt.Strategy):
    def __init__(self):
        self.sma = bt.indicators.SMA(self.data, period=20)

    def next(self):
        if self.order:
            return
        self.order = self.buy()
";
    let issues = validate(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].category, IssueCategory::MissingFieldInit);
    assert_eq!(issues[0].severity, Severity::Medium);
    assert_eq!(issues[0].line, 4);
    assert_eq!(
        issues[0].suggestion.as_deref(),
        Some("add `self.order = None` to `__init__`")
    );
}

#[test]
fn initialized_field_clears_field_init_check() {
    let src = "\
import backtrader as bt

class Base(bt.Strategy):
    def __init__(self):
        self.order = None
        self.buyprice = None

    def next(self):
        if self.order:
            return

class Child(Base):
    def __init__(self):
        super().__init__()
        self.sma = bt.indicators.SMA(self.data, period=20)
";
    let issues = validate(src);
    assert!(of(&issues, IssueCategory::MissingFieldInit).is_empty(), "{issues:?}");
    assert!(issues.is_empty(), "{issues:?}");
}

#[test]
fn missing_guard_is_low_at_step_hook() {
    let src = "\
import backtrader as bt

class S(bt.Strategy):
    def __init__(self):
        self.order = None

    def next(self):
        if self.data.close[0] > 0:
            self.order = self.buy()
";
    let issues = validate(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].category, IssueCategory::MissingGuardCheck);
    assert_eq!(issues[0].severity, Severity::Low);
    assert_eq!(issues[0].line, 7);
}

#[test]
fn custom_pending_field_name_is_honored() {
    let config = ValidatorConfig {
        pending_order_field: "pending".to_string(),
        ..ValidatorConfig::default()
    };
    let src = "\
import backtrader as bt

class S(bt.Strategy):
    def __init__(self):
        self.pending = None

    def next(self):
        if self.pending:
            return
";
    let issues = Validator::new(config).validate(&unit(src));
    assert!(issues.is_empty(), "{issues:?}");
}

// ---- Undefined variables ----

#[test]
fn undefined_name_in_method_is_reported() {
    let src = "\
import backtrader as bt

class S(bt.Strategy):
    def __init__(self):
        self.order = None

    def next(self):
        if self.order:
            return
        if close_price > 0:
            self.buy()
";
    let issues = validate(src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].category, IssueCategory::UndefinedVariable);
    assert_eq!(issues[0].line, 10);
    assert!(issues[0].message.contains("`close_price`"));
}

#[test]
fn wildcard_import_disables_name_resolution() {
    let src = "from backtrader.indicators import *\n\nvalue = SMA(period=3)\n";
    assert!(of(&validate(src), IssueCategory::UndefinedVariable).is_empty());
}

#[test]
fn allowed_names_are_treated_as_defined() {
    let config = ValidatorConfig {
        allowed_names: vec!["data_feed".to_string()],
        ..ValidatorConfig::default()
    };
    let issues = Validator::new(config).validate(&unit("x = data_feed\n"));
    assert!(issues.is_empty());
}

// ---- Registry ----

#[test]
fn default_registry_order_and_disable() {
    let mut config = ValidatorConfig::default();
    let registry = create_default_registry(&config);
    assert_eq!(
        registry.ids(),
        vec![
            "orphaned-branch",
            "indentation-mismatch",
            "required-method",
            "field-init",
            "guard-check",
            "variable-reference",
        ]
    );

    config.disabled_detectors = vec!["required-method".to_string()];
    let registry = create_default_registry(&config);
    assert_eq!(registry.count(), 6);
    assert_eq!(registry.enabled_count(), 5);

    let src = "from backtrader import Strategy\n\nclass S(Strategy):\n    pass\n";
    let issues = Validator::with_registry(config, registry).validate(&unit(src));
    assert!(issues.is_empty());
}

struct PanickingDetector;

impl Detector for PanickingDetector {
    fn id(&self) -> &str {
        "panicking"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::Custom("panicking".to_string())
    }

    fn mode(&self) -> DetectionMode {
        DetectionMode::Text
    }

    fn detect(&self, _ctx: &DetectionContext) -> Vec<Issue> {
        panic!("detector bug");
    }
}

struct FixedIssueDetector;

impl Detector for FixedIssueDetector {
    fn id(&self) -> &str {
        "fixed-issue"
    }

    fn category(&self) -> IssueCategory {
        IssueCategory::Custom("style".to_string())
    }

    fn mode(&self) -> DetectionMode {
        DetectionMode::Text
    }

    fn detect(&self, _ctx: &DetectionContext) -> Vec<Issue> {
        vec![Issue::new(Severity::Low, self.category(), 99, "always")]
    }
}

#[test]
fn panicking_detector_does_not_abort_validation() {
    let mut registry = DetectorRegistry::new();
    registry.register(Box::new(PanickingDetector));
    registry.register(Box::new(FixedIssueDetector));
    let validator = Validator::with_registry(ValidatorConfig::default(), registry);

    let issues = validator.validate(&unit("x = 1\ny = 2\n"));
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].category, IssueCategory::Custom("style".to_string()));
    // Out-of-range lines are clamped into the unit.
    assert_eq!(issues[0].line, 2);
}

#[test]
fn report_counts_serialize_as_json() {
    let src = "\
from backtrader import Strategy

class S(Strategy):
    def __init__(self):
        pass
";
    let issues = validate(src);
    let report = Validator::report(&issues);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["total_issues"], issues.len());
    assert_eq!(json["by_severity"]["HIGH"], 1);
    assert_eq!(json["by_severity"]["MEDIUM"], 1);
    assert_eq!(json["by_category"]["missing-required-method"], 1);
    assert_eq!(json["issues"][0]["category"], "missing-required-method");
}
