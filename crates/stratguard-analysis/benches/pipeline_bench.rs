//! Pipeline throughput: validation alone, and full batches (sequential and
//! parallel) over a mix of clean, fixable and broken units.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stratguard_analysis::parsers::SourceParser;
use stratguard_analysis::pipeline::{PipelineOrchestrator, SourceInput};
use stratguard_analysis::validator::Validator;
use stratguard_core::StratguardConfig;

const CLEAN: &str = "\
import backtrader as bt

class SmaCross(bt.Strategy):
    params = (('fast', 10), ('slow', 30))

    def __init__(self):
        self.order = None
        fast = bt.indicators.SMA(period=self.p.fast)
        slow = bt.indicators.SMA(period=self.p.slow)
        self.crossover = bt.indicators.CrossOver(fast, slow)

    def notify_order(self, order):
        if order.status in [order.Completed, order.Canceled]:
            self.order = None

    def next(self):
        if self.order:
            return
        if not self.position:
            if self.crossover > 0:
                self.order = self.buy()
        elif self.crossover < 0:
            self.order = self.close()
";

const FIXABLE: &str = "\
import backtrader as bt

class Momentum(bt.Strategy):
    def __init__(self):
        self.roc = bt.indicators.ROC(period=12)

    def next(self):
        if self.order:
            return
        if self.roc > 0:
            self.order = self.buy()
";

const BROKEN: &str = "\
class Broken(bt.Strategy):
    def next(self):
        self.buy()
        elif self.position:
            self.sell()
";

fn make_batch(n: usize) -> Vec<SourceInput> {
    (0..n)
        .map(|i| {
            // Vary the text so the parse cache does not serve every unit.
            let body = match i % 3 {
                0 => CLEAN,
                1 => FIXABLE,
                _ => BROKEN,
            };
            SourceInput::new(format!("unit_{i}.py"), format!("{body}# unit {i}\n"))
        })
        .collect()
}

fn bench_validate(c: &mut Criterion) {
    let parser = SourceParser::without_cache();
    let validator = Validator::default();

    c.bench_function("validate_clean_strategy", |b| {
        b.iter(|| {
            let unit = parser.parse_unit("clean.py", black_box(CLEAN));
            black_box(validator.validate(&unit));
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let batch = make_batch(300);
    let sequential = PipelineOrchestrator::default();
    let mut config = StratguardConfig::default();
    config.pipeline.parallel = true;
    config.pipeline.recover_syntax_errors = true;
    let parallel = PipelineOrchestrator::new(&config);

    c.bench_function("pipeline_300_units_sequential", |b| {
        b.iter(|| black_box(sequential.process_batch(black_box(&batch))))
    });

    c.bench_function("pipeline_300_units_parallel_recover", |b| {
        b.iter(|| black_box(parallel.process_batch(black_box(&batch))))
    });
}

criterion_group!(benches, bench_validate, bench_batch);
criterion_main!(benches);
