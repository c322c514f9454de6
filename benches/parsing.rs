//! Performance benchmarks for alertmark
//!
//! Run with: cargo bench

use alertmark::Pipeline;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

mod samples {
    pub const SMALL: &str = r#":::info
This is a paragraph with *emphasis* and **strong** text.
:::
"#;

    pub const MEDIUM: &str = r#"# Release notes

:::warning Breaking changes
- The `parse` entry point now returns a **document**
- Options are passed by value

See [the guide](https://example.com/guide "Guide") for details.
:::

:::spoiler What changed internally
> The renderer keeps a stack of open alerts.

```rust
fn main() {
    println!("{}", alertmark::to_html(":::info\nhi\n:::"));
}
```
:::

:::success
Everything else is unchanged.
:::
"#;

    /// Repeat the medium document.
    pub fn large() -> String {
        MEDIUM.repeat(50)
    }

    /// Many alert openers without closers, each implicitly closed by the next.
    pub fn unterminated() -> String {
        ":::info\ntext\n\n".repeat(500)
    }

    /// Alerts inside deeply nested blockquotes.
    pub fn nested() -> String {
        "> ".repeat(100) + ":::danger\ndeep\n"
    }

    /// Many potential emphasis openers and closers inside one alert.
    pub fn emphasis() -> String {
        ":::info\n".to_string() + &"*a ".repeat(1000) + &"b* ".repeat(1000) + "\n:::\n"
    }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.throughput(Throughput::Bytes(samples::SMALL.len() as u64));
    group.bench_function("small", |b| {
        b.iter(|| alertmark::to_html(black_box(samples::SMALL)))
    });

    group.throughput(Throughput::Bytes(samples::MEDIUM.len() as u64));
    group.bench_function("medium", |b| {
        b.iter(|| alertmark::to_html(black_box(samples::MEDIUM)))
    });

    let large = samples::large();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large", |b| {
        b.iter(|| alertmark::to_html(black_box(&large)))
    });

    group.finish();
}

fn bench_pipeline_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_reuse");
    let input = samples::MEDIUM;
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("fresh_pipeline", |b| {
        b.iter(|| alertmark::to_html(black_box(input)))
    });

    let pipeline = Pipeline::default();
    group.bench_function("shared_pipeline", |b| {
        b.iter(|| pipeline.to_html(black_box(input)))
    });

    let doc = pipeline.parse(input);
    group.bench_function("render_only", |b| {
        b.iter(|| pipeline.render(black_box(&doc)))
    });

    group.finish();
}

fn bench_escaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("escaping");

    let title = "<script>alert('xss')</script> & \"more\" ".repeat(100);
    group.throughput(Throughput::Bytes(title.len() as u64));
    group.bench_function("five_char_map", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(title.len() * 2);
            alertmark::escape::escape_html_into(&mut out, black_box(title.as_bytes()));
            out
        })
    });

    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");
    group.sample_size(20);

    let unterminated = samples::unterminated();
    group.throughput(Throughput::Bytes(unterminated.len() as u64));
    group.bench_function("unterminated_alerts", |b| {
        b.iter(|| alertmark::to_html(black_box(&unterminated)))
    });

    let nested = samples::nested();
    group.throughput(Throughput::Bytes(nested.len() as u64));
    group.bench_function("deep_nesting", |b| {
        b.iter(|| alertmark::to_html(black_box(&nested)))
    });

    let emphasis = samples::emphasis();
    group.throughput(Throughput::Bytes(emphasis.len() as u64));
    group.bench_function("emphasis_explosion", |b| {
        b.iter(|| alertmark::to_html(black_box(&emphasis)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing,
    bench_pipeline_reuse,
    bench_escaping,
    bench_pathological
);
criterion_main!(benches);
