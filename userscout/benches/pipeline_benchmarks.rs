use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io;
use std::num::NonZeroUsize;
use tempfile::tempdir;
use userscout::collect::Collector;
use userscout::dispatch::Dispatcher;
use userscout::{
    render_record, run_pipeline, Address, Company, FilePersister, OutputFormat, PipelineConfig,
    Record, ReportWriter, TaglineFilter,
};

fn create_records(count: i64) -> Vec<Record> {
    (1..=count)
        .map(|id| Record {
            id,
            name: format!("User {}", id),
            email: format!("user{}@example.com", id),
            address: Address {
                street: format!("{} Kulas Light", id),
                suite: "Apt. 556".to_string(),
                city: "Gwenborough".to_string(),
                zipcode: "92998-3874".to_string(),
            },
            company: Company {
                name: "Romaguera-Crona".to_string(),
                catch_phrase: if id % 10 == 0 {
                    "Multi-tiered Task-Force".to_string()
                } else {
                    "Multi-layered client-server neural-net".to_string()
                },
            },
        })
        .collect()
}

fn bench_render(c: &mut Criterion) {
    let record = create_records(1).remove(0);
    c.bench_function("render_record", |b| {
        b.iter(|| black_box(render_record(black_box(&record))))
    });
}

fn bench_dispatch_scaling(c: &mut Criterion) {
    let filter = TaglineFilter::default();
    let mut group = c.benchmark_group("Dispatch Scaling");

    for threads in [1, 2, 4, 8] {
        let dispatcher = Dispatcher::new(NonZeroUsize::new(threads).unwrap()).unwrap();
        let records = create_records(1000);
        group.bench_with_input(BenchmarkId::from_parameter(threads), &records, |b, records| {
            b.iter(|| {
                let writer = ReportWriter::new(io::sink());
                let (handoff, collector) = Collector::spawn().unwrap();
                dispatcher.dispatch(records.clone(), &filter, &writer, handoff);
                black_box(collector.finish().unwrap())
            });
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let persister = FilePersister::new(dir.path().join("bench.yaml"), OutputFormat::Yaml);
    let config = PipelineConfig {
        thread_count: NonZeroUsize::new(4).unwrap(),
        ..Default::default()
    };
    let records = create_records(500);

    c.bench_function("full_pipeline_500", |b| {
        b.iter(|| {
            let writer = ReportWriter::new(io::sink());
            black_box(run_pipeline(&config, &records, &persister, &writer).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_render,
    bench_dispatch_scaling,
    bench_full_pipeline
);
criterion_main!(benches);
