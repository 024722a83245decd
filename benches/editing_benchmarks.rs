use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rhythm_builder::command::HistoryManager;
use rhythm_builder::project::{ThumbnailStyle, render_thumbnail};
use rhythm_builder::sequencer::{QuantizeLevel, RhythmCell, quantize, resolve_overlaps};
use rhythm_builder::{EditCommand, EditorConfig, EditorSession, ProjectData, TimelineState};

/// Deterministic, heavily overlapping cells
fn overlapping_cells(count: usize) -> Vec<RhythmCell> {
    (0..count)
        .map(|i| {
            let position = ((i * 7) % count) as f64 * 0.1;
            let duration = 0.125 + (i % 5) as f64 * 0.0625;
            RhythmCell::new(position, duration, 100)
        })
        .collect()
}

/// Benchmark the overlap resolver (runs after every edit)
fn bench_resolve_overlaps(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_overlaps");

    for count in [16, 64, 256, 1024] {
        let cells = overlapping_cells(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &cells, |b, cells| {
            b.iter(|| black_box(resolve_overlaps(black_box(cells))));
        });
    }
    group.finish();
}

/// Benchmark quantization at every level
fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize");
    let cells = overlapping_cells(256);

    for level in QuantizeLevel::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", level)),
            &level,
            |b, &level| {
                b.iter(|| black_box(quantize(black_box(&cells), level)));
            },
        );
    }
    group.finish();
}

/// Benchmark whole-state history pushes
fn bench_history_push(c: &mut Criterion) {
    let state = TimelineState::new(resolve_overlaps(&overlapping_cells(128)), 64.0);

    c.bench_function("history_push_128_cells", |b| {
        let mut history = HistoryManager::with_limit(100);
        b.iter(|| history.push(black_box(&state)));
    });
}

/// Benchmark a typical edit through the session reducer
fn bench_session_move(c: &mut Criterion) {
    let mut project = ProjectData::new("Bench");
    project.rhythm = resolve_overlaps(&overlapping_cells(64));
    project.duration = project.last_cell_end();

    let config = EditorConfig {
        history_limit: Some(100),
        ..EditorConfig::default()
    };
    let (mut session, _rx) = EditorSession::new(project, config);
    let mut step = 0usize;

    c.bench_function("session_move_cell_64", |b| {
        b.iter(|| {
            step = (step + 1) % 64;
            black_box(session.apply(EditCommand::MoveCell {
                index: step,
                position: (step % 8) as f64 * 0.25,
            }))
        });
    });
}

/// Benchmark thumbnail rasterization
fn bench_thumbnail(c: &mut Criterion) {
    let cells = resolve_overlaps(&overlapping_cells(64));
    let duration = cells.iter().map(RhythmCell::end).fold(0.0, f64::max);
    let state = TimelineState::new(cells, duration);
    let style = ThumbnailStyle::default();

    c.bench_function("thumbnail_64_cells", |b| {
        b.iter(|| black_box(render_thumbnail(black_box(&state), &style)));
    });
}

criterion_group!(
    benches,
    bench_resolve_overlaps,
    bench_quantize,
    bench_history_push,
    bench_session_move,
    bench_thumbnail
);
criterion_main!(benches);
