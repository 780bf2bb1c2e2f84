//! Performance benchmarks for canopy

use canopy::filter::{PatternKind, parse_ignore_rules};
use canopy::metrics::MetricFlags;
use canopy::output::{OutputConfig, render_text};
use canopy::test_utils::TestTree;
use canopy::{BuildOptions, build_tree, sort_entries};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const IGNORE_FILE: &str = "\
# build output
target/
*.log
!keep.log
node_modules
*.tmp
";

/// A tree of `dirs` directories with `files_per_dir` files each, plus noise
/// the filters remove.
fn create_test_tree(dirs: usize, files_per_dir: usize) -> TestTree {
    let tree = TestTree::new();
    tree.add_file(".gitignore", IGNORE_FILE);
    for d in 0..dirs {
        for f in 0..files_per_dir {
            tree.add_lines(&format!("pkg{}/src/file{}.rs", d, f), f % 40 + 1);
        }
        tree.add_file(&format!("pkg{}/debug.log", d), "noise");
        tree.add_file(&format!("pkg{}/target/out.o", d), "noise");
    }
    tree
}

fn filtered_options() -> BuildOptions {
    BuildOptions {
        exclude_dirs: vec!["node_modules".to_string()],
        ignore_file: Some(".gitignore".to_string()),
        exclude_patterns: vec!["*.tmp".to_string(), "*/generated/*".to_string()],
        pattern_kind: PatternKind::Glob,
        ..Default::default()
    }
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");

    let small = create_test_tree(5, 10);
    group.bench_function("small_50_files", |b| {
        b.iter(|| build_tree(black_box(small.path()), &filtered_options()))
    });

    let medium = create_test_tree(20, 25);
    group.bench_function("medium_500_files", |b| {
        b.iter(|| build_tree(black_box(medium.path()), &filtered_options()))
    });

    let with_metrics = BuildOptions {
        metrics: MetricFlags::all(),
        ..filtered_options()
    };
    group.bench_function("medium_500_files_with_metrics", |b| {
        b.iter(|| build_tree(black_box(medium.path()), &with_metrics))
    });

    group.finish();
}

fn bench_ignore_parsing(c: &mut Criterion) {
    let text = IGNORE_FILE.repeat(50);
    c.bench_function("parse_ignore_rules", |b| {
        b.iter(|| parse_ignore_rules(black_box(&text)))
    });
}

fn bench_render(c: &mut Criterion) {
    let tree = create_test_tree(20, 25);
    let options = BuildOptions {
        metrics: MetricFlags::all(),
        ..filtered_options()
    };
    let built = build_tree(tree.path(), &options).unwrap();
    let config = OutputConfig {
        use_color: false,
        metrics: MetricFlags::all(),
        ..Default::default()
    };

    let mut group = c.benchmark_group("render");
    group.bench_function("text_500_files", |b| {
        b.iter(|| render_text(black_box(&built.root), "bench", &config))
    });

    let src = built.root.descend("pkg0/src").unwrap();
    group.bench_function("sort_by_metrics", |b| {
        b.iter(|| sort_entries(black_box(&src.files), MetricFlags::all()))
    });
    group.finish();
}

criterion_group!(benches, bench_build_tree, bench_ignore_parsing, bench_render);
criterion_main!(benches);
