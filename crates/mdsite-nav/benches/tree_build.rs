//! Benchmarks for navigation tree operations.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mdsite_files::Files;
use mdsite_nav::{Declaration, NavTree};

/// Create declarations with the given section count and pages per section.
fn create_declarations(sections: usize, pages: usize) -> (Vec<Declaration>, Files) {
    let mut files = Files::new(true);
    files.register("index.md").unwrap();
    let mut declarations = vec![Declaration::Leaf {
        path: "index.md".to_owned(),
        title: None,
        child_title: None,
    }];

    for section in 0..sections {
        let mut children = Vec::new();
        for page in 0..pages {
            let path = format!("section-{section}/page-{page}.md");
            files.register(&path).unwrap();
            children.push(Declaration::Leaf {
                path,
                title: None,
                child_title: None,
            });
        }
        declarations.push(Declaration::Group {
            title: format!("Section {section}"),
            children,
        });
    }

    (declarations, files)
}

fn bench_tree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for (sections, pages) in [(5, 5), (10, 10), (20, 25)] {
        let (declarations, files) = create_declarations(sections, pages);

        group.bench_with_input(
            BenchmarkId::new("build", format!("s{sections}_p{pages}")),
            &(declarations, files),
            |b, (declarations, files)| b.iter(|| NavTree::build(declarations, files).unwrap()),
        );
    }

    group.finish();
}

fn bench_cursor_walk(c: &mut Criterion) {
    let (declarations, files) = create_declarations(10, 10);
    let mut tree = NavTree::build(&declarations, &files).unwrap();

    let mut group = c.benchmark_group("cursor_walk");

    group.bench_function("full_walk", |b| {
        b.iter(|| {
            for idx in 0..tree.page_count() {
                tree.set_current(Some(idx));
            }
            tree.set_current(None);
        })
    });

    group.finish();
}

fn bench_page_lookup(c: &mut Criterion) {
    let (declarations, files) = create_declarations(10, 10);
    let tree = NavTree::build(&declarations, &files).unwrap();

    let mut group = c.benchmark_group("page_lookup");

    group.bench_function("get_page_hit", |b| {
        b.iter(|| tree.get_page("section-4/page-7.md"))
    });

    group.bench_function("get_page_miss", |b| {
        b.iter(|| tree.get_page("nonexistent/path.md"))
    });

    group.finish();
}

criterion_group!(benches, bench_tree_build, bench_cursor_walk, bench_page_lookup);

criterion_main!(benches);
