use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ionpath_lib::{cursor::Cursor, error, extractor::ExtractorBuilder, reader::TextReader};

fn gen_input() -> String {
    let mut out = String::new();
    for idx in 0..2_000 {
        out.push_str(&format!(
            "{{id: {}, name: \"item {}\", tags: [a, b, c], nested: {{price: {}, qty: {}}}}}\n",
            idx,
            idx,
            idx * 3,
            idx % 7,
        ));
    }
    out
}

fn count() -> impl Fn(&mut dyn Cursor, &mut u64) -> Result<usize, error::Callback> + Clone {
    |_, hits| {
        *hits += 1;
        Ok(0)
    }
}

fn narrow_paths(c: &mut Criterion) {
    let input = gen_input();
    let mut group = c.benchmark_group("narrow");

    let fsm = ExtractorBuilder::standard()
        .with_search_path("(nested price)", count())
        .unwrap()
        .build_strict(false)
        .unwrap();
    group.bench_function("fsm", |b| {
        b.iter(|| {
            let mut hits = 0u64;
            let mut reader = TextReader::new(black_box(&input));
            fsm.match_stream(&mut reader, &mut hits).unwrap();
            hits
        })
    });

    let tree = ExtractorBuilder::standard()
        .with_search_path("(nested price)", count())
        .unwrap()
        .build_legacy();
    group.bench_function("tree-walk", |b| {
        b.iter(|| {
            let mut hits = 0u64;
            let mut reader = TextReader::new(black_box(&input));
            tree.match_stream(&mut reader, &mut hits).unwrap();
            hits
        })
    });

    group.finish();
}

fn wide_paths(c: &mut Criterion) {
    let input = gen_input();
    let mut group = c.benchmark_group("wide");

    // fifty registered field names, only two can ever match
    let mut fsm_builder = ExtractorBuilder::standard();
    let mut tree_builder = ExtractorBuilder::standard();
    for idx in 0..48 {
        fsm_builder = fsm_builder
            .with_search_path(&format!("(missing{})", idx), count())
            .unwrap();
        tree_builder = tree_builder
            .with_search_path(&format!("(missing{})", idx), count())
            .unwrap();
    }
    let fsm = fsm_builder
        .with_search_path("(id)", count())
        .unwrap()
        .with_search_path("(name)", count())
        .unwrap()
        .build_strict(false)
        .unwrap();
    let tree = tree_builder
        .with_search_path("(id)", count())
        .unwrap()
        .with_search_path("(name)", count())
        .unwrap()
        .build_legacy();

    group.bench_function("fsm", |b| {
        b.iter(|| {
            let mut hits = 0u64;
            let mut reader = TextReader::new(black_box(&input));
            fsm.match_stream(&mut reader, &mut hits).unwrap();
            hits
        })
    });
    group.bench_function("tree-walk", |b| {
        b.iter(|| {
            let mut hits = 0u64;
            let mut reader = TextReader::new(black_box(&input));
            tree.match_stream(&mut reader, &mut hits).unwrap();
            hits
        })
    });

    group.finish();
}

criterion_group!(benches, narrow_paths, wide_paths);
criterion_main!(benches);
