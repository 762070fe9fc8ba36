use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prakriti_core::model::{Dosha, QuestionSet};
use prakriti_core::scoring::{parse_selections, score, DoshaTally};

fn bench_score(c: &mut Criterion) {
    let questions = QuestionSet::standard();
    let selections: Vec<usize> = (0..questions.len()).map(|i| i % 3).collect();

    c.bench_function("score_standard_set", |b| {
        b.iter(|| score(black_box(&questions), black_box(&selections)))
    });
}

fn bench_percentages(c: &mut Criterion) {
    let tally = DoshaTally::new(9, 9, 7);

    c.bench_function("percentages_and_dominance", |b| {
        b.iter(|| {
            let t = black_box(&tally);
            (t.percentages(), t.dominant(), t.is_dominant(Dosha::Kapha))
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    let input = "ABCAB CABCA, BCABC ABCAB CABCA";

    c.bench_function("parse_selections", |b| {
        b.iter(|| parse_selections(black_box(input)))
    });
}

criterion_group!(benches, bench_score, bench_percentages, bench_parse);
criterion_main!(benches);
