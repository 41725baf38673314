use criterion::{black_box, criterion_group, criterion_main, Criterion};

use molgraph::{Dedupe, MatchConfig, Matcher, MoleculeGraph};

const ETHANE: &str = "InChI=1S/C2H6/c1-2/h1-2H3";
const CYCLOHEXANE: &str = "InChI=1S/C6H12/c1-2-4-6-5-3-1/h1-6H2";
const BENZENE: &str = "InChI=1S/C6H6/c1-2-4-6-5-3-1/h1-6H";
const NAPHTHALENE: &str = "InChI=1S/C10H8/c1-2-6-10-8-4-3-7-9(10)5-1/h1-8H";
const CHOLESTEROL: &str = "InChI=1S/C27H46O/c1-18(2)7-6-8-19(3)23-11-12-24-22-10-9-20-17-21(28)13-15-26(20,4)25(22)14-16-27(23,24)5/h9,18-19,21-25,28H,6-8,10-17H2,1-5H3";

fn parse(inchi: &str) -> MoleculeGraph {
    MoleculeGraph::from_inchi(inchi).unwrap().remove(0)
}

fn bench_is_sub(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_sub");

    let benzene = parse(BENZENE);
    let naphthalene = parse(NAPHTHALENE);
    let cyclohexane = parse(CYCLOHEXANE);
    let cholesterol = parse(CHOLESTEROL);

    group.bench_function("benzene_in_naphthalene", |b| {
        let matcher = Matcher::new(&benzene, &naphthalene).unwrap();
        b.iter(|| black_box(matcher.is_sub()))
    });
    group.bench_function("cyclohexane_in_cholesterol", |b| {
        let matcher = Matcher::new(&cyclohexane, &cholesterol).unwrap();
        b.iter(|| black_box(matcher.is_sub()))
    });

    group.finish();
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");

    let ethane = parse(ETHANE);
    let cyclohexane = parse(CYCLOHEXANE);
    let cholesterol = parse(CHOLESTEROL);

    group.bench_function("ethane_in_cholesterol", |b| {
        let matcher = Matcher::new(&ethane, &cholesterol).unwrap();
        b.iter(|| black_box(matcher.sub_count()))
    });
    group.bench_function("cyclohexane_in_cholesterol_unique", |b| {
        let matcher = Matcher::new(&cyclohexane, &cholesterol)
            .unwrap()
            .with_config(MatchConfig::default().with_dedupe(Dedupe::TargetAtoms));
        b.iter(|| black_box(matcher.matches()))
    });

    group.finish();
}

criterion_group!(benches, bench_is_sub, bench_enumerate);
criterion_main!(benches);
