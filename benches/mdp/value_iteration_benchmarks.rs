use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reactive_mdp::mdp::{value_iteration, SolverConfig, StateSpace, UpdateRule};
use reactive_mdp::tasks::TaskTable;
use reactive_mdp::topology::RoadMap;

fn instance(n: u32) -> (RoadMap<u32>, TaskTable<u32>) {
    let mut rng = StdRng::seed_from_u64(n as u64);
    let mut routes: Vec<(u32, u32, f64)> = (1..n)
        .map(|i| (i - 1, i, rng.gen_range(10.0..100.0)))
        .collect();
    for i in 0..n {
        for j in (i + 2)..n {
            if rng.gen_bool(0.2) {
                routes.push((i, j, rng.gen_range(10.0..100.0)));
            }
        }
    }
    let map = RoadMap::new(routes).unwrap();

    let mut tasks = TaskTable::new();
    let p = 0.8 / (n - 1) as f64;
    for origin in 0..n {
        for destination in (0..n).filter(|&d| d != origin) {
            tasks.insert(origin, destination, p, rng.gen_range(100.0..1000.0));
        }
    }
    (map, tasks)
}

fn bench_state_space(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_space_build");
    for n in [8, 16, 32] {
        let (map, tasks) = instance(n);
        let config = SolverConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| StateSpace::build(black_box(&map), black_box(&tasks), &config).unwrap())
        });
    }
    group.finish();
}

fn bench_value_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_iteration");
    for n in [8, 16, 32] {
        let (map, tasks) = instance(n);
        for rule in [UpdateRule::Synchronous, UpdateRule::Asynchronous] {
            let config = SolverConfig::default().with_update_rule(rule);
            let space = StateSpace::build(&map, &tasks, &config).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", rule), n),
                &space,
                |b, space| b.iter(|| value_iteration(black_box(space), &config).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_state_space, bench_value_iteration);
criterion_main!(benches);
