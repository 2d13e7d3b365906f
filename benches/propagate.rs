use criterion::{criterion_group, criterion_main, Criterion};

fn orbit(name: &str, line1: &str, line2: &str) -> sattrack::Orbit {
    sattrack::Orbit::new(sattrack::Tle::from_lines(name, line1, line2).unwrap()).unwrap()
}

pub fn criterion_benchmark(criterion: &mut Criterion) {
    let terra = orbit(
        "TERRA",
        "1 25994U 99068A   18196.75093423 -.00000025  00000-0  45345-5 0  9993",
        "2 25994  98.2051 271.2050 0001021  68.8940 291.2371 14.57112414987988",
    );
    let molniya = orbit(
        "MOLNIYA 1-36",
        "1 08195U 75081A   06176.33215444  .00000099  00000-0  11873-3 0   813",
        "2 08195  64.1586 279.0717 6877146 264.7651  20.2257  2.00491383225656",
    );

    criterion.bench_function("propagate near earth, one day", |bencher| {
        bencher.iter(|| {
            let mut states = Vec::new();
            for hour in 0..24 {
                states.push(terra.position_at((hour * 60) as f64).unwrap());
            }
            states
        })
    });

    criterion.bench_function("propagate deep space, one day", |bencher| {
        bencher.iter(|| {
            let mut state = molniya.resonance_state();
            let mut states = Vec::new();
            for hour in 0..24 {
                states.push(
                    molniya
                        .position_at_with_state((hour * 60) as f64, state.as_mut())
                        .unwrap(),
                );
            }
            states
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
