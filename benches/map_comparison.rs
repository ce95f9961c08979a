use core::hash::Hash;
use core::hint::black_box;
use std::collections::HashMap as StdHashMap;

use chain_map::DefaultHashBuilder;
use chain_map::HashMap as ChainHashMap;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;

trait BenchKey: Clone + Hash + Eq {
    fn new(key: u64) -> Self;
}

#[derive(Clone, Hash, PartialEq, Eq)]
struct SmallKey(u64);

impl BenchKey for SmallKey {
    fn new(key: u64) -> Self {
        black_box(Self(key))
    }
}

#[derive(Clone, Hash, PartialEq, Eq)]
struct StringKey(String);

impl BenchKey for StringKey {
    fn new(key: u64) -> Self {
        black_box(Self(format!("key_{key:016X}")))
    }
}

const SIZES: &[usize] = &[
    (1 << 8),
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
];

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

fn random_keys<K: BenchKey>(count: usize) -> Vec<K> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| K::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut items = items.to_vec();
    items.shuffle(&mut SmallRng::from_os_rng());
    items
}

fn bench_insert_random<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_map/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = ChainHashMap::with_hasher(DefaultHashBuilder::default());
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = HashbrownHashMap::with_hasher(DefaultHashBuilder::default());
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter_batched(
                || shuffled(&keys),
                |keys| {
                    let mut map = StdHashMap::with_hasher(DefaultHashBuilder::default());
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "find_hit_miss_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let stored = random_keys::<K>(size);
        let mut probes = stored.clone();
        probes.extend(random_keys::<K>(size));
        let probes = shuffled(&probes);

        let mut chain = ChainHashMap::with_hasher(DefaultHashBuilder::default());
        let mut brown = HashbrownHashMap::with_hasher(DefaultHashBuilder::default());
        let mut std_map = StdHashMap::with_hasher(DefaultHashBuilder::default());
        for (i, key) in stored.iter().enumerate() {
            chain.insert(key.clone(), i);
            brown.insert(key.clone(), i);
            std_map.insert(key.clone(), i);
        }

        group.throughput(Throughput::Elements(probes.len() as u64));

        group.bench_function(format!("chain_map/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(chain.get(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(brown.get(key));
                }
            })
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                for key in &probes {
                    black_box(std_map.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_map/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut map = ChainHashMap::with_hasher(DefaultHashBuilder::default());
                    for (i, key) in keys.iter().enumerate() {
                        map.insert(key.clone(), i);
                    }
                    (map, shuffled(&keys))
                },
                |(mut map, keys)| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut map = HashbrownHashMap::with_hasher(DefaultHashBuilder::default());
                    for (i, key) in keys.iter().enumerate() {
                        map.insert(key.clone(), i);
                    }
                    (map, shuffled(&keys))
                },
                |(mut map, keys)| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut map = StdHashMap::with_hasher(DefaultHashBuilder::default());
                    for (i, key) in keys.iter().enumerate() {
                        map.insert(key.clone(), i);
                    }
                    (map, shuffled(&keys))
                },
                |(mut map, keys)| {
                    for key in &keys {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        let chain: ChainHashMap<K, usize, DefaultHashBuilder> =
            keys.iter().cloned().zip(0..).collect();
        let brown: HashbrownHashMap<K, usize, DefaultHashBuilder> =
            keys.iter().cloned().zip(0..).collect();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_map/{size}"), |b| {
            b.iter(|| {
                for pair in &chain {
                    black_box(pair);
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for pair in &brown {
                    black_box(pair);
                }
            })
        });
    }

    group.finish();
}

fn bench_mixed_probabilistic_zipf<K: BenchKey>(c: &mut Criterion) {
    for exponent in [1.0, 1.3] {
        let mut group = c.benchmark_group(format!(
            "mixed_probabilistic_zipf_{:.01}_{}",
            exponent,
            core::any::type_name::<K>()
        ));
        group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

        const KEY_SPACE_MULTIPLIER: f32 = 2.0;

        for &size in SIZES {
            let mut rng = SmallRng::from_os_rng();
            let op_distr = Zipf::new(3.0, exponent).unwrap();
            let operations = (0..size * 3)
                .map(|_| {
                    let op_choice: f64 = rng.sample(op_distr);
                    if op_choice <= 1.0 {
                        Operation::Find
                    } else if op_choice <= 2.0 {
                        Operation::Insert
                    } else {
                        Operation::Remove
                    }
                })
                .collect::<Vec<Operation>>();

            let insert_distr = Zipf::new(size as f32 - 1.0, 1.0).unwrap();
            let find_remove_distr = Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER - 1.0, 1.0).unwrap();
            let workload = operations
                .into_iter()
                .map(|op| {
                    let key = match op {
                        Operation::Insert => rng.sample(insert_distr) as u64,
                        Operation::Remove | Operation::Find => rng.sample(find_remove_distr) as u64,
                    };
                    (op, K::new(key))
                })
                .collect::<Vec<(Operation, K)>>();

            group.throughput(Throughput::Elements(workload.len() as u64));

            group.bench_function(format!("chain_map/{size}"), |b| {
                b.iter_batched(
                    || workload.clone(),
                    |workload| {
                        let mut map = ChainHashMap::with_hasher(DefaultHashBuilder::default());
                        for (op, key) in workload {
                            match op {
                                Operation::Insert => {
                                    *map.entry(key).or_insert(0) += 1;
                                }
                                Operation::Remove => {
                                    black_box(map.remove(&key));
                                }
                                Operation::Find => {
                                    black_box(map.get(&key));
                                }
                            }
                        }
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                )
            });

            group.bench_function(format!("hashbrown/{size}"), |b| {
                b.iter_batched(
                    || workload.clone(),
                    |workload| {
                        let mut map = HashbrownHashMap::with_hasher(DefaultHashBuilder::default());
                        for (op, key) in workload {
                            match op {
                                Operation::Insert => {
                                    *map.entry(key).or_insert(0) += 1;
                                }
                                Operation::Remove => {
                                    black_box(map.remove(&key));
                                }
                                Operation::Find => {
                                    black_box(map.get(&key));
                                }
                            }
                        }
                        black_box(map)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.finish();
    }
}

fn bench_churn<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let toggles = (0..size as u64)
            .flat_map(|i| [K::new(i), K::new(i)])
            .collect::<Vec<K>>();

        group.throughput(Throughput::Elements(toggles.len() as u64));

        group.bench_function(format!("chain_map/{size}"), |b| {
            b.iter_batched(
                || shuffled(&toggles),
                |toggles| {
                    let mut map = ChainHashMap::with_hasher(DefaultHashBuilder::default());
                    for key in toggles {
                        match map.entry(key) {
                            chain_map::Entry::Vacant(entry) => {
                                entry.insert(());
                            }
                            chain_map::Entry::Occupied(entry) => {
                                black_box(entry.remove());
                            }
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || shuffled(&toggles),
                |toggles| {
                    let mut map = HashbrownHashMap::with_hasher(DefaultHashBuilder::default());
                    for key in toggles {
                        match map.entry(key) {
                            hashbrown::hash_map::Entry::Vacant(entry) => {
                                entry.insert(());
                            }
                            hashbrown::hash_map::Entry::Occupied(entry) => {
                                black_box(entry.remove());
                            }
                        }
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<SmallKey>,
    bench_insert_random::<StringKey>,
    bench_find_hit_miss::<SmallKey>,
    bench_find_hit_miss::<StringKey>,
    bench_remove::<SmallKey>,
    bench_remove::<StringKey>,
    bench_iteration::<SmallKey>,
    bench_iteration::<StringKey>,
    bench_mixed_probabilistic_zipf::<SmallKey>,
    bench_mixed_probabilistic_zipf::<StringKey>,
    bench_churn::<SmallKey>,
    bench_churn::<StringKey>,
);

criterion_main!(benches);
