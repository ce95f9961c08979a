use chain_map::Dictionary;
use chain_map::HashMap;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    /// Number of entries to insert before erasing.
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: usize,

    /// Percentage of the inserted entries to erase afterwards.
    #[arg(short = 'e', long = "erase_percent", default_value_t = 80)]
    erase_percent: usize,
}

fn main() {
    let args = Args::parse();

    let mut map: HashMap<u64, u64> = HashMap::new();
    println!("Starting capacity: {}", map.capacity());

    for i in 0..args.entries as u64 {
        map.insert(i, i * i);
    }

    println!(
        "Inserted {} entries, capacity {}, load factor {:.2}%",
        map.len(),
        map.capacity(),
        map.load_factor() * 100.0
    );
    map.debug_stats().print();
    map.print_bucket_histogram();

    let to_erase = args.entries * args.erase_percent.min(100) / 100;
    for i in 0..to_erase as u64 {
        map.remove(&i);
    }

    println!(
        "Erased {} entries, capacity {}, load factor {:.2}%",
        to_erase,
        map.capacity(),
        map.load_factor() * 100.0
    );
    map.debug_stats().print();
    map.print_bucket_histogram();

    let mut dict: Dictionary = map
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    println!("Dictionary copy holds {} entries", dict.len());
    if let Err(err) = dict.remove("not-a-number") {
        println!("Removing an absent key: {err}");
    }
}
