//! Demo of keyword scoring on a chained hash table
//!
//! Demonstrates:
//! - Bulk-loading `word,points` records (last occurrence wins)
//! - Scoring a message by case-insensitive substring hits over a full scan
//! - Table statistics after loading

use chaintable_core::ChainedHashTable;

fn main() {
    env_logger::init();

    println!("=== Chained Hash Table Keyword Scoring Demo ===\n");

    let database = "\
free,3
winner,5
cash,2
prize,4
urgent,1
free,6";

    let threshold = 10;

    let mut table = ChainedHashTable::new();
    for line in database.lines() {
        if let Some((word, points)) = line.split_once(',') {
            if let Ok(points) = points.trim().parse::<u32>() {
                table.insert(word.trim().to_string(), points);
            }
        }
    }

    let stats = table.stats();
    println!("Table statistics:");
    println!("  Entries: {}", stats.len);
    println!("  Buckets: {}", stats.capacity);
    println!("  Load factor: {:.3}", stats.load_factor);
    println!("  Longest chain: {}", stats.longest_chain);
    println!("  Chain histogram: {:?}\n", stats.chain_histogram);

    let messages = [
        "Congratulations WINNER, claim your FREE prize now!",
        "Lunch at noon? Bring the cash you owe me.",
    ];

    for message in messages {
        let lowered = message.to_lowercase();
        let score: u32 = table
            .iter()
            .filter(|(word, _)| lowered.contains(word.to_lowercase().as_str()))
            .map(|(_, points)| *points)
            .sum();

        let verdict = if score >= threshold { "SPAM" } else { "NOT_SPAM" };
        println!("{:<52} score={:<3} {}", message, score, verdict);
    }
}
