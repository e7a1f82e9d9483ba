use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lemmapack_db::{Dictionary, LoadMode};

fn main() -> Result<()> {
    let dict_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p lemmapack-db --example stats -- <path-to-dict-dir> [lemma...]")?;

    let dict = Dictionary::load_with_mode(&dict_dir, LoadMode::Mmap)
        .with_context(|| format!("loading dictionary from {}", dict_dir.display()))?;

    let mut widest = 0usize;
    let mut total_forms = 0usize;
    for paradigm in dict.iter_paradigms() {
        widest = widest.max(paradigm.suffixes.len());
        total_forms += paradigm.suffixes.len();
    }

    println!("Dictionary: {}", dict_dir.display());
    println!("Entries    : {}", dict.entry_count());
    println!("Patterns   : {}", dict.pattern_count());
    println!("Lemmas     : {}", dict.lemma_count());
    println!("Forms      : {} ({} distinct)", total_forms, dict.form_count());
    println!("Widest paradigm: {} forms", widest);
    if dict.entry_count() > 0 {
        println!(
            "Entries per pattern: {:.1}",
            dict.entry_count() as f64 / dict.pattern_count() as f64
        );
    }

    for lemma in env::args().skip(2) {
        for paradigm in dict.inflections(&lemma) {
            println!("{} [{}]: {}", lemma, paradigm.pattern_id, paradigm.inflections().join(", "));
        }
    }

    Ok(())
}
