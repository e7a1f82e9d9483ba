use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use lemmapack_codec::{Catalog, compress_stream, decode, normalize_stream, read_entries};
use lemmapack_db::{Dictionary, INFLECTIONS_FILE, LoadMode, WORDS_FILE};
use tempfile::NamedTempFile;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lemmapack")]
#[command(about = "Build and inspect compressed lemma dictionaries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip markup from extracted word lines and drop duplicates.
    Normalize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Compress a normalized word list into the entries and pattern tables.
    Compress {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = WORDS_FILE)]
        words: PathBuf,
        #[arg(long, default_value = INFLECTIONS_FILE)]
        inflections: PathBuf,
    },
    /// Print every stored paradigm of a lemma.
    Inflect {
        #[arg(long)]
        dict_dir: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::Mmap)]
        mode: Mode,
        lemma: String,
    },
    /// Print the lemmas whose paradigms contain a surface form.
    Lemmas {
        #[arg(long)]
        dict_dir: PathBuf,
        #[arg(long, value_enum, default_value_t = Mode::Mmap)]
        mode: Mode,
        form: String,
    },
    /// Decode every entry against the catalog.
    Verify {
        #[arg(long)]
        dict_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Mmap,
    Owned,
}

impl From<Mode> for LoadMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mmap => LoadMode::Mmap,
            Mode::Owned => LoadMode::Owned,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { input, output } => normalize(&input, &output)?,
        Commands::Compress {
            input,
            words,
            inflections,
        } => compress(&input, &words, &inflections)?,
        Commands::Inflect {
            dict_dir,
            mode,
            lemma,
        } => {
            let dict = Dictionary::load_with_mode(&dict_dir, mode.into())
                .with_context(|| format!("loading dictionary from {}", dict_dir.display()))?;
            let paradigms = dict.inflections(&lemma);
            if paradigms.is_empty() {
                bail!("unknown lemma: {lemma}");
            }
            for paradigm in paradigms {
                println!("{}\t{}", paradigm.pattern_id, paradigm.forms().join(" "));
            }
        }
        Commands::Lemmas {
            dict_dir,
            mode,
            form,
        } => {
            let dict = Dictionary::load_with_mode(&dict_dir, mode.into())
                .with_context(|| format!("loading dictionary from {}", dict_dir.display()))?;
            for lemma in dict.lemmas_for(&form) {
                println!("{lemma}");
            }
        }
        Commands::Verify { dict_dir } => verify(&dict_dir)?,
    }

    Ok(())
}

fn normalize(input: &Path, output: &Path) -> Result<()> {
    let reader = open(input)?;
    let stats = write_atomically(output, |out| {
        normalize_stream(reader, out).context("normalizing word list")
    })?;
    println!(
        "Read {} lines, wrote {} ({} duplicates dropped) to {}.",
        stats.lines_read,
        stats.lines_written,
        stats.duplicates,
        output.display()
    );
    Ok(())
}

fn compress(input: &Path, words: &Path, inflections: &Path) -> Result<()> {
    let start = Instant::now();
    let reader = open(input)?;
    let words_tmp = temp_beside(words)?;
    let inflections_tmp = temp_beside(inflections)?;

    let stats = compress_stream(
        reader,
        BufWriter::new(words_tmp.as_file()),
        BufWriter::new(inflections_tmp.as_file()),
    )
    .with_context(|| format!("compressing {}", input.display()))?;

    // Both tables are complete before either is renamed into place. If the
    // catalog rename fails, the new entries table is withdrawn so the pair
    // never loads out of step.
    words_tmp
        .persist(words)
        .with_context(|| format!("writing {}", words.display()))?;
    if let Err(err) = inflections_tmp.persist(inflections) {
        if let Err(cleanup) = fs::remove_file(words) {
            warn!("could not withdraw {}: {cleanup}", words.display());
        }
        return Err(err.error).with_context(|| format!("writing {}", inflections.display()));
    }

    info!("compressed in {} ms", start.elapsed().as_millis());
    println!(
        "Wrote {} entries ({} lemmas without inflections skipped) and {} patterns.",
        stats.entries_written, stats.dropped_empty, stats.patterns
    );
    Ok(())
}

fn verify(dict_dir: &Path) -> Result<()> {
    let catalog = Catalog::read_from(open(&dict_dir.join(INFLECTIONS_FILE))?)
        .context("reading pattern catalog")?;
    let entries =
        read_entries(open(&dict_dir.join(WORDS_FILE))?).context("reading entries table")?;

    let mut forms = 0usize;
    for (lineno, entry) in entries.iter().enumerate() {
        let decoded =
            decode(entry, &catalog).with_context(|| format!("entry on line {}", lineno + 1))?;
        forms += decoded.inflections.len() + 1;
    }
    println!(
        "{} entries decode cleanly against {} patterns ({} forms).",
        entries.len(),
        catalog.len(),
        forms
    );
    Ok(())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn temp_beside(path: &Path) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    NamedTempFile::new_in(parent).with_context(|| format!("temp file in {}", parent.display()))
}

fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut dyn Write) -> Result<T>,
{
    let tmp = temp_beside(path)?;
    let mut out = BufWriter::new(tmp.as_file());
    let value = write(&mut out)?;
    out.flush()?;
    drop(out);
    tmp.persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(value)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD_LIST: &str = "@kala\nkalaa\nkalan\n@talo\ntalon\n@koira\nkoiraa\nkoiran\n";

    #[test]
    fn compress_then_verify_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("words.list");
        fs::write(&input, WORD_LIST).unwrap();
        let dict_dir = dir.path().join("dict");

        compress(
            &input,
            &dict_dir.join(WORDS_FILE),
            &dict_dir.join(INFLECTIONS_FILE),
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(dict_dir.join(WORDS_FILE)).unwrap(),
            "kala\t0\t3\ntalo\t1\t2\nkoira\t0\t3\n"
        );
        verify(&dict_dir).unwrap();

        let dict = Dictionary::load_with_mode(&dict_dir, Mode::Owned.into()).unwrap();
        assert_eq!(dict.lemmas_for("koiran"), vec!["koira"]);
    }

    #[test]
    fn malformed_input_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("words.list");
        fs::write(&input, "talon\n@talo\n").unwrap();
        let words = dir.path().join(WORDS_FILE);
        let inflections = dir.path().join(INFLECTIONS_FILE);

        assert!(compress(&input, &words, &inflections).is_err());
        assert!(!words.exists());
        assert!(!inflections.exists());
    }

    #[test]
    fn failed_catalog_rename_withdraws_entries() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("words.list");
        fs::write(&input, WORD_LIST).unwrap();
        let words = dir.path().join(WORDS_FILE);
        // A directory in the catalog's place makes the final rename fail.
        let inflections = dir.path().join(INFLECTIONS_FILE);
        fs::create_dir(&inflections).unwrap();

        let err = compress(&input, &words, &inflections).unwrap_err();
        assert!(format!("{err:#}").contains(INFLECTIONS_FILE));
        assert!(!words.exists());
        assert!(inflections.is_dir());
    }

    #[test]
    fn verify_reports_the_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(WORDS_FILE), "kala\t0\t3\ntalo\t0\t2\n").unwrap();
        fs::write(dir.path().join(INFLECTIONS_FILE), "\ta\tn\n").unwrap();

        let err = verify(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("entry on line 2"));
    }

    #[test]
    fn normalize_writes_cleaned_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.txt");
        let output = dir.path().join("clean.txt");
        fs::write(&input, "@@kala\n@kala\n[[kalan]]<br/>kalaa\nkala\n").unwrap();

        normalize(&input, &output).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "@@kala\n@kala\nkalan\nkalaa\n"
        );
    }
}
