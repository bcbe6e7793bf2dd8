use std::env;
use std::path::Path;

use vakil::statutes::{SectionIndex, StatuteStoreConfig, DEFAULT_TOP_K};

/// Standalone statute lookup against the persisted section index.
///
/// `section_search ingest <sections.json>` loads sections into the index;
/// any other arguments are treated as a query.
fn main() -> color_eyre::Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let config = StatuteStoreConfig::from_env()?;
    let index = SectionIndex::open(&config)?;

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("ingest") => {
            let path = args.get(1).ok_or_else(|| {
                color_eyre::eyre::eyre!("usage: section_search ingest <sections.json>")
            })?;
            let added = index.ingest_json(Path::new(path))?;
            println!("Ingested {} sections ({} total).", added, index.count()?);
        }
        _ => {
            let query = if args.is_empty() {
                "Theft and property disputes".to_string()
            } else {
                args.join(" ")
            };
            let results = index.search(&query, DEFAULT_TOP_K);
            if results.is_empty() {
                println!("No matching sections.");
            }
            for (i, entry) in results.iter().enumerate() {
                println!("\n--- Result {} ---", i + 1);
                println!("Section: {}", entry.section);
                println!("Title: {}", entry.section_title);
                println!("Chapter: {}", entry.chapter);
                println!("Chapter Title: {}", entry.chapter_title);
                let preview: String = entry.content.chars().take(200).collect();
                println!("Content: {}...", preview);
            }
        }
    }
    Ok(())
}
