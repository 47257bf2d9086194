// src/report.rs
//! Report output: a CSV with every match and a short Markdown summary meant
//! for humans. Unlike source fetches, write failures here are fatal; a run
//! that cannot record its results has nothing to show for itself.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::config::OutputCfg;
use crate::ingest::types::Listing;

const CSV_HEADER: [&str; 7] = [
    "title",
    "url",
    "summary",
    "source",
    "feed_name",
    "kind",
    "preference_score",
];

/// Write both report files described by the output config.
pub fn write_reports(matches: &[Listing], out: &OutputCfg) -> Result<()> {
    fs::create_dir_all(&out.dir).with_context(|| format!("creating output dir {}", out.dir))?;
    write_csv(matches, Path::new(&out.csv))?;
    write_markdown(matches, Path::new(&out.markdown_summary))?;
    Ok(())
}

pub fn write_csv(matches: &[Listing], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("opening {} for csv output", path.display()))?;
    wtr.write_record(CSV_HEADER).context("writing csv header")?;
    for listing in matches {
        wtr.serialize(listing)
            .with_context(|| format!("writing csv row for {}", listing.url))?;
    }
    wtr.flush().context("flushing csv output")?;
    Ok(())
}

pub fn write_markdown(matches: &[Listing], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, render_markdown(matches))
        .with_context(|| format!("writing markdown summary to {}", path.display()))
}

/// Render the Markdown summary document. Kept separate from the file write so
/// tests can check the shape without touching disk.
pub fn render_markdown(matches: &[Listing]) -> String {
    let mut doc = String::new();
    doc.push_str("# Apartment Scout Matches\n\n");
    doc.push_str(&format!(
        "Generated: {}\n\n",
        Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    ));
    if matches.is_empty() {
        doc.push_str("_No matches._\n");
        return doc;
    }
    for m in matches {
        doc.push_str(&format!("- [{}]({})  \n", m.title, m.url));
    }
    doc
}

// Config may point the files outside `output.dir`; make sure their parents
// exist too.
fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::SourceKind;

    fn listing(title: &str, url: &str) -> Listing {
        Listing {
            title: title.to_string(),
            url: url.to_string(),
            summary: "s".to_string(),
            source: "src".to_string(),
            feed_name: "feed".to_string(),
            kind: SourceKind::Syndicated,
            preference_score: Some(2),
        }
    }

    #[test]
    fn markdown_lists_matches_in_order() {
        let doc = render_markdown(&[
            listing("First pick", "https://x.test/1"),
            listing("Second pick", "https://x.test/2"),
        ]);
        assert!(doc.starts_with("# Apartment Scout Matches\n\nGenerated: "));
        let first = doc.find("- [First pick](https://x.test/1)").unwrap();
        let second = doc.find("- [Second pick](https://x.test/2)").unwrap();
        assert!(first < second);
        assert!(!doc.contains("_No matches._"));
    }

    #[test]
    fn markdown_for_empty_run_says_so() {
        let doc = render_markdown(&[]);
        assert!(doc.ends_with("_No matches._\n"));
    }
}
