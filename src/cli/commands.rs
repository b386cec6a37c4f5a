// CLI command implementations
use std::fs;
use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use tracing::error;

use apetag::{genre, scan, ScanOptions, ScanReport, Tag};

use crate::cli::output::OutputFormatter;

/// Expand glob patterns; arguments that match nothing are kept as given
pub fn expand_files(patterns: &[String]) -> Vec<String> {
    let mut files = Vec::new();
    for pattern in patterns {
        let matched: Vec<String> = glob::glob(pattern)
            .map(|paths| {
                paths
                    .filter_map(|p| p.ok())
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        if matched.is_empty() {
            files.push(pattern.clone());
        } else {
            files.extend(matched);
        }
    }
    files
}

fn load(path: &str, options: &ScanOptions) -> Result<(Vec<u8>, ScanReport)> {
    let data = fs::read(path).with_context(|| format!("Failed to read: {}", path))?;
    let report = scan(&data, options).with_context(|| format!("Corrupt APE tag in {}", path))?;
    Ok((data, report))
}

/// Locate tags in files. Failing files are logged and skipped.
pub fn command_detect(files: &[String], raw: bool, options: &ScanOptions, formatter: &OutputFormatter) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut failed = 0;

    for path in expand_files(files) {
        match load(&path, options) {
            Ok((data, report)) => {
                let mut value = json!({
                    "file": path,
                    "ape": report.ape,
                    "id3v1": report.id3v1,
                });
                if raw {
                    if let Some(tag) = report.ape_tag(&data)? {
                        value["raw"] = json!(STANDARD.encode(tag.as_bytes()));
                    }
                }
                formatter.output(&value, &mut writer)?;
            }
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} file(s) could not be scanned", failed);
    }
    Ok(())
}

/// Write the APE tag bytes of `file` to `output`
pub fn command_extract(file: &str, output: &str, options: &ScanOptions) -> Result<()> {
    let (data, report) = load(file, options)?;
    let Some(tag) = report.ape_tag(&data)? else {
        bail!("No APE tag found in {}", file);
    };

    let mut bytes = Vec::with_capacity(tag.size());
    tag.serialize(&mut bytes);
    fs::write(output, &bytes).with_context(|| format!("Failed to write: {}", output))?;
    Ok(())
}

/// Key, flags and value size of every APE item in one file
pub fn items_report(path: &str, options: &ScanOptions) -> Result<serde_json::Value> {
    let (data, report) = load(path, options)?;
    let tag = report.ape_tag(&data)?;
    let mut items = Vec::new();
    if let Some(reader) = tag.as_ref().and_then(|tag| tag.items()) {
        for item in reader {
            let item = item.with_context(|| format!("Reading items of {}", path))?;
            items.push(json!({
                "key": item.key_text(),
                "flags": item.flags,
                "read_only": item.is_read_only(),
                "type": item.item_type(),
                "size": item.value.len(),
            }));
        }
    }
    Ok(json!({ "file": path, "items": items }))
}

/// List the items of each file. Failing files are logged and skipped.
pub fn command_items(files: &[String], options: &ScanOptions, formatter: &OutputFormatter) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let failed = write_items(&expand_files(files), options, formatter, &mut writer)?;

    if failed > 0 {
        bail!("{} file(s) could not be listed", failed);
    }
    Ok(())
}

/// Write one items report per file, returning how many files failed
fn write_items(files: &[String], options: &ScanOptions, formatter: &OutputFormatter, writer: &mut impl Write) -> Result<usize> {
    let mut failed = 0;
    for path in files {
        match items_report(path, options) {
            Ok(value) => formatter.output(&value, writer)?,
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
            }
        }
    }
    Ok(failed)
}

/// Look up a genre by index or name, or list the table
pub fn command_genre(query: Option<&str>, list: bool, formatter: &OutputFormatter) -> Result<()> {
    let mut writer = io::stdout().lock();

    if list {
        for (index, name) in genre::GENRES.iter().enumerate() {
            writeln!(writer, "{:3} {}", index, name)?;
        }
        return Ok(());
    }

    let Some(query) = query else {
        bail!("No genre given");
    };
    let (index, name) = match query.parse::<usize>() {
        Ok(index) => (index, genre::name_for_index(index)),
        Err(_) => match genre::index_for_name(query) {
            Some(index) => (index, genre::name_for_index(index)),
            None => bail!("Unknown genre: {}", query),
        },
    };
    if name.is_empty() {
        bail!("Genre index out of range: {}", index);
    }
    formatter.output(&json!({ "index": index, "name": name }), &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config::OutputFormat;

    fn descriptor(size: u32, item_count: u32, flags: u32) -> Vec<u8> {
        let mut data = b"APETAGEX".to_vec();
        for field in [2000, size, item_count, flags, 0, 0] {
            data.extend_from_slice(&u32::to_le_bytes(field));
        }
        data
    }

    /// Header + one item + footer
    fn sample_tag() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&5u32.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(b"Title\0Hello");

        let mut tag = descriptor(32, 1, 0xA000_0000);
        tag.extend_from_slice(&body);
        tag.extend_from_slice(&descriptor(body.len() as u32 + 32, 1, 0x8000_0000));
        tag
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> String {
        let path = dir.path().join(name);
        fs::write(&path, data).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_expand_keeps_unmatched() {
        let files = expand_files(&["definitely-missing-*.ape".to_string(), "plain.mp3".to_string()]);
        assert_eq!(files, ["definitely-missing-*.ape", "plain.mp3"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("definitely-missing.ape", &ScanOptions::default()).unwrap_err();
        assert!(err.to_string().contains("definitely-missing.ape"));
    }

    #[test]
    fn test_extract_writes_tag_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let tag = sample_tag();
        let mut audio = vec![0x55; 200];
        audio.extend_from_slice(&tag);
        let input = write_file(&dir, "song.ape", &audio);
        let output = dir.path().join("tag.bin").to_string_lossy().into_owned();

        command_extract(&input, &output, &ScanOptions::default()).unwrap();
        assert_eq!(fs::read(&output).unwrap(), tag);
    }

    #[test]
    fn test_extract_without_tag_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_file(&dir, "plain.mp3", &[0u8; 256]);
        let output = dir.path().join("tag.bin").to_string_lossy().into_owned();

        assert!(command_extract(&input, &output, &ScanOptions::default()).is_err());
        assert!(!dir.path().join("tag.bin").exists());
    }

    #[test]
    fn test_items_report_lists_keys_and_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "song.ape", &sample_tag());

        let value = items_report(&path, &ScanOptions::default()).unwrap();
        assert_eq!(value["file"], path.as_str());
        assert_eq!(value["items"].as_array().unwrap().len(), 1);
        assert_eq!(value["items"][0]["key"], "Title");
        assert_eq!(value["items"][0]["size"], 5);
        assert_eq!(value["items"][0]["read_only"], false);
    }

    #[test]
    fn test_items_continue_past_failing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.mp3").to_string_lossy().into_owned();
        let good = write_file(&dir, "good.ape", &sample_tag());

        // Header says one item, footer says two
        let mut corrupt = sample_tag();
        let count_pos = corrupt.len() - 32 + 16;
        corrupt[count_pos..count_pos + 4].copy_from_slice(&2u32.to_le_bytes());
        let corrupt = write_file(&dir, "corrupt.ape", &corrupt);

        let formatter = OutputFormatter::new(OutputFormat::Json);
        let mut out = Vec::new();
        let failed = write_items(&[missing, corrupt, good.clone()], &ScanOptions::default(), &formatter, &mut out).unwrap();

        assert_eq!(failed, 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("good.ape"));
        assert!(text.contains("\"Title\""));
    }
}
