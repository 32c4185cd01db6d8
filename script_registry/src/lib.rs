use std::path::{Path, PathBuf};

use core_types::{ScriptCatalog, ScriptDescriptor, ScriptId};
use error::RegistryError;

pub mod error;

/// File extension of runnable scripts.
const SCRIPT_EXTENSION: &str = "py";

/// Words kept fully capitalized in display names.
const ACRONYMS: [&str; 14] = [
    "API", "CSV", "DNS", "EXIF", "HTTP", "HTTPS", "JSON", "MD5", "OOP", "PIL", "SHA1", "SHA256",
    "TCP", "URL",
];

/// Scans one level of subdirectories under `assignments_dir` for runnable
/// scripts and builds the ordered catalog.
///
/// The identifier is the leading numeric prefix of the containing directory
/// name, falling back to the prefix of the file stem. Directories without a
/// matching file are reserved future slots and are skipped silently. The
/// scan always reflects current disk state; nothing is cached across calls,
/// and a missing assignments directory yields an empty catalog.
pub fn discover(assignments_dir: &Path) -> Result<ScriptCatalog, RegistryError> {
    if !assignments_dir.is_dir() {
        tracing::debug!(
            "Assignments directory {} does not exist",
            assignments_dir.display()
        );
        return Ok(ScriptCatalog::default());
    }

    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(assignments_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    // read_dir order is platform-dependent; sort so that "later-discovered"
    // is well defined for duplicate identifiers.
    subdirs.sort();

    let mut descriptors = Vec::new();
    for dir in subdirs {
        let dir_name = dir
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let dir_id = numeric_prefix(&dir_name);

        let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext == SCRIPT_EXTENSION)
            })
            .collect();
        files.sort();

        for file in files {
            let stem = file
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();
            match dir_id.or_else(|| numeric_prefix(&stem)) {
                Some(id) => descriptors.push(ScriptDescriptor {
                    id,
                    display_name: display_name(&stem),
                    path: file,
                }),
                None => {
                    tracing::debug!("Skipping {} without a numeric prefix", file.display());
                }
            }
        }
    }

    tracing::debug!("Discovered {} scripts", descriptors.len());
    Ok(ScriptCatalog::from_descriptors(descriptors))
}

/// Leading digits of a directory or file stem, e.g. `03_hashing` -> 3.
fn numeric_prefix(name: &str) -> Option<ScriptId> {
    let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Friendly title derived from a file stem: numeric prefix stripped,
/// separators spaced, words title-cased with known acronyms restored.
fn display_name(stem: &str) -> String {
    let rest = stem.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = rest.trim_start_matches(['-', '_']);
    let base = if rest.is_empty() { stem } else { rest };

    let words: Vec<String> = base
        .split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(titlecase_word)
        .collect();
    if words.is_empty() {
        stem.to_string()
    } else {
        words.join(" ")
    }
}

fn titlecase_word(word: &str) -> String {
    if let Some(acronym) = ACRONYMS
        .iter()
        .find(|acronym| acronym.eq_ignore_ascii_case(word))
    {
        return acronym.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn add_script(root: &Path, dir: &str, file: &str) {
        let dir_path = root.join(dir);
        std::fs::create_dir_all(&dir_path).unwrap();
        std::fs::write(dir_path.join(file), "print('hello')\n").unwrap();
    }

    #[test]
    fn test_discover_orders_by_numeric_prefix() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        add_script(root, "03_hashing_forensics", "03_hashing_forensics.py");
        add_script(root, "01_string_search", "01_string_search.py");
        add_script(root, "10_web_crawler", "10_web_crawler.py");

        let catalog = discover(root).unwrap();
        let ids: Vec<_> = catalog.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3, 10]);
    }

    #[test]
    fn test_discover_skips_reserved_slots_and_other_files() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        add_script(root, "01_string_search", "01_string_search.py");
        std::fs::create_dir(root.join("05_reserved")).unwrap();
        std::fs::write(root.join("01_string_search").join("notes.txt"), "").unwrap();
        std::fs::write(root.join("stray.py"), "").unwrap();

        let catalog = discover(root).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().id, 1);
    }

    #[test]
    fn test_identifier_falls_back_to_file_stem() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        add_script(root, "extras", "07_memory_regex_extract.py");

        let catalog = discover(root).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().id, 7);
    }

    #[test]
    fn test_no_numeric_prefix_anywhere_is_skipped() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        add_script(root, "extras", "scratchpad.py");

        let catalog = discover(root).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_duplicate_identifier_later_entry_wins() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        add_script(root, "02_firewall_parser", "02_firewall_parser.py");
        add_script(root, "02_zz_rewrite", "02_zz_rewrite.py");

        let catalog = discover(root).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().display_name, "Zz Rewrite");
    }

    #[test]
    fn test_discovery_is_idempotent() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        add_script(root, "01_string_search", "01_string_search.py");
        add_script(root, "06_exif_geotag_extractor", "06_exif_geotag_extractor.py");

        let first = discover(root).unwrap();
        let second = discover(root).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_assignments_dir_yields_empty_catalog() {
        let temp_dir = tempdir().unwrap();
        let catalog = discover(&temp_dir.path().join("assignments")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("01_string_search"), "String Search");
        assert_eq!(
            display_name("06_exif_geotag_extractor"),
            "EXIF Geotag Extractor"
        );
        assert_eq!(display_name("04_file_processor_oop"), "File Processor OOP");
        assert_eq!(display_name("05_pil_search_images"), "PIL Search Images");
        assert_eq!(display_name("99"), "99");
    }
}
