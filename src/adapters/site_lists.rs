use crate::utils::error::Result;
use crate::utils::validation::validate_url;
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_WEBSITES_FILE: &str = "websites.txt";
pub const DEFAULT_RECIPIENTS_FILE: &str = "recipients.txt";

/// 讀取網址清單：去除空行與重複項目，並把整理後的清單寫回原檔
pub fn load_urls_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let mut seen = HashSet::new();
    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect();

    for url in &urls {
        if let Err(e) = validate_url("websites", url) {
            tracing::warn!("⚠️ {}", e);
        }
    }

    let mut rewritten = urls.join("\n");
    if !rewritten.is_empty() {
        rewritten.push('\n');
    }
    std::fs::write(path, rewritten)?;

    tracing::debug!("Loaded {} unique URL(s) from {}", urls.len(), path.display());
    Ok(urls)
}

/// Recipients are trimmed; blank lines are dropped, duplicates kept.
pub fn load_recipients_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
