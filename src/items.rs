//! Loading the list of items to sort

use anyhow::Context as _;

use crate::cli::SortArgs;

/// Parse `content` as either a JSON array of strings or plain text, one item per line
pub fn parse_items(content: &str) -> anyhow::Result<Vec<String>> {
    let trimmed = content.trim();

    let items = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<String>>(trimmed)
            .context("File looks like JSON but failed to parse")?
    } else {
        trimmed.lines().map(|line| line.trim().to_string()).collect()
    };

    Ok(items
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .collect())
}

/// Load items from the `--items` file and the `--item` flags.
///
/// Stdin is left alone, the answers are read from it.
pub fn load_items(args: &SortArgs) -> anyhow::Result<Vec<String>> {
    let mut items = Vec::new();

    if let Some(path) = &args.items {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read items file {}", path.display()))?;
        items = parse_items(&content)?;
    }

    items.extend(args.inline_items.iter().cloned());

    if items.is_empty() {
        anyhow::bail!("No items provided. Use --items <file> or --item <name>.");
    }

    Ok(items)
}
