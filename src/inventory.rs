//! Sphinx inventories.
//!
//! An `objects.inv` (version 2) file starts with four text header lines,
//! followed by a zlib-compressed body of one item per line:
//!
//! ```text
//! name domain:role priority uri display-name
//! ```
//!
//! A URI ending with `$` is completed with the item name, and a display name
//! of `-` means "same as the name".

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::{BufRead, BufReader, Read};
use std::sync::OnceLock;

use flate2::read::ZlibDecoder;
use regex::Regex;
use tracing::debug;

use crate::core::{HandlerError, HandlerResult};

/// Domains kept when none are configured.
pub const DEFAULT_DOMAINS: &[&str] = &["py"];

/// One entry of an inventory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InventoryItem {
    pub name: String,
    pub domain: String,
    pub role: String,
    pub priority: String,
    /// URI relative to the inventory base URL, with `$` already expanded
    pub uri: String,
    pub dispname: String,
}

fn item_regex() -> &'static Regex {
    static ITEM: OnceLock<Regex> = OnceLock::new();
    ITEM.get_or_init(|| {
        Regex::new(r"^(.+?)\s+(\S+?):(\S+)\s+(-?\d+)\s+(\S*)\s+(.*)$")
            .expect("item pattern is valid")
    })
}

impl InventoryItem {
    fn parse_line(line: &str) -> Option<Self> {
        let captures = item_regex().captures(line)?;
        let name = captures[1].to_string();
        let mut uri = captures[5].to_string();
        if uri.ends_with('$') {
            uri.pop();
            uri.push_str(&name);
        }
        let dispname = match &captures[6] {
            "-" => name.clone(),
            other => other.to_string(),
        };
        Some(Self {
            domain: captures[2].to_string(),
            role: captures[3].to_string(),
            priority: captures[4].to_string(),
            name,
            uri,
            dispname,
        })
    }
}

/// Parse a version 2 Sphinx inventory, keeping items of the given domains.
///
/// # Errors
///
/// [`HandlerError::Inventory`] when the header is not a version 2 header or
/// the body cannot be decompressed.
pub fn parse_sphinx<R: Read>(
    reader: R,
    url: &str,
    domains: &[String],
) -> HandlerResult<Vec<InventoryItem>> {
    let invalid = |reason: String| HandlerError::Inventory {
        url: url.to_string(),
        reason,
    };
    let mut reader = BufReader::new(reader);
    let mut header = Vec::new();
    for _ in 0..4 {
        let mut line = String::new();
        reader.read_line(&mut line).map_err(|error| invalid(error.to_string()))?;
        header.push(line.trim_end().to_string());
    }
    if header[0] != "# Sphinx inventory version 2" {
        return Err(invalid(format!("unsupported inventory header '{}'", header[0])));
    }

    let mut body = String::new();
    ZlibDecoder::new(reader)
        .read_to_string(&mut body)
        .map_err(|error| invalid(format!("could not decompress inventory: {error}")))?;

    let items: Vec<InventoryItem> = body
        .lines()
        .filter_map(InventoryItem::parse_line)
        .filter(|item| domains.iter().any(|domain| domain == &item.domain))
        .collect();
    debug!("Parsed {} items from inventory {url}", items.len());
    Ok(items)
}

/// Join like a POSIX path: an absolute `uri` replaces the base.
fn join_url(base: &str, uri: &str) -> String {
    if uri.starts_with('/') || base.is_empty() {
        uri.to_string()
    } else if base.ends_with('/') {
        format!("{base}{uri}")
    } else {
        format!("{base}/{uri}")
    }
}

fn dirname(url: &str) -> &str {
    match url.rfind('/') {
        Some(0) => "/",
        Some(index) => url[..index].trim_end_matches('/'),
        None => "",
    }
}

/// Identifiers and absolute URLs of the items of an inventory.
///
/// `base_url` defaults to the directory of `url`, `domains` to `["py"]`.
/// Items appearing several times keep their last URL.
///
/// # Errors
///
/// Same as [`parse_sphinx`].
pub fn load_inventory<R: Read>(
    reader: R,
    url: &str,
    base_url: Option<&str>,
    domains: Option<&[String]>,
) -> HandlerResult<Vec<(String, String)>> {
    let default_domains: Vec<String> = DEFAULT_DOMAINS.iter().map(ToString::to_string).collect();
    let domains = match domains {
        Some(domains) if !domains.is_empty() => domains,
        _ => &default_domains,
    };
    let base_url = base_url.unwrap_or_else(|| dirname(url));

    let mut entries: Vec<(String, String)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for item in parse_sphinx(reader, url, domains)? {
        let location = join_url(base_url, &item.uri);
        match positions.entry(item.name) {
            Entry::Occupied(position) => entries[*position.get()].1 = location,
            Entry::Vacant(position) => {
                entries.push((position.key().clone(), location));
                position.insert(entries.len() - 1);
            }
        }
    }
    Ok(entries)
}

/// Read an inventory from a URL or a local file.
///
/// # Errors
///
/// [`HandlerError::Inventory`] on network failures and non-success statuses,
/// [`HandlerError::Io`] when a local file cannot be read.
pub async fn fetch_inventory(url: &str) -> HandlerResult<Vec<u8>> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return tokio::fs::read(url).await.map_err(|error| HandlerError::Io {
            operation: "reading inventory".to_string(),
            path: url.to_string(),
            message: error.to_string(),
        });
    }

    debug!("Fetching inventory from: {url}");
    let invalid = |reason: String| HandlerError::Inventory {
        url: url.to_string(),
        reason,
    };
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| invalid(format!("failed to fetch inventory: {error}")))?;
    if !response.status().is_success() {
        return Err(invalid(format!("HTTP {}", response.status())));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|error| invalid(format!("failed to read inventory content: {error}")))?;
    Ok(bytes.to_vec())
}
