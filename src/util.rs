use anyhow::{Context, Result};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use url::Url;

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

pub fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// `file://<cwd>/index.html`, the address used when none is configured.
pub fn default_page_address() -> Result<Url> {
    let cwd = std::env::current_dir().with_context(|| "current_dir")?;
    let dir = Url::from_directory_path(&cwd)
        .map_err(|_| anyhow::anyhow!("cwd is not absolute: {}", cwd.display()))?;
    dir.join("index.html").with_context(|| "building default page address")
}

/// Parse a page address. Anything that is not an absolute URL is taken as a
/// local file path.
pub fn parse_page_address(raw: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(raw) {
        return Ok(url);
    }
    let (path, query) = match raw.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (raw, None),
    };
    let path = Path::new(path);
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().with_context(|| "current_dir")?.join(path)
    };
    let mut url = Url::from_file_path(&abs)
        .map_err(|_| anyhow::anyhow!("invalid page address: {raw}"))?;
    url.set_query(query);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_pass_through() {
        let u = parse_page_address("https://h.example/p/index.html?data=x.json").expect("parse");
        assert_eq!(u.host_str(), Some("h.example"));
        assert_eq!(u.query(), Some("data=x.json"));
    }

    #[test]
    fn paths_become_file_urls() {
        let u = parse_page_address("site/index.html?data=r.json").expect("parse");
        assert_eq!(u.scheme(), "file");
        assert!(u.path().ends_with("/site/index.html"));
        assert_eq!(u.query(), Some("data=r.json"));
    }

    #[test]
    fn default_address_is_index_in_cwd() {
        let u = default_page_address().expect("default");
        assert_eq!(u.scheme(), "file");
        assert!(u.path().ends_with("/index.html"));
    }
}
