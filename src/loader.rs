use crate::{
    document::sample_document,
    fetch::{Transport, fetch_and_parse},
    render::{self, OutputRegion},
};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

pub const DATA_PARAM: &str = "data";

/// The hosting page: its address and the region this crate writes into.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub address: Url,
    pub region: OutputRegion,
}

impl PageContext {
    pub fn new(address: Url, region_id: &str) -> Self {
        Self {
            address,
            region: OutputRegion::new(region_id),
        }
    }
}

/// Where the document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    Sample,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TerminalState {
    Rendered,
    ErrorShown,
    SampleRendered,
}

/// Read the `data` query parameter. An empty value counts as absent.
pub fn resolve_data_source(address: &Url) -> DataSource {
    address
        .query_pairs()
        .find(|(k, _)| k == DATA_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .map(DataSource::Remote)
        .unwrap_or(DataSource::Sample)
}

/// Set `data` on a page address, replacing any existing value.
pub fn with_data_param(address: &Url, locator: &str) -> Url {
    let kept: Vec<(String, String)> = address
        .query_pairs()
        .filter(|(k, _)| k != DATA_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut out = address.clone();
    {
        let mut q = out.query_pairs_mut();
        q.clear();
        for (k, v) in &kept {
            q.append_pair(k, v);
        }
        q.append_pair(DATA_PARAM, locator);
    }
    out
}

/// Entry point, called once: welcome card, then load and render.
pub async fn run<T: Transport>(page: &mut PageContext, transport: &T) -> TerminalState {
    render::welcome(&mut page.region);
    debug!(region = page.region.id(), "welcome shown");
    load(page, transport).await
}

async fn load<T: Transport>(page: &mut PageContext, transport: &T) -> TerminalState {
    match resolve_data_source(&page.address) {
        DataSource::Remote(locator) => {
            info!(%locator, "loading probe data");
            match fetch_and_parse(transport, &page.address, &locator).await {
                Ok(doc) => {
                    render::render(&mut page.region, &doc);
                    info!(results = doc.results.len(), "probe results rendered");
                    TerminalState::Rendered
                }
                Err(err) => {
                    let message = format!("Failed to load probe data: {}", err.message());
                    warn!("{message}");
                    render::display_error(&mut page.region, &message);
                    TerminalState::ErrorShown
                }
            }
        }
        DataSource::Sample => {
            info!("no data parameter; rendering sample document");
            render::render(&mut page.region, &sample_document());
            TerminalState::SampleRendered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("url")
    }

    #[test]
    fn data_param_selects_source() {
        assert_eq!(
            resolve_data_source(&url("http://h/index.html?data=r.json")),
            DataSource::Remote("r.json".into())
        );
        assert_eq!(
            resolve_data_source(&url("http://h/index.html?x=1&data=a%2Fb.json")),
            DataSource::Remote("a/b.json".into())
        );
        assert_eq!(resolve_data_source(&url("http://h/index.html")), DataSource::Sample);
        assert_eq!(resolve_data_source(&url("http://h/index.html?data=")), DataSource::Sample);
    }

    #[test]
    fn first_data_param_wins() {
        assert_eq!(
            resolve_data_source(&url("http://h/?data=one&data=two")),
            DataSource::Remote("one".into())
        );
    }

    #[test]
    fn with_data_param_replaces() {
        let u = with_data_param(&url("http://h/index.html?data=old&theme=dark"), "new file.json");
        assert_eq!(resolve_data_source(&u), DataSource::Remote("new file.json".into()));
        assert_eq!(u.query_pairs().count(), 2);
        assert!(u.query_pairs().any(|(k, v)| k == "theme" && v == "dark"));
    }
}
