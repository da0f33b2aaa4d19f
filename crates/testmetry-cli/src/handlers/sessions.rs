use crate::output::{self, SessionsView};
use anyhow::{Result, bail};
use testmetry_sdk::{Monitor, TagFilter};
use testmetry_types::MatchMode;

pub fn list(monitor: &Monitor, tags: &[String], any: bool) -> Result<()> {
    let filter = parse_tag_filter(tags, any)?;
    let sessions = monitor.list_sessions(&filter);
    print!("{}", SessionsView::new(&sessions));
    Ok(())
}

pub fn count(monitor: &Monitor) -> Result<()> {
    output::print_count(monitor.count_sessions());
    Ok(())
}

pub fn show(monitor: &Monitor, id: &str) -> Result<()> {
    let Some(session) = monitor.get_session(id) else {
        bail!("no session '{}' in this source", id);
    };
    print!("{}", session);
    Ok(())
}

/// Build a [`TagFilter`] from raw `--tag` arguments. `NAME=VALUE` pins a
/// value, bare `NAME` requires only that the tag is set.
fn parse_tag_filter(tags: &[String], any: bool) -> Result<TagFilter> {
    let mut filter = TagFilter::new();
    for raw in tags {
        let (name, value) = match raw.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (raw.as_str(), None),
        };
        if name.is_empty() {
            bail!("empty tag name in '--tag {}'", raw);
        }
        filter = match value {
            Some(value) => filter.tag_value(name, value),
            None => filter.tag(name),
        };
    }
    if any {
        filter = filter.mode(MatchMode::Any);
    }
    Ok(filter)
}
