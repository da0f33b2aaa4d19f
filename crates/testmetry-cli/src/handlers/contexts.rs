use crate::output::{self, ContextView, ContextsView};
use anyhow::{Result, bail};
use testmetry_sdk::Monitor;

pub fn list(monitor: &Monitor) -> Result<()> {
    let contexts = monitor.list_contexts();
    print!("{}", ContextsView::new(&contexts));
    Ok(())
}

pub fn count(monitor: &Monitor) -> Result<()> {
    output::print_count(monitor.count_contexts());
    Ok(())
}

pub fn show(monitor: &Monitor, id: &str) -> Result<()> {
    let Some(context) = monitor.get_context(id) else {
        bail!("no execution context '{}' in this source", id);
    };
    print!("{}", ContextView::new(&context));
    Ok(())
}
