use crate::output::{self, NamesView};
use anyhow::Result;
use testmetry_sdk::Monitor;

pub fn list(monitor: &Monitor) -> Result<()> {
    // The unassigned component is a real slot; name it so the line is
    // visible in a pipe.
    let names: Vec<String> = monitor
        .list_components()
        .into_iter()
        .map(|name| {
            if name.is_empty() {
                "(none)".to_string()
            } else {
                name
            }
        })
        .collect();
    print!("{}", NamesView::new(&names));
    Ok(())
}

pub fn count(monitor: &Monitor) -> Result<()> {
    output::print_count(monitor.count_components());
    Ok(())
}

pub fn pipelines(monitor: &Monitor, component: &str) -> Result<()> {
    let names = monitor.list_component_pipelines(component);
    print!("{}", NamesView::new(&names));
    Ok(())
}

pub fn builds(monitor: &Monitor, component: &str, pipeline: &str) -> Result<()> {
    let names = monitor.list_component_pipeline_builds(component, pipeline);
    print!("{}", NamesView::new(&names));
    Ok(())
}
