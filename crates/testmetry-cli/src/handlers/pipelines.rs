use crate::output::{NamesView, SessionsView};
use anyhow::Result;
use testmetry_sdk::Monitor;

pub fn list(monitor: &Monitor) -> Result<()> {
    let names = monitor.list_pipelines();
    print!("{}", NamesView::new(&names));
    Ok(())
}

pub fn builds(monitor: &Monitor, pipeline: &str) -> Result<()> {
    let names = monitor.list_pipeline_builds(pipeline);
    print!("{}", NamesView::new(&names));
    Ok(())
}

pub fn sessions(monitor: &Monitor, pipeline: &str, build: &str) -> Result<()> {
    let sessions = monitor.list_build_sessions(pipeline, build);
    print!("{}", SessionsView::new(&sessions));
    Ok(())
}
