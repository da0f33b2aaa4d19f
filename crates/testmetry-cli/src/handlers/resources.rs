use crate::args::RankingArgs;
use crate::output::RankingView;
use anyhow::Result;
use testmetry_sdk::Monitor;
use testmetry_types::Ranking;

pub fn handle(monitor: &Monitor, ranking: Ranking, args: &RankingArgs) -> Result<()> {
    let resource = args.by.resource();

    let metrics = if let Some(component) = &args.component {
        monitor.list_metrics_resources_from_component(resource, component, ranking, args.limit)
    } else if let (Some(pipeline), Some(build)) = (&args.pipeline, &args.build) {
        monitor.list_metrics_resources_from_build(resource, pipeline, build, ranking, args.limit)
    } else if let Some(pipeline) = &args.pipeline {
        monitor.list_metrics_resources_from_pipeline(resource, pipeline, ranking, args.limit)
    } else {
        monitor.list_metrics_resources(resource, ranking, args.limit)
    };

    print!("{}", RankingView::new(&metrics, resource));
    Ok(())
}
