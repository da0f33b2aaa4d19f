use crate::args::MetricFilterArgs;
use crate::output::{self, MetricsView};
use anyhow::{Result, bail};
use testmetry_sdk::Monitor;
use testmetry_types::Metrics;

pub fn list(monitor: &Monitor, filter: &MetricFilterArgs) -> Result<()> {
    let metrics = select(monitor, filter)?;
    print!("{}", MetricsView::new(&metrics));
    Ok(())
}

pub fn count(
    monitor: &Monitor,
    session: Option<&str>,
    context: Option<&str>,
    scm: Option<&str>,
) -> Result<()> {
    output::print_count(monitor.count_metrics(session, context, scm));
    Ok(())
}

/// Run the one metric query the filter flags select. Also used by
/// `export metrics`, so exports narrow exactly like listings do.
pub fn select(monitor: &Monitor, args: &MetricFilterArgs) -> Result<Metrics> {
    if slice_count(args) > 1 {
        bail!("metric filters are mutually exclusive; pass at most one");
    }

    if let Some(h) = &args.session {
        return Ok(monitor.list_session_metrics(h));
    }
    if let Some(h) = &args.context {
        return Ok(monitor.list_context_metrics(h));
    }
    if let Some(scm) = &args.scm {
        return Ok(monitor.list_metrics_by_scm_id(scm));
    }
    if let Some(scope) = args.scope {
        return Ok(monitor.list_metrics_by_scope(scope.scope()));
    }
    if let Some(item) = &args.item {
        return Ok(monitor.list_item_metrics(item));
    }
    if let Some(prefix) = &args.item_prefix {
        return Ok(monitor.list_metrics_from_pattern(Some(prefix), None));
    }
    if let Some(prefix) = &args.variant_prefix {
        return Ok(monitor.list_metrics_from_pattern(None, Some(prefix)));
    }
    if let Some(variant) = &args.variant {
        return Ok(monitor.list_metrics_of_variant(variant, args.component.as_deref()));
    }
    if args.no_component {
        return Ok(monitor.list_component_metrics(None));
    }
    if let Some(component) = &args.component {
        return Ok(monitor.list_component_metrics(Some(component)));
    }
    Ok(monitor.list_metrics())
}

/// How many narrowing slices the flags select. `--component` next to
/// `--variant` does not count as its own slice.
fn slice_count(args: &MetricFilterArgs) -> usize {
    [
        args.session.is_some(),
        args.context.is_some(),
        args.scm.is_some(),
        args.scope.is_some(),
        args.item.is_some(),
        args.item_prefix.is_some(),
        args.variant_prefix.is_some(),
        args.variant.is_some(),
        args.component.is_some() && args.variant.is_none(),
        args.no_component,
    ]
    .into_iter()
    .filter(|picked| *picked)
    .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_filter() -> MetricFilterArgs {
        MetricFilterArgs {
            session: None,
            context: None,
            scm: None,
            scope: None,
            item: None,
            item_prefix: None,
            variant_prefix: None,
            variant: None,
            component: None,
            no_component: false,
        }
    }

    #[test]
    fn no_flags_select_no_slice() {
        assert_eq!(slice_count(&no_filter()), 0);
    }

    #[test]
    fn each_flag_is_one_slice() {
        let args = MetricFilterArgs {
            scm: Some("a3f2c1d".to_string()),
            ..no_filter()
        };
        assert_eq!(slice_count(&args), 1);

        let args = MetricFilterArgs {
            no_component: true,
            ..no_filter()
        };
        assert_eq!(slice_count(&args), 1);
    }

    #[test]
    fn component_folds_into_a_variant_lookup() {
        let args = MetricFilterArgs {
            variant: Some("test_eval_constant[big]".to_string()),
            component: Some("engine".to_string()),
            ..no_filter()
        };
        assert_eq!(slice_count(&args), 1);
    }

    #[test]
    fn two_unrelated_flags_are_two_slices() {
        let args = MetricFilterArgs {
            session: Some("ses-0001".to_string()),
            scm: Some("a3f2c1d".to_string()),
            ..no_filter()
        };
        assert_eq!(slice_count(&args), 2);
    }
}
