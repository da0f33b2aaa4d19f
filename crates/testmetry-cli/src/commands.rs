use crate::args::{
    Cli, Commands, ComponentCommand, ConfigCommand, ContextCommand, ExportCommand, MetricCommand,
    PipelineCommand, ResourceCommand, SessionCommand,
};
use crate::config;
use crate::handlers;
use anyhow::{Context as _, Result};
use testmetry_sdk::Monitor;
use testmetry_types::Ranking;

pub fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        show_guidance();
        return Ok(());
    };

    match command {
        Commands::Config { command } => match command {
            ConfigCommand::Show => handlers::config::show(cli.source.as_deref()),
            ConfigCommand::Init { source } => handlers::config::init(&source),
        },

        Commands::Sessions { command } => {
            let monitor = connect(cli.source.as_deref())?;
            match command {
                SessionCommand::List { tags, any } => {
                    handlers::sessions::list(&monitor, &tags, any)
                }
                SessionCommand::Count => handlers::sessions::count(&monitor),
                SessionCommand::Show { id } => handlers::sessions::show(&monitor, &id),
            }
        }

        Commands::Metrics { command } => {
            let monitor = connect(cli.source.as_deref())?;
            match command {
                MetricCommand::List { filter } => handlers::metrics::list(&monitor, &filter),
                MetricCommand::Count {
                    session,
                    context,
                    scm,
                } => handlers::metrics::count(
                    &monitor,
                    session.as_deref(),
                    context.as_deref(),
                    scm.as_deref(),
                ),
            }
        }

        Commands::Contexts { command } => {
            let monitor = connect(cli.source.as_deref())?;
            match command {
                ContextCommand::List => handlers::contexts::list(&monitor),
                ContextCommand::Count => handlers::contexts::count(&monitor),
                ContextCommand::Show { id } => handlers::contexts::show(&monitor, &id),
            }
        }

        Commands::Components { command } => {
            let monitor = connect(cli.source.as_deref())?;
            match command {
                ComponentCommand::List => handlers::components::list(&monitor),
                ComponentCommand::Count => handlers::components::count(&monitor),
                ComponentCommand::Pipelines { component } => {
                    handlers::components::pipelines(&monitor, &component)
                }
                ComponentCommand::Builds {
                    component,
                    pipeline,
                } => handlers::components::builds(&monitor, &component, &pipeline),
            }
        }

        Commands::Pipelines { command } => {
            let monitor = connect(cli.source.as_deref())?;
            match command {
                PipelineCommand::List => handlers::pipelines::list(&monitor),
                PipelineCommand::Builds { pipeline } => {
                    handlers::pipelines::builds(&monitor, &pipeline)
                }
                PipelineCommand::Sessions { pipeline, build } => {
                    handlers::pipelines::sessions(&monitor, &pipeline, &build)
                }
            }
        }

        Commands::Resources { command } => {
            let monitor = connect(cli.source.as_deref())?;
            match command {
                ResourceCommand::Top { args } => {
                    handlers::resources::handle(&monitor, Ranking::Top, &args)
                }
                ResourceCommand::Lowest { args } => {
                    handlers::resources::handle(&monitor, Ranking::Lowest, &args)
                }
            }
        }

        Commands::Export { command } => {
            let monitor = connect(cli.source.as_deref())?;
            match command {
                ExportCommand::Metrics { output, filter } => {
                    handlers::export::metrics(&monitor, &output, &filter)
                }
            }
        }
    }
}

fn connect(flag: Option<&str>) -> Result<Monitor> {
    let source = config::resolve_source(flag)?;
    Monitor::connect(&source)
        .with_context(|| format!("cannot open telemetry source '{}'", source))
}

fn show_guidance() {
    println!("testmetry - test-execution telemetry queries\n");
    println!("Quick commands:");
    println!("  testmetry sessions list               # Recent test sessions");
    println!("  testmetry metrics count               # How many measurements are known");
    println!("  testmetry resources top --by memory   # Heaviest tests by memory");
    println!("  testmetry config init <SOURCE>        # Point the client at a store or server");
    println!();
    println!("For more commands:");
    println!("  testmetry --help");
}
