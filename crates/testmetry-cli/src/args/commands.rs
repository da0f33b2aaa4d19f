use super::enums::{ResourceArg, ScopeArg};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Query test sessions")]
    Sessions {
        #[command(subcommand)]
        command: SessionCommand,
    },

    #[command(about = "Query measurement records")]
    Metrics {
        #[command(subcommand)]
        command: MetricCommand,
    },

    #[command(about = "Query execution contexts")]
    Contexts {
        #[command(subcommand)]
        command: ContextCommand,
    },

    #[command(about = "Query component groupings")]
    Components {
        #[command(subcommand)]
        command: ComponentCommand,
    },

    #[command(about = "Query pipelines and their builds")]
    Pipelines {
        #[command(subcommand)]
        command: PipelineCommand,
    },

    #[command(about = "Rank metrics by resource consumption")]
    Resources {
        #[command(subcommand)]
        command: ResourceCommand,
    },

    #[command(about = "Export query results to files")]
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },

    #[command(about = "Manage the client configuration")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    #[command(about = "List sessions, optionally narrowed by tags")]
    List {
        /// Tag constraint, NAME or NAME=VALUE. Repeatable.
        #[arg(long = "tag", value_name = "NAME[=VALUE]")]
        tags: Vec<String>,

        /// Match sessions carrying any constraint instead of all of them
        #[arg(long)]
        any: bool,
    },

    #[command(about = "Count sessions")]
    Count,

    #[command(about = "Show one session")]
    Show {
        /// Session identifier
        id: String,
    },
}

#[derive(Subcommand)]
pub enum MetricCommand {
    #[command(about = "List metrics, optionally narrowed to one slice")]
    List {
        #[command(flatten)]
        filter: MetricFilterArgs,
    },

    #[command(about = "Count metrics")]
    Count {
        /// Count only the metrics of one session
        #[arg(long, value_name = "ID")]
        session: Option<String>,

        /// Count only the metrics of one execution context
        #[arg(long, value_name = "ID")]
        context: Option<String>,

        /// Count only the metrics of sessions at one SCM reference
        #[arg(long, value_name = "REF")]
        scm: Option<String>,
    },
}

/// Narrowing flags shared by `metrics list` and `export metrics`.
/// At most one slice may be selected; `--component` alone is a slice,
/// next to `--variant` it just restricts the variant lookup.
#[derive(Args)]
pub struct MetricFilterArgs {
    /// Metrics of one session
    #[arg(long, value_name = "ID")]
    pub session: Option<String>,

    /// Metrics of one execution context
    #[arg(long, value_name = "ID")]
    pub context: Option<String>,

    /// Metrics of sessions at one SCM reference
    #[arg(long, value_name = "REF")]
    pub scm: Option<String>,

    /// Metrics measured at one scope
    #[arg(long, value_name = "SCOPE")]
    pub scope: Option<ScopeArg>,

    /// Metrics of one item name
    #[arg(long, value_name = "NAME")]
    pub item: Option<String>,

    /// Metrics whose item name starts with a prefix
    #[arg(long, value_name = "PREFIX")]
    pub item_prefix: Option<String>,

    /// Metrics whose variant starts with a prefix
    #[arg(long, value_name = "PREFIX")]
    pub variant_prefix: Option<String>,

    /// Metrics of one exact variant
    #[arg(long, value_name = "NAME")]
    pub variant: Option<String>,

    /// Metrics of one component, or the variant lookup restricted to it
    #[arg(long, value_name = "NAME")]
    pub component: Option<String>,

    /// Metrics carrying no component
    #[arg(long, conflicts_with = "component")]
    pub no_component: bool,
}

#[derive(Subcommand)]
pub enum ContextCommand {
    #[command(about = "List execution contexts")]
    List,

    #[command(about = "Count execution contexts")]
    Count,

    #[command(about = "Show one execution context")]
    Show {
        /// Context identifier
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ComponentCommand {
    #[command(about = "List component names, the unassigned one included")]
    List,

    #[command(about = "Count named components")]
    Count,

    #[command(about = "List pipelines that ran a component's tests")]
    Pipelines {
        /// Component name
        component: String,
    },

    #[command(about = "List builds of one pipeline that ran a component's tests")]
    Builds {
        /// Component name
        component: String,
        /// Pipeline name
        pipeline: String,
    },
}

#[derive(Subcommand)]
pub enum PipelineCommand {
    #[command(about = "List pipeline names found in session tags")]
    List,

    #[command(about = "List builds of one pipeline")]
    Builds {
        /// Pipeline name
        pipeline: String,
    },

    #[command(about = "List the sessions of one build")]
    Sessions {
        /// Pipeline name
        pipeline: String,
        /// Build number
        build: String,
    },
}

#[derive(Subcommand)]
pub enum ResourceCommand {
    #[command(about = "Heaviest consumers of a resource")]
    Top {
        #[command(flatten)]
        args: RankingArgs,
    },

    #[command(about = "Lightest consumers of a resource")]
    Lowest {
        #[command(flatten)]
        args: RankingArgs,
    },
}

#[derive(Args)]
pub struct RankingArgs {
    /// Resource to rank by
    #[arg(long, value_name = "RESOURCE")]
    pub by: ResourceArg,

    /// Number of rows to return (backends cap this at 500)
    #[arg(short = 'n', long = "limit", value_name = "N", default_value_t = 10)]
    pub limit: usize,

    /// Restrict the ranking to one component
    #[arg(long, value_name = "NAME", conflicts_with_all = ["pipeline", "build"])]
    pub component: Option<String>,

    /// Restrict the ranking to one pipeline
    #[arg(long, value_name = "NAME")]
    pub pipeline: Option<String>,

    /// Restrict the ranking to one build of --pipeline
    #[arg(long, value_name = "NO", requires = "pipeline")]
    pub build: Option<String>,
}

#[derive(Subcommand)]
pub enum ExportCommand {
    #[command(about = "Write metrics to a CSV file, session tags and context fields joined in")]
    Metrics {
        /// Output file path
        #[arg(short = 'o', long, value_name = "FILE")]
        output: PathBuf,

        #[command(flatten)]
        filter: MetricFilterArgs,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Show the config file and the resolved source")]
    Show,

    #[command(about = "Write a config file pointing at a source")]
    Init {
        /// Telemetry source to record: a store file path or a server URL
        source: String,
    },
}
