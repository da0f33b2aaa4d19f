//! Plain-text rendering for query results.
//!
//! Views render through `fmt::Display` so handlers stay print-only and
//! tests can assert on exact strings. Color applies only when stdout is
//! a terminal, keeping piped output grep-clean.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::fmt;
use testmetry_sdk::COUNT_UNAVAILABLE;
use testmetry_types::{Context, Contexts, Metric, Metrics, Resource, Sessions, Tags};

/// Print a count the way scripts expect it: the bare number on stdout,
/// with the unavailable sentinel flagged on stderr.
pub fn print_count(count: i64) {
    println!("{}", count);
    if count == COUNT_UNAVAILABLE {
        eprintln!("warning: backend unavailable");
    }
}

fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Color a cell that was already padded. ANSI escapes inside a width
/// spec would count against the column width.
fn accent(text: &str) -> String {
    if stdout_is_tty() {
        format!("{}", text.yellow())
    } else {
        text.to_string()
    }
}

fn heading(text: &str) -> String {
    if stdout_is_tty() {
        format!("{}", text.bold())
    } else {
        text.to_string()
    }
}

/// Truncate to `max` characters on a char boundary, ellipsis included.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max - 3).collect();
    format!("{}...", kept)
}

fn tags_line(tags: &Tags) -> String {
    tags.iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn component_cell(component: &str) -> &str {
    if component.is_empty() { "-" } else { component }
}

fn resource_value(metric: &Metric, resource: Resource) -> f64 {
    match resource {
        Resource::TotalTime => metric.wall_time,
        Resource::UserTime => metric.user_time,
        Resource::KernelTime => metric.kernel_time,
        Resource::Cpu => metric.cpu_usage,
        Resource::Memory => metric.memory_usage,
    }
}

// --- Sessions ---

pub struct SessionsView<'a> {
    sessions: &'a Sessions,
}

impl<'a> SessionsView<'a> {
    pub fn new(sessions: &'a Sessions) -> Self {
        Self { sessions }
    }
}

impl fmt::Display for SessionsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            heading(&format!(
                "{:<10} {:<9} {:<19} TAGS",
                "ID", "SCM", "RUN_DATE"
            ))
        )?;
        for session in self.sessions.iter() {
            // NaiveDateTime's Display ignores width specs, so render it
            // to a String before padding.
            let run_date = session.run_date.to_string();
            writeln!(
                f,
                "{} {:<9} {:<19} {}",
                accent(&format!("{:<10}", session.h)),
                session.scm_ref,
                run_date,
                tags_line(&session.tags),
            )?;
        }
        Ok(())
    }
}

// --- Contexts ---

pub struct ContextsView<'a> {
    contexts: &'a Contexts,
}

impl<'a> ContextsView<'a> {
    pub fn new(contexts: &'a Contexts) -> Self {
        Self { contexts }
    }
}

impl fmt::Display for ContextsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            heading(&format!(
                "{:<10} {:<26} {:>4} {:>5} {:>7} {:<6} SYSTEM",
                "ID", "HOST", "CPUS", "MHZ", "RAM_MB", "ARCH"
            ))
        )?;
        for context in self.contexts.iter() {
            writeln!(
                f,
                "{} {:<26} {:>4} {:>5} {:>7} {:<6} {}",
                accent(&format!("{:<10}", context.h)),
                truncate(&context.machine_node, 26),
                context.cpu_count,
                context.cpu_freq,
                context.ram_total,
                context.machine_arch,
                context.sys_info,
            )?;
        }
        Ok(())
    }
}

/// Detail block for `contexts show`, shaped like the session one.
pub struct ContextView<'a> {
    context: &'a Context,
}

impl<'a> ContextView<'a> {
    pub fn new(context: &'a Context) -> Self {
        Self { context }
    }
}

impl fmt::Display for ContextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = self.context;
        writeln!(f, "{}:", context.h)?;
        writeln!(f, "    host: {}", context.machine_node)?;
        writeln!(
            f,
            "    cpu: {} x {} ({}) @ {} MHz",
            context.cpu_count, context.cpu_type, context.cpu_vendor, context.cpu_freq
        )?;
        writeln!(f, "    ram_mb: {}", context.ram_total)?;
        writeln!(
            f,
            "    machine: {} / {}",
            context.machine_type, context.machine_arch
        )?;
        writeln!(f, "    system: {}", context.sys_info)?;
        writeln!(f, "    python: {}", context.py_info)?;
        Ok(())
    }
}

// --- Metrics ---

pub struct MetricsView<'a> {
    metrics: &'a Metrics,
}

impl<'a> MetricsView<'a> {
    pub fn new(metrics: &'a Metrics) -> Self {
        Self { metrics }
    }
}

impl fmt::Display for MetricsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            heading(&format!(
                "{:<44} {:<8} {:<12} {:>8} {:>6} {:>8}  SESSION",
                "VARIANT", "KIND", "COMPONENT", "WALL_S", "CPU", "MEM_MB"
            ))
        )?;
        for metric in self.metrics.iter() {
            writeln!(
                f,
                "{} {:<8} {:<12} {:>8.3} {:>6.1} {:>8.1}  {}",
                accent(&format!("{:<44}", truncate(&metric.variant, 44))),
                metric.kind.as_str(),
                component_cell(&metric.component),
                metric.wall_time,
                metric.cpu_usage,
                metric.memory_usage,
                metric.session_h,
            )?;
        }
        Ok(())
    }
}

/// Ranked metrics with the ranking resource as its own column.
pub struct RankingView<'a> {
    metrics: &'a Metrics,
    resource: Resource,
}

impl<'a> RankingView<'a> {
    pub fn new(metrics: &'a Metrics, resource: Resource) -> Self {
        Self { metrics, resource }
    }
}

impl fmt::Display for RankingView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.resource.as_str().to_uppercase();
        writeln!(
            f,
            "{}",
            heading(&format!(
                "{:>3} {:>11} {:<44} {:<12} SESSION",
                "#", label, "VARIANT", "COMPONENT"
            ))
        )?;
        for (index, metric) in self.metrics.iter().enumerate() {
            writeln!(
                f,
                "{:>3} {:>11.3} {} {:<12} {}",
                index + 1,
                resource_value(metric, self.resource),
                accent(&format!("{:<44}", truncate(&metric.variant, 44))),
                component_cell(&metric.component),
                metric.session_h,
            )?;
        }
        Ok(())
    }
}

// --- Plain name lists ---

/// One name per line. Components, pipelines and builds print this way
/// so the output feeds straight into shell pipelines.
pub struct NamesView<'a> {
    names: &'a [String],
}

impl<'a> NamesView<'a> {
    pub fn new(names: &'a [String]) -> Self {
        Self { names }
    }
}

impl fmt::Display for NamesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in self.names {
            writeln!(f, "{}", name)?;
        }
        Ok(())
    }
}
