use std::fmt;

/// Granularity at which a measurement was taken.
///
/// `Package` aggregation is accepted from data sources but rarely produced
/// by collectors today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// A single test function.
    #[default]
    Function,
    /// Aggregate over one module run.
    Module,
    /// Aggregate over one package run.
    Package,
}

impl Scope {
    /// Lowercase form used by stores and the wire protocol.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Function => "function",
            Scope::Module => "module",
            Scope::Package => "package",
        }
    }

    /// Uppercase name folded into metric content hashes.
    pub fn name(self) -> &'static str {
        match self {
            Scope::Function => "FUNCTION",
            Scope::Module => "MODULE",
            Scope::Package => "PACKAGE",
        }
    }

    /// Case-insensitive parse. Unknown values map to `Package`.
    pub fn parse(value: &str) -> Scope {
        match value.to_ascii_lowercase().as_str() {
            "function" => Scope::Function,
            "module" => Scope::Module,
            _ => Scope::Package,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A measured quantity that metrics can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Real elapsed time, in seconds.
    TotalTime,
    /// Time spent in user mode, in seconds.
    UserTime,
    /// Time spent in kernel mode, in seconds.
    KernelTime,
    /// CPU usage ratio (1.0 is one core fully busy).
    Cpu,
    /// Memory used, in MB.
    Memory,
}

impl Resource {
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::TotalTime => "total_time",
            Resource::UserTime => "user_time",
            Resource::KernelTime => "kernel_time",
            Resource::Cpu => "cpu",
            Resource::Memory => "memory",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a resource ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ranking {
    /// Heaviest consumers first.
    #[default]
    Top,
    /// Lightest consumers first.
    Lowest,
}

impl Ranking {
    pub fn as_str(self) -> &'static str {
        match self {
            Ranking::Top => "top",
            Ranking::Lowest => "lowest",
        }
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How multiple tag constraints combine in a session query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// Every constraint must hold.
    #[default]
    All,
    /// At least one constraint must hold.
    Any,
}

impl MatchMode {
    /// Wire token understood by remote servers.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::All => "match_all",
            MatchMode::Any => "match_any",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parse_is_case_insensitive() {
        assert_eq!(Scope::parse("Function"), Scope::Function);
        assert_eq!(Scope::parse("MODULE"), Scope::Module);
        assert_eq!(Scope::parse("package"), Scope::Package);
    }

    #[test]
    fn scope_parse_falls_back_to_package() {
        assert_eq!(Scope::parse(""), Scope::Package);
        assert_eq!(Scope::parse("suite"), Scope::Package);
    }

    #[test]
    fn scope_names_are_uppercase_variants() {
        assert_eq!(Scope::Function.name(), "FUNCTION");
        assert_eq!(Scope::Module.name(), "MODULE");
        assert_eq!(Scope::Package.name(), "PACKAGE");
    }

    #[test]
    fn match_mode_wire_tokens() {
        assert_eq!(MatchMode::All.as_str(), "match_all");
        assert_eq!(MatchMode::Any.as_str(), "match_any");
    }
}
