use clap::ValueEnum;
use std::fmt;
use testmetry_types::{Resource, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ResourceArg {
    Memory,
    Cpu,
    TotalTime,
    UserTime,
    KernelTime,
}

impl ResourceArg {
    pub fn resource(self) -> Resource {
        match self {
            ResourceArg::Memory => Resource::Memory,
            ResourceArg::Cpu => Resource::Cpu,
            ResourceArg::TotalTime => Resource::TotalTime,
            ResourceArg::UserTime => Resource::UserTime,
            ResourceArg::KernelTime => Resource::KernelTime,
        }
    }
}

impl fmt::Display for ResourceArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource().as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ScopeArg {
    Function,
    Module,
    Package,
}

impl ScopeArg {
    pub fn scope(self) -> Scope {
        match self {
            ScopeArg::Function => Scope::Function,
            ScopeArg::Module => Scope::Module,
            ScopeArg::Package => Scope::Package,
        }
    }
}

impl fmt::Display for ScopeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope().as_str())
    }
}
