use serde_json::{Map, Value};

/// A projected entity record, keyed by the logical field names of [`Field`].
pub type Record = Map<String, Value>;

/// Logical field names used by record projection and exports.
///
/// Every entity exports under these names regardless of how the backing
/// store or wire protocol spells its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // Metric fields
    SessionH,
    ContextH,
    ItemStartTime,
    ItemPath,
    Item,
    ItemVariant,
    ItemFsLoc,
    Kind,
    Component,
    TotalTime,
    UserTime,
    KernelTime,
    CpuUsage,
    MemUsage,
    // Session fields
    Scm,
    RunDate,
    Tags,
    // Context fields
    CpuCount,
    CpuFrequencyMhz,
    CpuType,
    CpuVendor,
    RamTotalMb,
    MachineNode,
    MachineType,
    MachineArch,
    SystemInfo,
    PythonInfo,
}

impl Field {
    /// Key under which the field appears in exported records.
    pub fn key(self) -> &'static str {
        match self {
            Field::SessionH => "session_h",
            Field::ContextH => "context_h",
            Field::ItemStartTime => "start_time",
            Field::ItemPath => "item_path",
            Field::Item => "item",
            Field::ItemVariant => "variant",
            Field::ItemFsLoc => "path",
            Field::Kind => "kind",
            Field::Component => "component",
            Field::TotalTime => "wall_time",
            Field::UserTime => "user_time",
            Field::KernelTime => "kernel_time",
            Field::CpuUsage => "cpu_usage",
            Field::MemUsage => "memory_usage",
            Field::Scm => "scm",
            Field::RunDate => "run_date",
            Field::Tags => "tags",
            Field::CpuCount => "cpu_count",
            Field::CpuFrequencyMhz => "cpu_freq",
            Field::CpuType => "cpu_type",
            Field::CpuVendor => "cpu_vendor",
            Field::RamTotalMb => "ram",
            Field::MachineNode => "hostname",
            Field::MachineType => "type",
            Field::MachineArch => "arch",
            Field::SystemInfo => "sys",
            Field::PythonInfo => "py",
        }
    }

    /// Reverse of [`Field::key`].
    pub fn from_key(key: &str) -> Option<Field> {
        let field = match key {
            "session_h" => Field::SessionH,
            "context_h" => Field::ContextH,
            "start_time" => Field::ItemStartTime,
            "item_path" => Field::ItemPath,
            "item" => Field::Item,
            "variant" => Field::ItemVariant,
            "path" => Field::ItemFsLoc,
            "kind" => Field::Kind,
            "component" => Field::Component,
            "wall_time" => Field::TotalTime,
            "user_time" => Field::UserTime,
            "kernel_time" => Field::KernelTime,
            "cpu_usage" => Field::CpuUsage,
            "memory_usage" => Field::MemUsage,
            "scm" => Field::Scm,
            "run_date" => Field::RunDate,
            "tags" => Field::Tags,
            "cpu_count" => Field::CpuCount,
            "cpu_freq" => Field::CpuFrequencyMhz,
            "cpu_type" => Field::CpuType,
            "cpu_vendor" => Field::CpuVendor,
            "ram" => Field::RamTotalMb,
            "hostname" => Field::MachineNode,
            "type" => Field::MachineType,
            "arch" => Field::MachineArch,
            "sys" => Field::SystemInfo,
            "py" => Field::PythonInfo,
            _ => return None,
        };
        Some(field)
    }

    /// Whether the field survives a keep/drop projection.
    ///
    /// `keep` wins when both lists are given.
    pub fn exported(self, keep: Option<&[Field]>, drop: Option<&[Field]>) -> bool {
        match (keep, drop) {
            (Some(keep), _) => keep.contains(&self),
            (None, Some(drop)) => !drop.contains(&self),
            (None, None) => true,
        }
    }
}

/// All fields of a metric record, in export order.
pub const METRIC_FIELDS: [Field; 14] = [
    Field::ContextH,
    Field::SessionH,
    Field::ItemStartTime,
    Field::ItemPath,
    Field::Item,
    Field::ItemFsLoc,
    Field::ItemVariant,
    Field::Kind,
    Field::TotalTime,
    Field::UserTime,
    Field::KernelTime,
    Field::CpuUsage,
    Field::MemUsage,
    Field::Component,
];

/// All fields of a session record, in export order.
pub const SESSION_FIELDS: [Field; 4] = [Field::SessionH, Field::Scm, Field::RunDate, Field::Tags];

/// All fields of a context record, in export order.
pub const CONTEXT_FIELDS: [Field; 11] = [
    Field::ContextH,
    Field::CpuCount,
    Field::CpuFrequencyMhz,
    Field::CpuType,
    Field::CpuVendor,
    Field::RamTotalMb,
    Field::MachineNode,
    Field::MachineType,
    Field::MachineArch,
    Field::SystemInfo,
    Field::PythonInfo,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for field in METRIC_FIELDS.iter().chain(&SESSION_FIELDS).chain(&CONTEXT_FIELDS) {
            assert_eq!(Field::from_key(field.key()), Some(*field));
        }
        assert_eq!(Field::from_key("bogus"), None);
    }

    #[test]
    fn keep_wins_over_drop() {
        let keep = [Field::Item];
        let drop = [Field::Item];
        assert!(Field::Item.exported(Some(&keep), Some(&drop)));
        assert!(!Field::Kind.exported(Some(&keep), Some(&drop)));
    }

    #[test]
    fn drop_removes_only_listed_fields() {
        let drop = [Field::Tags];
        assert!(!Field::Tags.exported(None, Some(&drop)));
        assert!(Field::Scm.exported(None, Some(&drop)));
    }
}
