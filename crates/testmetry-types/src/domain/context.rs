use serde_json::Value;

use crate::fields::{CONTEXT_FIELDS, Field, Record};

/// The machine a test session executed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Context identifier. Equal identifiers describe equal machines.
    pub h: String,
    /// Number of CPU cores.
    pub cpu_count: i64,
    /// Nominal CPU frequency, in MHz.
    pub cpu_freq: i64,
    /// CPU architecture string.
    pub cpu_type: String,
    /// CPU model name as reported by the vendor.
    pub cpu_vendor: String,
    /// Physical RAM, in MB.
    pub ram_total: i64,
    /// Fully qualified domain name of the machine.
    pub machine_node: String,
    /// Machine/OS type.
    pub machine_type: String,
    /// Machine bit mode (32 or 64 bits).
    pub machine_arch: String,
    /// OS kernel description.
    pub sys_info: String,
    /// Language-runtime description of the interpreter running the tests.
    pub py_info: String,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            h: String::new(),
            cpu_count: 1,
            cpu_freq: 0,
            cpu_type: String::new(),
            cpu_vendor: String::new(),
            ram_total: 0,
            machine_node: String::new(),
            machine_type: String::new(),
            machine_arch: String::new(),
            sys_info: String::new(),
            py_info: String::new(),
        }
    }
}

impl Context {
    /// Project the context into a [`Record`], optionally restricted by a
    /// keep/drop field selection. `keep` wins when both are given.
    pub fn to_record(&self, keep: Option<&[Field]>, drop: Option<&[Field]>) -> Record {
        let mut record = Record::new();
        for field in CONTEXT_FIELDS {
            if !field.exported(keep, drop) {
                continue;
            }
            let value = match field {
                Field::ContextH => Value::from(self.h.clone()),
                Field::CpuCount => Value::from(self.cpu_count),
                Field::CpuFrequencyMhz => Value::from(self.cpu_freq),
                Field::CpuType => Value::from(self.cpu_type.clone()),
                Field::CpuVendor => Value::from(self.cpu_vendor.clone()),
                Field::RamTotalMb => Value::from(self.ram_total),
                Field::MachineNode => Value::from(self.machine_node.clone()),
                Field::MachineType => Value::from(self.machine_type.clone()),
                Field::MachineArch => Value::from(self.machine_arch.clone()),
                Field::SystemInfo => Value::from(self.sys_info.clone()),
                Field::PythonInfo => Value::from(self.py_info.clone()),
                _ => continue,
            };
            record.insert(field.key().to_string(), value);
        }
        record
    }
}
