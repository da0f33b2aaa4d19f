use chrono::NaiveDateTime;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::enums::Scope;
use crate::fields::{Field, METRIC_FIELDS, Record};
use crate::util::iso_timestamp;

/// One measurement taken while running a test item.
///
/// Times are in seconds and memory in MB. `cpu_usage` is a ratio: 0.65
/// means 65% of one core, 3.7 means three cores busy plus a fourth at 70%.
/// Build instances with struct update syntax over [`Metric::default`];
/// absent fields take empty strings, zeroes, the epoch and
/// [`Scope::Function`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metric {
    /// Identifier of the execution context the test ran in.
    pub context_h: String,
    /// Identifier of the session the test ran under.
    pub session_h: String,
    /// Time at which the measurement was taken.
    pub start_time: NaiveDateTime,
    /// Import-style path to the item, intermediate modules included.
    pub item_path: String,
    /// Bare test item name.
    pub item: String,
    /// Fully qualified test identifier, parameter values included.
    pub variant: String,
    /// Filesystem path of the file hosting the item.
    pub path: String,
    /// Granularity of the measurement.
    pub kind: Scope,
    /// Logical component the test belongs to. Empty when unassigned.
    pub component: String,
    /// Real elapsed time.
    pub wall_time: f64,
    /// Time spent in user mode.
    pub user_time: f64,
    /// Time spent in kernel mode.
    pub kernel_time: f64,
    /// CPU usage over the run.
    pub cpu_usage: f64,
    /// Memory used, in MB.
    pub memory_usage: f64,
}

impl Metric {
    /// Content identity of the measurement, as a SHA-256 hex digest.
    ///
    /// Metrics with equal field values hash identically no matter which
    /// backend produced them. This is the sole dedup key used by
    /// [`Metrics`](crate::collections::Metrics).
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.context_h.as_bytes());
        hasher.update(self.session_h.as_bytes());
        hasher.update(iso_timestamp(&self.start_time).as_bytes());
        hasher.update(self.item_path.as_bytes());
        hasher.update(self.item.as_bytes());
        hasher.update(self.path.as_bytes());
        hasher.update(self.variant.as_bytes());
        hasher.update(self.kind.name().as_bytes());
        hasher.update(self.component.as_bytes());
        hasher.update(self.wall_time.to_string().as_bytes());
        hasher.update(self.user_time.to_string().as_bytes());
        hasher.update(self.kernel_time.to_string().as_bytes());
        hasher.update(self.cpu_usage.to_string().as_bytes());
        hasher.update(self.memory_usage.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Project the metric into a [`Record`], optionally restricted by a
    /// keep/drop field selection. `keep` wins when both are given.
    pub fn to_record(&self, keep: Option<&[Field]>, drop: Option<&[Field]>) -> Record {
        let mut record = Record::new();
        for field in METRIC_FIELDS {
            if !field.exported(keep, drop) {
                continue;
            }
            let value = match field {
                Field::ContextH => Value::from(self.context_h.clone()),
                Field::SessionH => Value::from(self.session_h.clone()),
                Field::ItemStartTime => Value::from(iso_timestamp(&self.start_time)),
                Field::ItemPath => Value::from(self.item_path.clone()),
                Field::Item => Value::from(self.item.clone()),
                Field::ItemFsLoc => Value::from(self.path.clone()),
                Field::ItemVariant => Value::from(self.variant.clone()),
                Field::Kind => Value::from(self.kind.as_str()),
                Field::TotalTime => Value::from(self.wall_time),
                Field::UserTime => Value::from(self.user_time),
                Field::KernelTime => Value::from(self.kernel_time),
                Field::CpuUsage => Value::from(self.cpu_usage),
                Field::MemUsage => Value::from(self.memory_usage),
                Field::Component => Value::from(self.component.clone()),
                _ => continue,
            };
            record.insert(field.key().to_string(), value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::parse_timestamp;

    fn sample() -> Metric {
        Metric {
            context_h: "ctx-1".into(),
            session_h: "sess-1".into(),
            start_time: parse_timestamp("2021-09-12T08:30:00"),
            item_path: "pkg.mod.test_sample".into(),
            item: "test_sample".into(),
            variant: "test_sample[2]".into(),
            path: "pkg/mod.py".into(),
            kind: Scope::Function,
            component: "billing".into(),
            wall_time: 1.5,
            user_time: 1.0,
            kernel_time: 0.25,
            cpu_usage: 0.8,
            memory_usage: 64.0,
        }
    }

    #[test]
    fn content_hash_is_stable() {
        assert_eq!(sample().content_hash(), sample().content_hash());
    }

    #[test]
    fn content_hash_covers_every_field() {
        let base = sample();
        let variants = [
            Metric { context_h: "other".into(), ..base.clone() },
            Metric { session_h: "other".into(), ..base.clone() },
            Metric { start_time: parse_timestamp("2021-09-12T08:30:01"), ..base.clone() },
            Metric { item_path: "other".into(), ..base.clone() },
            Metric { item: "other".into(), ..base.clone() },
            Metric { variant: "other".into(), ..base.clone() },
            Metric { path: "other".into(), ..base.clone() },
            Metric { kind: Scope::Module, ..base.clone() },
            Metric { component: "other".into(), ..base.clone() },
            Metric { wall_time: 9.0, ..base.clone() },
            Metric { user_time: 9.0, ..base.clone() },
            Metric { kernel_time: 9.0, ..base.clone() },
            Metric { cpu_usage: 9.0, ..base.clone() },
            Metric { memory_usage: 9.0, ..base.clone() },
        ];
        for changed in variants {
            assert_ne!(changed.content_hash(), base.content_hash());
        }
    }

    #[test]
    fn record_uses_logical_keys() {
        let record = sample().to_record(None, None);
        assert_eq!(record.len(), 14);
        assert_eq!(record["wall_time"], 1.5);
        assert_eq!(record["memory_usage"], 64.0);
        assert_eq!(record["variant"], "test_sample[2]");
        assert_eq!(record["path"], "pkg/mod.py");
        assert_eq!(record["kind"], "function");
        assert_eq!(record["start_time"], "2021-09-12T08:30:00");
    }

    #[test]
    fn keep_restricts_the_projection() {
        let record = sample().to_record(Some(&[Field::Item, Field::TotalTime]), None);
        assert_eq!(record.len(), 2);
        assert!(record.contains_key("item"));
        assert!(record.contains_key("wall_time"));
    }

    #[test]
    fn drop_removes_listed_fields() {
        let record = sample().to_record(None, Some(&[Field::Component]));
        assert_eq!(record.len(), 13);
        assert!(!record.contains_key("component"));
    }

    #[test]
    fn defaults_are_empty_epoch_function() {
        let metric = Metric::default();
        assert_eq!(metric.kind, Scope::Function);
        assert_eq!(metric.wall_time, 0.0);
        assert_eq!(iso_timestamp(&metric.start_time), "1970-01-01T00:00:00");
    }
}
