use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::fields::{Field, Record, SESSION_FIELDS};
use crate::tags::Tags;
use crate::util::iso_timestamp;

/// One test-run session: when it ran, which code revision, and the
/// free-form tags describing the run conditions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    /// Session identifier, unique across all sessions.
    pub h: String,
    /// Source-control reference of the code under test.
    pub scm_ref: String,
    /// Time at which the session started.
    pub run_date: NaiveDateTime,
    /// Run-condition tags, e.g. `pipeline_branch` or `pipeline_build_no`.
    pub tags: Tags,
}

impl Session {
    /// Project the session into a [`Record`], optionally restricted by a
    /// keep/drop field selection. `keep` wins when both are given.
    ///
    /// With `expand_tags`, every tag becomes a top-level key instead of a
    /// nested `tags` object. Expanded keys follow the fate of
    /// [`Field::Tags`] in the selection: keeping or dropping `Tags` keeps
    /// or drops all of them.
    pub fn to_record(
        &self,
        keep: Option<&[Field]>,
        drop: Option<&[Field]>,
        expand_tags: bool,
    ) -> Record {
        let mut record = Record::new();
        for field in SESSION_FIELDS {
            if !field.exported(keep, drop) {
                continue;
            }
            match field {
                Field::SessionH => {
                    record.insert(field.key().to_string(), Value::from(self.h.clone()));
                }
                Field::Scm => {
                    record.insert(field.key().to_string(), Value::from(self.scm_ref.clone()));
                }
                Field::RunDate => {
                    record.insert(
                        field.key().to_string(),
                        Value::from(iso_timestamp(&self.run_date)),
                    );
                }
                Field::Tags => {
                    if expand_tags {
                        for (name, value) in &self.tags {
                            record.insert(name.clone(), Value::from(value.clone()));
                        }
                    } else {
                        let tags: Record = self
                            .tags
                            .iter()
                            .map(|(name, value)| (name.clone(), Value::from(value.clone())))
                            .collect();
                        record.insert(field.key().to_string(), Value::Object(tags));
                    }
                }
                _ => {}
            }
        }
        record
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.h)?;
        writeln!(f, "    run_date: {}", self.run_date)?;
        writeln!(f, "    scm: {}", self.scm_ref)?;
        if !self.tags.is_empty() {
            writeln!(f, "    tags:")?;
            for (name, value) in &self.tags {
                writeln!(f, "        - {}: {}", name, value)?;
            }
        }
        Ok(())
    }
}
