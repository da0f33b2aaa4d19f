use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde_json::Value;

use crate::domain::{Context, Metric, Session};
use crate::fields::{Field, Record};

/// An ordered bag of [`Metric`] values.
///
/// Duplicates are allowed; [`Metrics::unique`] and [`Metrics::merge`]
/// collapse them by content hash, first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    items: Vec<Metric>,
}

impl Metrics {
    pub fn new() -> Self {
        Metrics::default()
    }

    pub fn push(&mut self, metric: Metric) {
        self.items.push(metric);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Metric> {
        self.items.iter()
    }

    /// New collection holding only the metrics matching `cond`.
    pub fn filter_with<F>(&self, mut cond: F) -> Metrics
    where
        F: FnMut(&Metric) -> bool,
    {
        Metrics {
            items: self.items.iter().filter(|metric| cond(metric)).cloned().collect(),
        }
    }

    /// In-place counterpart of [`Metrics::filter_with`].
    pub fn retain_with<F>(&mut self, cond: F)
    where
        F: FnMut(&Metric) -> bool,
    {
        self.items.retain(cond);
    }

    /// Metrics covering any variant of `item`.
    pub fn variants_of(&self, item: &str) -> Metrics {
        self.filter_with(|metric| metric.item == item)
    }

    /// Union of two collections with duplicates collapsed by content hash.
    /// First occurrence wins, left collection first.
    pub fn merge(left: &Metrics, right: &Metrics) -> Metrics {
        let mut seen = HashSet::new();
        let mut merged = Metrics::new();
        for metric in left.iter().chain(right.iter()) {
            if seen.insert(metric.content_hash()) {
                merged.push(metric.clone());
            }
        }
        merged
    }

    /// New collection with duplicates collapsed, first occurrence wins.
    pub fn unique(&self) -> Metrics {
        let mut seen = HashSet::new();
        self.filter_with(|metric| seen.insert(metric.content_hash()))
    }

    /// In-place counterpart of [`Metrics::unique`].
    pub fn dedup(&mut self) {
        let mut seen = HashSet::new();
        self.items.retain(|metric| seen.insert(metric.content_hash()));
    }

    /// Project every metric into a [`Record`], optionally joining session
    /// and context data on the metric's identifiers.
    ///
    /// Session records join with their tags expanded. A metric whose
    /// session or context id is unknown to the given collections keeps its
    /// bare record.
    pub fn to_records(
        &self,
        sessions: Option<&Sessions>,
        contexts: Option<&Contexts>,
        keep: Option<&[Field]>,
        drop: Option<&[Field]>,
    ) -> Vec<Record> {
        self.items
            .iter()
            .map(|metric| {
                let mut record = metric.to_record(keep, drop);
                if let Some(sessions) = sessions
                    && let Some(session) = sessions.get(&metric.session_h)
                {
                    record.extend(session.to_record(keep, drop, true));
                }
                if let Some(contexts) = contexts
                    && let Some(context) = contexts.get(&metric.context_h)
                {
                    record.extend(context.to_record(keep, drop));
                }
                record
            })
            .collect()
    }
}

impl From<Vec<Metric>> for Metrics {
    fn from(items: Vec<Metric>) -> Self {
        Metrics { items }
    }
}

impl FromIterator<Metric> for Metrics {
    fn from_iter<I: IntoIterator<Item = Metric>>(iter: I) -> Self {
        Metrics {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Metrics {
    type Item = Metric;
    type IntoIter = std::vec::IntoIter<Metric>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Metrics {
    type Item = &'a Metric;
    type IntoIter = std::slice::Iter<'a, Metric>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "metrics:")?;
        for (index, metric) in self.items.iter().enumerate() {
            writeln!(f, "  metric_{}:", index)?;
            write_record(f, "    ", &metric.to_record(None, None))?;
        }
        Ok(())
    }
}

/// Sessions keyed by identifier, iterated in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sessions {
    items: BTreeMap<String, Session>,
}

impl Sessions {
    pub fn new() -> Self {
        Sessions::default()
    }

    /// Insert a session under its own identifier, returning any session
    /// it displaces.
    pub fn insert(&mut self, session: Session) -> Option<Session> {
        self.items.insert(session.h.clone(), session)
    }

    pub fn get(&self, h: &str) -> Option<&Session> {
        self.items.get(h)
    }

    pub fn contains(&self, h: &str) -> bool {
        self.items.contains_key(h)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// New collection holding only the sessions matching `cond`.
    pub fn filter_with<F>(&self, mut cond: F) -> Sessions
    where
        F: FnMut(&Session) -> bool,
    {
        Sessions {
            items: self
                .items
                .iter()
                .filter(|(_, session)| cond(session))
                .map(|(h, session)| (h.clone(), session.clone()))
                .collect(),
        }
    }

    /// In-place counterpart of [`Sessions::filter_with`].
    pub fn retain_with<F>(&mut self, mut cond: F)
    where
        F: FnMut(&Session) -> bool,
    {
        self.items.retain(|_, session| cond(session));
    }

    /// Sessions recorded against the given source-control reference.
    pub fn with_scm(&self, scm_ref: &str) -> Sessions {
        self.filter_with(|session| session.scm_ref == scm_ref)
    }

    /// Sessions satisfying every tag constraint: each of `names` must be
    /// present, each of `values` must be present with the exact value.
    /// Giving no constraint at all matches nothing.
    pub fn with_tags(&self, names: &[&str], values: &[(&str, &str)]) -> Sessions {
        if names.is_empty() && values.is_empty() {
            return Sessions::new();
        }
        self.filter_with(|session| {
            names.iter().all(|name| session.tags.contains_key(*name))
                && values
                    .iter()
                    .all(|(name, value)| session.tags.get(*name).is_some_and(|v| v == value))
        })
    }

    /// Project every session into a [`Record`] with tags expanded.
    pub fn to_records(&self, keep: Option<&[Field]>, drop: Option<&[Field]>) -> Vec<Record> {
        self.items
            .values()
            .map(|session| session.to_record(keep, drop, true))
            .collect()
    }
}

impl FromIterator<Session> for Sessions {
    fn from_iter<I: IntoIterator<Item = Session>>(iter: I) -> Self {
        let mut sessions = Sessions::new();
        for session in iter {
            sessions.insert(session);
        }
        sessions
    }
}

impl IntoIterator for Sessions {
    type Item = Session;
    type IntoIter = std::collections::btree_map::IntoValues<String, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}

impl<'a> IntoIterator for &'a Sessions {
    type Item = &'a Session;
    type IntoIter = std::collections::btree_map::Values<'a, String, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl fmt::Display for Sessions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sessions:")?;
        for (h, session) in &self.items {
            writeln!(f, "  {}:", h)?;
            let mut record = session.to_record(None, None, false);
            record.remove(Field::SessionH.key());
            if session.tags.is_empty() {
                record.remove(Field::Tags.key());
            }
            write_record(f, "    ", &record)?;
        }
        Ok(())
    }
}

/// Contexts keyed by identifier, iterated in identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contexts {
    items: BTreeMap<String, Context>,
}

impl Contexts {
    pub fn new() -> Self {
        Contexts::default()
    }

    /// Insert a context under its own identifier, returning any context
    /// it displaces.
    pub fn insert(&mut self, context: Context) -> Option<Context> {
        self.items.insert(context.h.clone(), context)
    }

    pub fn get(&self, h: &str) -> Option<&Context> {
        self.items.get(h)
    }

    pub fn contains(&self, h: &str) -> bool {
        self.items.contains_key(h)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// New collection holding only the contexts matching `cond`.
    pub fn filter_with<F>(&self, mut cond: F) -> Contexts
    where
        F: FnMut(&Context) -> bool,
    {
        Contexts {
            items: self
                .items
                .iter()
                .filter(|(_, context)| cond(context))
                .map(|(h, context)| (h.clone(), context.clone()))
                .collect(),
        }
    }

    /// In-place counterpart of [`Contexts::filter_with`].
    pub fn retain_with<F>(&mut self, mut cond: F)
    where
        F: FnMut(&Context) -> bool,
    {
        self.items.retain(|_, context| cond(context));
    }

    /// Project every context into a [`Record`].
    pub fn to_records(&self, keep: Option<&[Field]>, drop: Option<&[Field]>) -> Vec<Record> {
        self.items
            .values()
            .map(|context| context.to_record(keep, drop))
            .collect()
    }
}

impl FromIterator<Context> for Contexts {
    fn from_iter<I: IntoIterator<Item = Context>>(iter: I) -> Self {
        let mut contexts = Contexts::new();
        for context in iter {
            contexts.insert(context);
        }
        contexts
    }
}

impl IntoIterator for Contexts {
    type Item = Context;
    type IntoIter = std::collections::btree_map::IntoValues<String, Context>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}

impl<'a> IntoIterator for &'a Contexts {
    type Item = &'a Context;
    type IntoIter = std::collections::btree_map::Values<'a, String, Context>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

impl fmt::Display for Contexts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "contexts:")?;
        for (h, context) in &self.items {
            writeln!(f, "  {}:", h)?;
            let mut record = context.to_record(None, None);
            record.remove(Field::ContextH.key());
            write_record(f, "    ", &record)?;
        }
        Ok(())
    }
}

fn write_record(f: &mut fmt::Formatter<'_>, indent: &str, record: &Record) -> fmt::Result {
    for (key, value) in record {
        match value {
            Value::Object(nested) => {
                writeln!(f, "{indent}{key}:")?;
                for (name, value) in nested {
                    writeln!(f, "{indent}  {name}: {}", scalar(value))?;
                }
            }
            _ => writeln!(f, "{indent}{key}: {}", scalar(value))?,
        }
    }
    Ok(())
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) if text.is_empty() => "''".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
