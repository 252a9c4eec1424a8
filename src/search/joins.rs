//! Per-compile join handle cache
//!
//! One handle per distinct canonical join path. Filters and sorts of the
//! same compile share the resolver, so a relation used by both is joined
//! once. A resolver must never outlive its compile.

use std::collections::HashMap;

use super::config::JoinStrategy;
use super::context::QueryContext;
use crate::observability::{log_event_with_fields, Event};

/// Join handles keyed by canonical dotted path
#[derive(Debug)]
pub struct JoinResolver<J> {
    joins: HashMap<String, J>,
    strategy: JoinStrategy,
    log_joins: bool,
}

impl<J: Clone> JoinResolver<J> {
    pub fn new(strategy: JoinStrategy) -> Self {
        Self {
            joins: HashMap::new(),
            strategy,
            log_joins: false,
        }
    }

    /// Emit a `JOIN_CREATED` event per new handle
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_joins = enabled;
        self
    }

    /// Registers a handle ahead of compilation; replaces any previous one
    pub fn register(&mut self, path: impl Into<String>, handle: J) {
        self.joins.insert(path.into(), handle);
    }

    /// Looks up a handle without creating it
    pub fn get(&self, path: &str) -> Option<&J> {
        self.joins.get(path)
    }

    /// Returns the handle for the join path made of `segments`.
    ///
    /// With [`JoinStrategy::OnDemand`] the walk starts from the deepest
    /// known prefix, and only the segments below it are joined, each from
    /// its parent. A registered `a.b` is returned as is even when `a` was
    /// never registered. With [`JoinStrategy::Preregistered`] a path that
    /// was not registered yields `None`.
    pub fn resolve<C>(&mut self, ctx: &mut C, segments: &[&str]) -> Option<J>
    where
        C: QueryContext<Join = J>,
    {
        if segments.is_empty() {
            return None;
        }

        if self.strategy == JoinStrategy::Preregistered {
            return self.joins.get(&segments.join(".")).cloned();
        }

        let (known, mut parent) = (1..=segments.len())
            .rev()
            .find_map(|depth| {
                self.joins
                    .get(&segments[..depth].join("."))
                    .map(|handle| (depth, Some(handle.clone())))
            })
            .unwrap_or((0, None));

        for depth in known + 1..=segments.len() {
            let path = segments[..depth].join(".");
            let handle = ctx.join(parent.as_ref(), segments[depth - 1]);
            if self.log_joins {
                log_event_with_fields(Event::JoinCreated, &[("path", path.as_str())]);
            }
            self.joins.insert(path, handle.clone());
            parent = Some(handle);
        }
        parent
    }

    /// Number of distinct join paths
    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    /// Known join paths in lexicographic order
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.joins.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}
