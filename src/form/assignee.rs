use super::Assignee;
use crate::api::{AnalystMap, ApiError};
use tracing::{debug, warn};

/// Department → default analyst lookup, backed by the map fetched at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalystDirectory {
    /// Fetch still in flight. `pending` keeps only the latest department asked for;
    /// `Some(None)` means the latest request was for "no department".
    NotReady { pending: Option<Option<i64>> },
    Ready(AnalystMap),
}

impl Default for AnalystDirectory {
    fn default() -> Self {
        Self::NotReady { pending: None }
    }
}

impl AnalystDirectory {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Resolve the assignee for `department`, or defer it until the map arrives.
    pub fn request(&mut self, department: Option<i64>) -> Option<Assignee> {
        match self {
            Self::NotReady { pending } => {
                debug!(?department, "analyst map not loaded yet, deferring");
                *pending = Some(department);
                None
            }
            Self::Ready(map) => Some(resolve(map, department)),
        }
    }

    /// Store the fetch outcome and resolve the deferred request exactly once.
    ///
    /// A failed fetch still makes the directory ready, with an empty map, so the
    /// wizard is never left waiting. Without a deferred request, `current` (the
    /// department selected right now) is resolved instead.
    pub fn settle(&mut self, result: Result<AnalystMap, ApiError>, current: Option<i64>) -> Assignee {
        let map = match result {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "could not load analysts, continuing without auto-assignment");
                AnalystMap::new()
            }
        };
        let department = match std::mem::replace(self, Self::Ready(map)) {
            Self::NotReady { pending: Some(pending) } => pending,
            _ => current,
        };
        match self {
            Self::Ready(map) => resolve(map, department),
            Self::NotReady { .. } => Assignee::unassigned(),
        }
    }

    /// Every analyst known to the directory, first occurrence wins, ordered by department key.
    pub fn all_analysts(&self) -> Vec<crate::api::Analyst> {
        let Self::Ready(map) = self else {
            return Vec::new();
        };
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort_by_key(|k| (k.parse::<i64>().unwrap_or(i64::MAX), k.to_string()));
        let mut seen = std::collections::HashSet::new();
        keys.into_iter()
            .flat_map(|k| map[k].iter())
            .filter(|a| seen.insert(a.id))
            .cloned()
            .collect()
    }
}

/// First analyst of the department, or the unassigned sentinel.
pub fn resolve(map: &AnalystMap, department: Option<i64>) -> Assignee {
    department
        .and_then(|d| map.get(&d.to_string()))
        .and_then(|list| list.first())
        .map(|a| Assignee {
            id: a.id,
            name: a.name.clone(),
        })
        .unwrap_or_else(Assignee::unassigned)
}
