//! Dependency-aware partitioning of story events into episodes.
//!
//! Scheduling runs in three passes over a topological ordering of the events:
//!
//! 1. Load-bearing events are spread evenly across the episodes.
//! 2. Every other event joins an episode holding one of its dependencies (or
//!    the episode before one it enables), provided that episode is under the
//!    cap; otherwise it goes to the least-filled episode.
//! 3. Episodes below the minimum borrow events from their neighbors.
//!
//! Placement in passes 2 and 3 is restricted to a causal window so that, for
//! acyclic input, no event is scheduled after an event that depends on it.

use crate::ArchitectConfig;
use reelsmith_core::{Event, EventId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// How the events were ordered before partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventOrdering {
    /// Dependency order
    Topological,
    /// A dependency cycle was found; input order was used
    CycleFallback {
        /// First cycle found, closing on its starting id
        path: Vec<EventId>,
    },
    /// Fewer events were ordered than supplied (duplicate ids); input order was used
    IncompleteFallback {
        /// Events the walk emitted
        emitted: usize,
        /// Events supplied
        total: usize,
    },
}

impl EventOrdering {
    /// Whether the input order was used instead of dependency order.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, EventOrdering::Topological)
    }
}

/// Result of scheduling events into episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// One event list per episode, in story order
    pub episodes: Vec<Vec<Event>>,
    /// How the events were ordered
    pub ordering: EventOrdering,
    /// 1-based numbers of episodes left below the minimum
    pub starved: Vec<u32>,
}

impl Schedule {
    /// Event ids per episode.
    pub fn event_ids(&self) -> Vec<Vec<EventId>> {
        self.episodes
            .iter()
            .map(|events| events.iter().map(|e| e.id.clone()).collect())
            .collect()
    }
}

/// Partitions events into episodes.
///
/// # Examples
///
/// ```
/// use reelsmith_architect::EventScheduler;
/// use reelsmith_core::{Event, EventType};
///
/// let events = vec![
///     Event::new("E01", "Lin is mocked", EventType::LoadBearing),
///     Event::new("E02", "Lin trains", EventType::Reinforcing)
///         .with_depends_on(vec!["E01".to_string()]),
///     Event::new("E03", "Lin wins", EventType::LoadBearing)
///         .with_depends_on(vec!["E02".to_string()]),
/// ];
///
/// let schedule = EventScheduler::default().schedule(&events, 2);
/// assert_eq!(schedule.event_ids(), vec![vec!["E01", "E02"], vec!["E03"]]);
/// assert!(!schedule.ordering.is_fallback());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct EventScheduler {
    max_per_episode: usize,
    min_per_episode: usize,
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new(3, 1)
    }
}

/// Partition `events` into `episode_count` episodes with the default cap and minimum.
pub fn schedule_events(events: &[Event], episode_count: u32) -> Vec<Vec<Event>> {
    EventScheduler::default()
        .schedule(events, episode_count)
        .episodes
}

impl EventScheduler {
    /// Scheduler with an explicit cap and minimum per episode.
    pub fn new(max_per_episode: usize, min_per_episode: usize) -> Self {
        Self {
            max_per_episode,
            min_per_episode,
        }
    }

    /// Scheduler using the configured cap and minimum.
    pub fn from_config(config: &ArchitectConfig) -> Self {
        Self::new(
            *config.max_events_per_episode(),
            *config.min_events_per_episode(),
        )
    }

    /// Partition events into episodes.
    ///
    /// Every input event appears in exactly one episode. An `episode_count`
    /// of zero is treated as one.
    #[tracing::instrument(skip(self, events), fields(events = events.len()))]
    pub fn schedule(&self, events: &[Event], episode_count: u32) -> Schedule {
        let count = if episode_count == 0 {
            tracing::warn!("Episode count of zero requested, scheduling into one episode");
            1
        } else {
            episode_count as usize
        };

        let (order, ordering) = topological_order(events);
        let mut placement = Placement::new(events, &order, count);

        placement.place_load_bearing();
        placement.place_remaining(self.max_per_episode);
        let starved = placement.fill_minimum(self.min_per_episode);
        if !starved.is_empty() {
            tracing::warn!(?starved, minimum = self.min_per_episode, "Episodes left below minimum");
        }

        let episodes = placement.into_episodes();
        tracing::debug!(
            episodes = episodes.len(),
            fallback = ordering.is_fallback(),
            "Events scheduled"
        );
        Schedule {
            episodes,
            ordering,
            starved,
        }
    }
}

/// Depth-first walk over `depends_on` with separate on-path and done markers.
struct TopologicalWalk<'a> {
    events: &'a [Event],
    index: HashMap<&'a str, usize>,
    visiting: HashSet<&'a str>,
    visited: HashSet<&'a str>,
    path: Vec<&'a str>,
    order: Vec<usize>,
    cycle: Option<Vec<EventId>>,
}

impl<'a> TopologicalWalk<'a> {
    fn new(events: &'a [Event]) -> Self {
        let mut index = HashMap::new();
        for (i, event) in events.iter().enumerate() {
            index.entry(event.id.as_str()).or_insert(i);
        }
        Self {
            events,
            index,
            visiting: HashSet::new(),
            visited: HashSet::new(),
            path: Vec::new(),
            order: Vec::with_capacity(events.len()),
            cycle: None,
        }
    }

    fn visit(&mut self, i: usize) {
        let events = self.events;
        let id = events[i].id.as_str();
        if self.visited.contains(id) {
            return;
        }
        if self.visiting.contains(id) {
            let mut cycle: Vec<EventId> = self.path.iter().map(|s| s.to_string()).collect();
            cycle.push(id.to_string());
            tracing::warn!(cycle = %cycle.join(" → "), "Dependency cycle detected");
            if self.cycle.is_none() {
                self.cycle = Some(cycle);
            }
            return;
        }

        self.visiting.insert(id);
        self.path.push(id);
        for dep in &events[i].depends_on {
            let next = self.index.get(dep.as_str()).copied();
            if let Some(j) = next {
                self.visit(j);
            }
        }
        self.path.pop();
        self.visiting.remove(id);
        self.visited.insert(id);
        self.order.push(i);
    }
}

/// Indices of `events` in dependency order, or input order on a cycle or
/// incomplete walk.
fn topological_order(events: &[Event]) -> (Vec<usize>, EventOrdering) {
    let mut walk = TopologicalWalk::new(events);
    for i in 0..events.len() {
        walk.visit(i);
    }

    let input_order: Vec<usize> = (0..events.len()).collect();
    if let Some(path) = walk.cycle {
        tracing::warn!("Dependency cycle present, using input event order");
        return (input_order, EventOrdering::CycleFallback { path });
    }
    if walk.order.len() != events.len() {
        tracing::warn!(
            emitted = walk.order.len(),
            total = events.len(),
            "Incomplete dependency order, using input event order"
        );
        return (
            input_order,
            EventOrdering::IncompleteFallback {
                emitted: walk.order.len(),
                total: events.len(),
            },
        );
    }
    (walk.order, EventOrdering::Topological)
}

/// Slot assignment state shared by the placement passes.
struct Placement<'a> {
    events: &'a [Event],
    order: &'a [usize],
    /// Position of each event index in `order`
    rank: Vec<usize>,
    /// Event indices by id
    index: HashMap<&'a str, usize>,
    /// Indices of events that directly depend on each event index
    dependents: Vec<Vec<usize>>,
    slots: Vec<Vec<usize>>,
    slot_of: Vec<Option<usize>>,
}

impl<'a> Placement<'a> {
    fn new(events: &'a [Event], order: &'a [usize], count: usize) -> Self {
        let mut rank = vec![0; events.len()];
        for (position, &i) in order.iter().enumerate() {
            rank[i] = position;
        }
        let mut index = HashMap::new();
        for (i, event) in events.iter().enumerate() {
            index.entry(event.id.as_str()).or_insert(i);
        }
        let mut dependents = vec![Vec::new(); events.len()];
        for (i, event) in events.iter().enumerate() {
            for dep in &event.depends_on {
                if let Some(&j) = index.get(dep.as_str()) {
                    if j != i {
                        dependents[j].push(i);
                    }
                }
            }
        }
        Self {
            events,
            order,
            rank,
            index,
            dependents,
            slots: vec![Vec::new(); count],
            slot_of: vec![None; events.len()],
        }
    }

    fn count(&self) -> usize {
        self.slots.len()
    }

    fn assign(&mut self, event: usize, slot: usize) {
        self.slots[slot].push(event);
        self.slot_of[event] = Some(slot);
    }

    fn slot_of_id(&self, id: &str) -> Option<usize> {
        self.index.get(id).and_then(|&i| self.slot_of[i])
    }

    fn place_load_bearing(&mut self) {
        let load_bearing: Vec<usize> = self
            .order
            .iter()
            .copied()
            .filter(|&i| self.events[i].is_load_bearing())
            .collect();
        let n = load_bearing.len();
        let count = self.count();
        for (i, event) in load_bearing.into_iter().enumerate() {
            let slot = (i * count / n).min(count - 1);
            self.assign(event, slot);
        }
    }

    /// Slots `[lo, hi]` that keep `event` between its dependencies and the
    /// placed events that transitively depend on it.
    fn causal_window(&self, event: usize) -> (usize, usize) {
        let lo = self.events[event]
            .depends_on
            .iter()
            .filter_map(|dep| self.slot_of_id(dep))
            .max()
            .unwrap_or(0);

        let mut hi = self.count() - 1;
        let mut seen = HashSet::from([event]);
        let mut queue: VecDeque<usize> = self.dependents[event].iter().copied().collect();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next) {
                continue;
            }
            if let Some(slot) = self.slot_of[next] {
                hi = hi.min(slot);
            }
            queue.extend(self.dependents[next].iter().copied());
        }

        (lo, hi.max(lo))
    }

    /// Episode holding a dependency, or the one before an enabled event.
    fn affinity(&self, event: usize) -> Option<usize> {
        let e = &self.events[event];
        e.depends_on
            .iter()
            .find_map(|dep| self.slot_of_id(dep))
            .or_else(|| {
                e.enables
                    .iter()
                    .find_map(|id| self.slot_of_id(id))
                    .map(|slot| slot.saturating_sub(1))
            })
    }

    fn least_filled(&self, lo: usize, hi: usize) -> usize {
        (lo..=hi)
            .min_by_key(|&slot| (self.slots[slot].len(), slot))
            .unwrap_or(lo)
    }

    fn place_remaining(&mut self, cap: usize) {
        let others: Vec<usize> = self
            .order
            .iter()
            .copied()
            .filter(|&i| !self.events[i].is_load_bearing())
            .collect();
        for event in others {
            let (lo, hi) = self.causal_window(event);
            let target = self
                .affinity(event)
                .map(|slot| slot.clamp(lo, hi))
                .filter(|&slot| self.slots[slot].len() < cap);
            let slot = target.unwrap_or_else(|| self.least_filled(lo, hi));
            self.assign(event, slot);
        }
    }

    /// Whether `event` may sit in `slot` without breaking a dependency edge.
    fn can_move(&self, event: usize, slot: usize) -> bool {
        let deps_before = self.events[event]
            .depends_on
            .iter()
            .filter_map(|dep| self.slot_of_id(dep))
            .all(|s| s <= slot);
        let dependents_after = self.dependents[event]
            .iter()
            .filter_map(|&d| self.slot_of[d])
            .all(|s| s >= slot);
        deps_before && dependents_after
    }

    /// Move one event from the nearest donor above `minimum` into `slot`.
    fn borrow_into(&mut self, slot: usize, minimum: usize) -> bool {
        let mut donors: Vec<usize> = (0..self.count())
            .filter(|&d| d != slot && self.slots[d].len() > minimum)
            .collect();
        donors.sort_by_key(|&d| (d.abs_diff(slot), d));

        for donor in donors {
            let mut candidates: Vec<usize> = self.slots[donor]
                .iter()
                .copied()
                .filter(|&e| !self.events[e].is_load_bearing())
                .collect();
            // Events nearest the receiving episode in story order move first.
            candidates.sort_by_key(|&e| self.rank[e]);
            if donor < slot {
                candidates.reverse();
            }
            let movable = candidates.into_iter().find(|&e| self.can_move(e, slot));
            if let Some(event) = movable {
                self.slots[donor].retain(|&e| e != event);
                self.assign(event, slot);
                return true;
            }
        }
        false
    }

    /// Top up episodes below `minimum`; returns the 1-based numbers still short.
    fn fill_minimum(&mut self, minimum: usize) -> Vec<u32> {
        for slot in 0..self.count() {
            while self.slots[slot].len() < minimum {
                if !self.borrow_into(slot, minimum) {
                    break;
                }
            }
        }
        (0..self.count())
            .filter(|&slot| self.slots[slot].len() < minimum)
            .map(|slot| slot as u32 + 1)
            .collect()
    }

    fn into_episodes(mut self) -> Vec<Vec<Event>> {
        let rank = &self.rank;
        for slot in &mut self.slots {
            slot.sort_by_key(|&e| rank[e]);
        }
        self.slots
            .iter()
            .map(|slot| slot.iter().map(|&e| self.events[e].clone()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_core::EventType;

    fn event(id: &str, event_type: EventType, deps: &[&str]) -> Event {
        Event::new(id, format!("event {id}"), event_type)
            .with_depends_on(deps.iter().map(|d| d.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn dependencies_come_first_in_order() {
        let events = vec![
            event("B", EventType::Reinforcing, &["A"]),
            event("A", EventType::Reinforcing, &[]),
        ];
        let (order, ordering) = topological_order(&events);
        assert_eq!(order, vec![1, 0]);
        assert_eq!(ordering, EventOrdering::Topological);
    }

    #[test]
    fn cycle_reports_path_and_keeps_input_order() {
        let events = vec![
            event("A", EventType::Reinforcing, &["C"]),
            event("B", EventType::Reinforcing, &["A"]),
            event("C", EventType::Reinforcing, &["B"]),
        ];
        let (order, ordering) = topological_order(&events);
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(
            ordering,
            EventOrdering::CycleFallback {
                path: vec!["A", "C", "B", "A"].into_iter().map(String::from).collect()
            }
        );
    }

    #[test]
    fn duplicate_ids_fall_back() {
        let events = vec![
            event("A", EventType::Reinforcing, &[]),
            event("A", EventType::Reinforcing, &[]),
        ];
        let (_, ordering) = topological_order(&events);
        assert_eq!(
            ordering,
            EventOrdering::IncompleteFallback {
                emitted: 1,
                total: 2
            }
        );
    }

    #[test]
    fn load_bearing_spread_evenly() {
        let events: Vec<Event> = (0..4)
            .map(|i| event(&format!("L{i}"), EventType::LoadBearing, &[]))
            .collect();
        let schedule = EventScheduler::default().schedule(&events, 2);
        assert_eq!(
            schedule.event_ids(),
            vec![vec!["L0", "L1"], vec!["L2", "L3"]]
        );
    }

    #[test]
    fn full_affinity_episode_falls_back_to_least_filled() {
        let events = vec![
            event("L0", EventType::LoadBearing, &[]),
            event("L1", EventType::LoadBearing, &[]),
            event("D1", EventType::Decorative, &["L0"]),
            event("D2", EventType::Decorative, &["L0"]),
            event("D3", EventType::Decorative, &["L0"]),
        ];
        let schedule = EventScheduler::default().schedule(&events, 2);
        assert_eq!(
            schedule.event_ids(),
            vec![vec!["L0", "D1", "D2"], vec!["L1", "D3"]]
        );
    }

    #[test]
    fn least_filled_fallback_stays_after_dependencies() {
        let events = vec![
            event("L0", EventType::LoadBearing, &[]),
            event("L1", EventType::LoadBearing, &[]),
            event("L2", EventType::LoadBearing, &[]),
            event("D1", EventType::Decorative, &["L1"]),
            event("D2", EventType::Decorative, &["L1"]),
            event("D3", EventType::Decorative, &["L1"]),
        ];
        let schedule = EventScheduler::default().schedule(&events, 3);
        // Episode 1 is as empty as episode 3 but would put D3 before L1.
        assert_eq!(
            schedule.event_ids(),
            vec![vec!["L0"], vec!["L1", "D1", "D2"], vec!["L2", "D3"]]
        );
    }

    #[test]
    fn empty_episodes_borrow_from_neighbors() {
        let events = vec![
            event("L0", EventType::LoadBearing, &[]),
            event("D1", EventType::Decorative, &["L0"]),
            event("D2", EventType::Decorative, &["L0"]),
        ];
        let schedule = EventScheduler::default().schedule(&events, 3);
        assert_eq!(
            schedule.event_ids(),
            vec![vec!["L0"], vec!["D2"], vec!["D1"]]
        );
        assert!(schedule.starved.is_empty());
    }

    #[test]
    fn enables_places_one_episode_earlier() {
        let events = vec![
            event("L0", EventType::LoadBearing, &[]),
            event("L1", EventType::LoadBearing, &[]),
            event("L2", EventType::LoadBearing, &[]),
            Event::new("D", "setup", EventType::Decorative).with_enables(vec!["L2".to_string()]),
        ];
        let schedule = EventScheduler::default().schedule(&events, 3);
        assert_eq!(
            schedule.event_ids(),
            vec![vec!["L0"], vec!["L1", "D"], vec!["L2"]]
        );
    }

    #[test]
    fn zero_count_clamped_to_one() {
        let events = vec![event("A", EventType::LoadBearing, &[])];
        let schedule = EventScheduler::default().schedule(&events, 0);
        assert_eq!(schedule.episodes.len(), 1);
    }

    #[test]
    fn starved_episodes_reported() {
        let events = vec![event("A", EventType::LoadBearing, &[])];
        let schedule = EventScheduler::default().schedule(&events, 3);
        assert_eq!(schedule.starved, vec![2, 3]);
    }
}
