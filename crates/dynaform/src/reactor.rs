// File: dynaform/src/reactor.rs
// Purpose: Enable, disable and reset dependent fields when their parent changes

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::config::CascadeMode;
use crate::events::FormEvent;
use crate::model::ControlSet;
use crate::value::FieldValue;

/// Standing registration: `dependent` is live only while `parent` holds `trigger`
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub dependent: String,
    pub parent: String,
    pub trigger: FieldValue,
}

/// Dependency reactor
///
/// Subscriptions are plain records indexed by parent name. Reactions run
/// synchronously inside the write that caused them and report what they did
/// as `FormEvent`s.
///
/// Per dependent the state machine is:
/// - parent value equals the trigger: Enabled, value untouched
/// - otherwise: Disabled, value reset to the type's blank
#[derive(Debug, Clone)]
pub struct DependencyReactor {
    mode: CascadeMode,
    subscriptions: Vec<Subscription>,
    by_parent: HashMap<String, Vec<usize>>,
    /// Subscription indices in topological order (cascade mode)
    order: Vec<usize>,
    active: bool,
}

impl DependencyReactor {
    pub fn new(mode: CascadeMode) -> Self {
        Self {
            mode,
            subscriptions: Vec::new(),
            by_parent: HashMap::new(),
            order: Vec::new(),
            active: true,
        }
    }

    pub fn mode(&self) -> CascadeMode {
        self.mode
    }

    /// Register a dependent, replacing any earlier registration of the same name
    pub fn register(&mut self, dependent: &str, parent: &str, trigger: FieldValue) {
        self.unregister(dependent);
        self.subscriptions.push(Subscription {
            dependent: dependent.to_string(),
            parent: parent.to_string(),
            trigger,
        });
        self.reindex();
    }

    /// Drop the registration of a dependent; returns whether one existed
    pub fn unregister(&mut self, dependent: &str) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.dependent != dependent);
        let removed = self.subscriptions.len() != before;
        if removed {
            self.reindex();
        }
        removed
    }

    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    pub fn subscription_for(&self, dependent: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|sub| sub.dependent == dependent)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Remove every subscription; later writes cause no reactions
    pub fn teardown(&mut self) -> usize {
        let count = self.subscriptions.len();
        self.subscriptions.clear();
        self.by_parent.clear();
        self.order.clear();
        self.active = false;
        count
    }

    /// React to a write on `origin`
    pub(crate) fn propagate(
        &self,
        controls: &mut ControlSet,
        origin: &str,
        events: &mut Vec<FormEvent>,
    ) {
        if !self.active || self.subscriptions.is_empty() {
            return;
        }
        match self.mode {
            CascadeMode::Independent => self.propagate_independent(controls, origin, events),
            CascadeMode::Cascade => self.propagate_cascade(controls, origin, events),
        }
    }

    /// Each subscription reacts to its parent's value stream only
    ///
    /// Every disable transition resets the dependent and publishes that
    /// reset, changed or not. A control that was just reset holds no trigger
    /// value, so its own dependents are disabled in turn. Within one pass
    /// every control publishes at most once, which breaks dependency cycles.
    fn propagate_independent(
        &self,
        controls: &mut ControlSet,
        origin: &str,
        events: &mut Vec<FormEvent>,
    ) {
        // (publisher, whether the publication is a reset)
        let mut queue: VecDeque<(String, bool)> = VecDeque::from([(origin.to_string(), false)]);
        let mut published: HashSet<String> = HashSet::from([origin.to_string()]);

        while let Some((parent, was_reset)) = queue.pop_front() {
            let Some(indices) = self.by_parent.get(&parent) else {
                continue;
            };
            let Some(value) = controls.get(&parent).map(|c| c.value().clone()) else {
                continue;
            };

            for &idx in indices {
                let sub = &self.subscriptions[idx];
                let live = !was_reset && value == sub.trigger;
                let Some(reset) = apply_transition(controls, &sub.dependent, live, events) else {
                    continue;
                };

                if !reset.value_changed {
                    events.push(FormEvent::value_changed(&sub.dependent, &reset.value));
                }

                if published.insert(sub.dependent.clone()) {
                    queue.push_back((sub.dependent.clone(), true));
                } else {
                    debug!(
                        field = %sub.dependent,
                        origin,
                        "Suppressed repeated reset in dependency cycle"
                    );
                }
            }
        }
    }

    /// Re-evaluate everything downstream of `origin` in topological order
    ///
    /// A dependent is enabled iff its parent exists, is enabled and holds
    /// the trigger value.
    fn propagate_cascade(&self, controls: &mut ControlSet, origin: &str, events: &mut Vec<FormEvent>) {
        let affected = self.downstream_of(origin);
        if affected.is_empty() {
            return;
        }

        for &idx in &self.order {
            let sub = &self.subscriptions[idx];
            if !affected.contains(sub.dependent.as_str()) {
                continue;
            }

            let live = controls
                .get(&sub.parent)
                .map(|parent| parent.is_enabled() && *parent.value() == sub.trigger)
                .unwrap_or(false);
            apply_transition(controls, &sub.dependent, live, events);
        }
    }

    /// Names of all transitive dependents of `origin`
    fn downstream_of(&self, origin: &str) -> HashSet<&str> {
        let mut affected: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::from([origin]);

        while let Some(parent) = queue.pop_front() {
            for &idx in self.by_parent.get(parent).into_iter().flatten() {
                let dependent = self.subscriptions[idx].dependent.as_str();
                if affected.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }
        affected
    }

    fn reindex(&mut self) {
        self.by_parent.clear();
        for (idx, sub) in self.subscriptions.iter().enumerate() {
            self.by_parent.entry(sub.parent.clone()).or_default().push(idx);
        }
        self.order = self.topological_order();
    }

    /// Kahn's algorithm over parent -> dependent edges
    ///
    /// Ties keep registration order. Subscriptions caught in a cycle come
    /// last, in registration order.
    fn topological_order(&self) -> Vec<usize> {
        let dependents: HashSet<&str> = self
            .subscriptions
            .iter()
            .map(|sub| sub.dependent.as_str())
            .collect();

        // A subscription waits for its parent only when the parent is itself a dependent
        let mut waiting: Vec<bool> = self
            .subscriptions
            .iter()
            .map(|sub| dependents.contains(sub.parent.as_str()))
            .collect();

        let mut ready: VecDeque<usize> = (0..self.subscriptions.len())
            .filter(|&idx| !waiting[idx])
            .collect();
        let mut order = Vec::with_capacity(self.subscriptions.len());
        let mut placed = vec![false; self.subscriptions.len()];

        while let Some(idx) = ready.pop_front() {
            order.push(idx);
            placed[idx] = true;
            let dependent = self.subscriptions[idx].dependent.as_str();
            for &child in self.by_parent.get(dependent).into_iter().flatten() {
                if waiting[child] {
                    waiting[child] = false;
                    ready.push_back(child);
                }
            }
        }

        order.extend((0..self.subscriptions.len()).filter(|&idx| !placed[idx]));
        order
    }
}

/// Outcome of a disable transition
struct Reset {
    value: FieldValue,
    value_changed: bool,
}

/// Move a dependent to Enabled (`live`) or to Disabled with a reset
///
/// Returns the reset when the dependent was disabled. Status and value
/// changes are pushed to `events`.
fn apply_transition(
    controls: &mut ControlSet,
    dependent: &str,
    live: bool,
    events: &mut Vec<FormEvent>,
) -> Option<Reset> {
    let control = controls.get_mut(dependent)?;

    if live {
        if control.enable() {
            debug!(field = dependent, "Enabled dependent field");
            events.push(FormEvent::status_changed(dependent, false));
        }
        return None;
    }

    if control.disable() {
        debug!(field = dependent, "Disabled dependent field");
        events.push(FormEvent::status_changed(dependent, true));
    }
    let value_changed = control.clear();
    if value_changed {
        events.push(FormEvent::value_changed(dependent, control.value()));
    }
    Some(Reset {
        value: control.value().clone(),
        value_changed,
    })
}
