//! Mutation sentinel for the menu iframe.
//!
//! The host page may rewrite the injected iframe at will. The sentinel watches
//! attribute mutations on it, reverts anything it did not write itself and
//! escalates to a force-close when tampering keeps coming. Two counters with a
//! shared decay window keep the sentinel itself from being driven into an
//! unbounded observe/revert loop.

use std::sync::Arc;
use std::time::Duration;

use autofill_overlay_config::SentinelConfig;
use autofill_overlay_protocols::{Document, ElementId, MutationRecord};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::style_guard::StyleGuard;
use crate::timer::ScheduledTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Observing,
    Suspended,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationCounters {
    pub observer_iterations: u32,
    pub foreign_mutations: u32,
}

/// Outcome of one mutation batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelVerdict {
    /// Tampering (if any) was reverted locally.
    Contained,
    /// Thresholds tripped; the whole inline menu must be closed.
    ForceClose,
}

pub struct MutationSentinel {
    state: ObserverState,
    counters: Arc<Mutex<MutationCounters>>,
    reset_timer: Option<ScheduledTask>,
    max_observer_iterations: u32,
    max_foreign_mutations: u32,
    reset_window: Duration,
    default_attributes: Vec<(String, String)>,
}

impl MutationSentinel {
    /// `default_attributes` is the only attribute set the iframe may carry
    /// (besides `style`).
    pub fn new(config: &SentinelConfig, default_attributes: Vec<(String, String)>) -> Self {
        Self {
            state: ObserverState::Suspended,
            counters: Arc::new(Mutex::new(MutationCounters::default())),
            reset_timer: None,
            max_observer_iterations: config.max_observer_iterations,
            max_foreign_mutations: config.max_foreign_mutations,
            reset_window: Duration::from_millis(config.counter_reset_ms),
            default_attributes,
        }
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    pub fn counters(&self) -> MutationCounters {
        *self.counters.lock()
    }

    pub fn default_attributes(&self) -> &[(String, String)] {
        &self.default_attributes
    }

    /// Stop observing. Undelivered records are discarded by the host.
    pub fn suspend(&mut self, document: &dyn Document, iframe: ElementId) {
        document.disconnect_observer(iframe);
        self.state = ObserverState::Suspended;
    }

    /// Observe attribute mutations on the iframe.
    pub fn resume(&mut self, document: &dyn Document, iframe: ElementId) {
        document.observe_attributes(iframe);
        self.state = ObserverState::Observing;
    }

    /// Stop observing and drop the pending counter reset.
    pub fn shutdown(&mut self, document: &dyn Document, iframe: ElementId) {
        self.reset_timer = None;
        self.suspend(document, iframe);
    }

    /// Process one batch of mutation records delivered by the observer.
    pub fn handle_mutations(
        &mut self,
        document: &dyn Document,
        guard: &mut StyleGuard,
        records: &[MutationRecord],
    ) -> SentinelVerdict {
        if self.state == ObserverState::Suspended {
            debug!("Ignoring mutation batch delivered while suspended");
            return SentinelVerdict::Contained;
        }

        if self.is_triggering_excessive_iterations() {
            return SentinelVerdict::ForceClose;
        }

        for record in records {
            if record.target != guard.iframe() {
                continue;
            }

            if record.attribute_name != "style" {
                if self.handle_attribute_mutation(document, guard.iframe())
                    == SentinelVerdict::ForceClose
                {
                    return SentinelVerdict::ForceClose;
                }
                continue;
            }

            warn!(element = %record.target, "Restoring tampered iframe style");
            document.remove_attribute(guard.iframe(), "style");
            guard.restore(document, self);
        }

        SentinelVerdict::Contained
    }

    /// Count one observer callback; trips once the count exceeds the limit
    /// inside the decay window.
    fn is_triggering_excessive_iterations(&mut self) -> bool {
        let counters = self.counters.clone();
        self.reset_timer = Some(ScheduledTask::after(
            "sentinel-counter-reset",
            self.reset_window,
            move || {
                *counters.lock() = MutationCounters::default();
            },
        ));

        let mut counters = self.counters.lock();
        counters.observer_iterations += 1;
        if counters.observer_iterations <= self.max_observer_iterations {
            return false;
        }

        warn!(
            iterations = counters.observer_iterations,
            "Excessive mutation observer iterations, force-closing inline menu"
        );
        *counters = MutationCounters::default();
        drop(counters);
        self.reset_timer = None;
        true
    }

    /// Walk every attribute of the iframe, dropping unknown ones and restoring
    /// changed defaults.
    fn handle_attribute_mutation(
        &mut self,
        document: &dyn Document,
        iframe: ElementId,
    ) -> SentinelVerdict {
        for (name, value) in document.attributes(iframe) {
            if name == "style" {
                continue;
            }

            let mut counters = self.counters.lock();
            if counters.foreign_mutations >= self.max_foreign_mutations {
                warn!(
                    foreign_mutations = counters.foreign_mutations,
                    "Foreign mutation limit reached, force-closing inline menu"
                );
                return SentinelVerdict::ForceClose;
            }

            let default_value = self
                .default_attributes
                .iter()
                .find(|(default_name, _)| *default_name == name)
                .map(|(_, default_value)| default_value.as_str());

            match default_value {
                None => {
                    warn!(attribute = %name, "Removing foreign iframe attribute");
                    document.remove_attribute(iframe, &name);
                }
                Some(default_value) if default_value != value => {
                    warn!(attribute = %name, "Restoring tampered iframe attribute");
                    document.set_attribute(iframe, &name, default_value);
                }
                Some(_) => continue,
            }

            counters.foreign_mutations += 1;
            if counters.foreign_mutations >= self.max_foreign_mutations {
                warn!(
                    foreign_mutations = counters.foreign_mutations,
                    "Foreign mutation limit reached, force-closing inline menu"
                );
                return SentinelVerdict::ForceClose;
            }
        }

        SentinelVerdict::Contained
    }
}

#[cfg(test)]
#[path = "sentinel_tests.rs"]
mod tests;
