//! Effect renderer: turns observed dispatcher signals into emission plans.
//!
//! The host calls [`EffectRenderer::render_pass`] on every render; a plan
//! comes back only on the pass that sees a rising edge.

use storyscroll_core::rng::DeterministicRng;
use tracing::debug;

use crate::domain::dispatcher::EffectSignal;
use crate::domain::edge::EdgeTrigger;
use crate::domain::profiles::{EffectPlan, plan_for};

/// Edge-triggered consumer of the dispatcher signal.
pub struct EffectRenderer {
    edge: EdgeTrigger,
    rng: Box<dyn DeterministicRng>,
    fired: u64,
}

impl EffectRenderer {
    /// Creates a renderer drawing randomized origins from `rng`.
    #[must_use]
    pub fn new(rng: Box<dyn DeterministicRng>) -> Self {
        Self {
            edge: EdgeTrigger::default(),
            rng,
            fired: 0,
        }
    }

    /// Observes one render pass. Returns a plan on a rising edge.
    pub fn render_pass(&mut self, signal: EffectSignal) -> Option<EffectPlan> {
        let variant = self.edge.observe(signal)?;
        self.fired += 1;
        debug!(%variant, fired = self.fired, "firing celebration");
        Some(plan_for(variant, self.rng.as_mut()))
    }

    /// Number of plans produced so far.
    #[must_use]
    pub fn fired(&self) -> u64 {
        self.fired
    }
}

impl std::fmt::Debug for EffectRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectRenderer")
            .field("edge", &self.edge)
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}
