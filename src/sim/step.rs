use tracing::debug;

use crate::error::EvaluationError;
use crate::network::{Circuit, GateId};
use crate::sim::eval::{evaluate, Evaluation};

/// Result of one step of the propagation
#[derive(Debug, Clone)]
pub enum Step {
    /// First step: the variables and constants are activated
    Sources(Vec<GateId>),
    /// A new level of gates is activated, and values are recomputed
    Propagated {
        /// Index of the step, starting at 1
        step: usize,
        /// Gates activated by this step
        frontier: Vec<GateId>,
        /// Values of the circuit with the current inputs
        evaluation: Evaluation,
    },
    /// Nothing left to activate; the simulator is idle again
    Finished,
}

/// Level-by-level propagation of the signals, for animation
///
/// Each call to [`advance`](StepSimulator::advance) activates the gates whose inputs are
/// all active, starting from the variables and constants. Activity is independent of the
/// values: a gate is reached once all its inputs are reached, whatever their value.
/// A gate with an empty slot is reached through its connected inputs. Gates without any
/// connected input, other than variables and constants, are never reached.
#[derive(Debug, Clone)]
pub struct StepSimulator {
    /// Current step, or -1 when idle
    step: i64,
}

impl Default for StepSimulator {
    fn default() -> Self {
        StepSimulator { step: -1 }
    }
}

impl StepSimulator {
    /// Create an idle simulator
    pub fn new() -> StepSimulator {
        StepSimulator::default()
    }

    /// Returns whether no simulation is in progress
    pub fn is_idle(&self) -> bool {
        self.step < 0
    }

    /// Current step, if a simulation is in progress
    pub fn current_step(&self) -> Option<usize> {
        usize::try_from(self.step).ok()
    }

    /// Go back to idle; the next step starts from the sources
    pub fn reset(&mut self) {
        self.step = -1;
    }

    /// Run one step of the propagation
    pub fn advance(&mut self, circuit: &mut Circuit) -> Result<Step, EvaluationError> {
        if self.is_idle() {
            circuit.clear_activity();
            let sources: Vec<GateId> = circuit
                .gates()
                .iter()
                .filter(|g| g.kind().is_source())
                .map(|g| g.id())
                .collect();
            for s in &sources {
                circuit.activate(*s);
            }
            self.step = 0;
            debug!(nb_sources = sources.len(), "step simulation started");
            return Ok(Step::Sources(sources));
        }

        let frontier: Vec<GateId> = circuit
            .gates()
            .iter()
            .filter(|g| {
                !g.is_active()
                    && g.dependencies().next().is_some()
                    && g
                        .dependencies()
                        .all(|d| circuit.gate(d).map_or(false, |s| s.is_active()))
            })
            .map(|g| g.id())
            .collect();
        let step = self.step + 1;
        if frontier.is_empty() || step > circuit.nb_gates() as i64 {
            debug!(step = self.step, "step simulation finished");
            self.reset();
            return Ok(Step::Finished);
        }

        for g in &frontier {
            circuit.activate(*g);
        }
        self.step = step;
        let evaluation = match evaluate(circuit, &circuit.input_assignment()) {
            Ok(e) => e,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };
        circuit.apply_values(&evaluation);
        debug!(step, nb_gates = frontier.len(), "step simulation advanced");
        Ok(Step::Propagated {
            step: step as usize,
            frontier,
            evaluation,
        })
    }

    /// Run the propagation until it finishes, starting from the current state
    ///
    /// Returns the gates activated at each step, the sources first.
    pub fn run(&mut self, circuit: &mut Circuit) -> Result<Vec<Vec<GateId>>, EvaluationError> {
        let mut ret = Vec::new();
        loop {
            match self.advance(circuit)? {
                Step::Sources(s) => ret.push(s),
                Step::Propagated { frontier, .. } => ret.push(frontier),
                Step::Finished => return Ok(ret),
            }
        }
    }
}
