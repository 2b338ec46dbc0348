use tracing::info;

use crate::error::{Error, ResourceError};
use crate::limits::Limits;
use crate::network::Circuit;
use crate::sim::eval::{evaluate, Assignment};

/// Exhaustive equivalence checking of the first output of two circuits
///
/// All assignments of the letters of both circuits are enumerated, the letters of the
/// first circuit first. Returns the first assignment where the outputs differ, or None
/// if the circuits are equivalent. An unset output only matches an unset output.
pub fn check_equivalence(
    a: &Circuit,
    b: &Circuit,
    limits: &Limits,
) -> Result<Option<Assignment>, Error> {
    let letters = a.registry().merged_letters(&b.registry());
    if letters.len() > limits.max_table_vars {
        return Err(ResourceError::TableTooLarge {
            vars: letters.len(),
            limit: limits.max_table_vars,
        }
        .into());
    }
    info!(nb_letters = letters.len(), "checking equivalence");
    for i in 0..1usize << letters.len() {
        let assignment = Assignment::from_bits(&letters, i);
        let va = evaluate(a, &assignment)?.first_output();
        let vb = evaluate(b, &assignment)?.first_output();
        if va != vb {
            info!(%assignment, "circuits differ");
            return Ok(Some(assignment));
        }
    }
    Ok(None)
}
