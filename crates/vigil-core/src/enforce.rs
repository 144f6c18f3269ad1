use log::debug;

use crate::domain::Snapshot;
use crate::error::MonitorError;
use crate::monitor::MonitorInstance;
use crate::verdict::Verdict;

/// Run one tick end-to-end: let the nominal step compute its outputs, advance
/// the monitor on the result, and if the verdict is non-compliant overwrite
/// the actuator fields with the policy's declared fallback. Observer policies
/// leave the snapshot untouched.
///
/// The returned verdict is the pre-substitution one, so a corrected tick is
/// distinguishable from a nominal tick even though the data looks compliant
/// afterwards.
pub fn run_via_monitor<F>(
    step: F,
    instance: &mut MonitorInstance,
    snapshot: &mut Snapshot,
) -> Result<Verdict, MonitorError>
where
    F: FnOnce(&mut Snapshot),
{
    step(snapshot);
    let verdict = instance.advance(snapshot)?;
    if !verdict.is_compliant() {
        if let Some(patch) = instance.fallback() {
            patch.apply(snapshot).map_err(|source| MonitorError::Contract {
                policy: instance.policy_name().to_string(),
                source,
            })?;
            debug!(
                "monitor {}: actuator substituted at tick {}",
                instance.policy_name(),
                instance.tick()
            );
        }
    }
    Ok(verdict)
}
