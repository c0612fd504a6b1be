use std::time::Instant;

/// Busy-wait until `cond` holds or `deadline` passes. Returns whether the
/// condition was met. Spin-waits because echo edges are microsecond-scale;
/// callers bound the wait with a short deadline.
pub fn wait_for(mut cond: impl FnMut() -> bool, deadline: Instant) -> bool {
    while !cond() {
        if Instant::now() >= deadline {
            return false;
        }
        std::hint::spin_loop();
    }
    true
}
