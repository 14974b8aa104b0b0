use crate::error::{EnvError, EnvResult};

/// Fail with [`EnvError::IllegalState`] unless `value` holds.
///
/// `message` is only evaluated on failure.
pub fn check_state(value: bool, message: impl FnOnce() -> String) -> EnvResult<()> {
    if value {
        Ok(())
    } else {
        Err(EnvError::IllegalState(message()))
    }
}

/// Check a state condition, formatting the message lazily.
///
/// ```
/// use quorum_env::check_state;
///
/// fn leader_term(term: u64) -> quorum_env::EnvResult<u64> {
///     check_state!(term > 0, "term must be positive, got {}", term)?;
///     Ok(term)
/// }
///
/// assert!(leader_term(3).is_ok());
/// assert!(leader_term(0).is_err());
/// assert!(check_state!(1 + 1 == 2).is_ok());
/// ```
#[macro_export]
macro_rules! check_state {
    ($cond:expr $(,)?) => {
        $crate::check::check_state($cond, || {
            ::std::format!("check failed: {}", ::std::stringify!($cond))
        })
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::check::check_state($cond, || ::std::format!($($arg)+))
    };
}
