use crate::error::{EnvError, EnvResult};

/// The element right after the first one equal to `given`, wrapping to the
/// first element when `given` is last or not present.
///
/// Used for round-robin choices such as picking the next peer to contact.
pub fn next_after<T, I>(given: &T, iteration: I) -> EnvResult<T>
where
    T: PartialEq,
    I: IntoIterator<Item = T>,
{
    let mut iter = iteration.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| EnvError::IllegalState("iteration is empty".to_string()))?;

    let mut matched = first == *given;
    for item in iter {
        if matched {
            return Ok(item);
        }
        matched = item == *given;
    }
    Ok(first)
}
