/// Recommended error type for your scenario `main` function. This type is compatible with the
/// result of [crate::prelude::run] so you can use `?` to propagate errors.
pub type HarnessResult<T> = anyhow::Result<T>;
