/// Failures surfaced by strip construction and the frame helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StripError {
    /// The [`StripEnv`](super::StripEnv) has no frame kernel configured.
    #[error("missing frame kernel; configure the strip environment first")]
    MissingDependency,
    /// The strip's geometry or frames were released (disposed or curve-less).
    #[error("strip geometry has been released")]
    UseAfterDispose,
}
