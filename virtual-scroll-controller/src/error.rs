/// Why a pending controller operation was rejected.
///
/// Missing keys and disabled virtualization are not errors; those resolve as no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScrollError {
    #[error("operation was superseded by a newer request")]
    Superseded,
    #[error("scroll controller was destroyed before the operation completed")]
    Destroyed,
}
