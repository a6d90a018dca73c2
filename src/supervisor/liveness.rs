/// Something a bounded wait can prove progress to.
///
/// Every polling loop calls [`Liveness::feed`] once per iteration.
pub trait Liveness: Send + Sync {
    fn feed(&self);
}

/// For components used outside a supervised loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLiveness;

impl Liveness for NoopLiveness {
    #[inline]
    fn feed(&self) {}
}
