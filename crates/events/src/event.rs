/// A domain-agnostic event.
///
/// Events are **immutable** facts, delivered **after** the state change they
/// describe has been applied.
pub trait Event: Clone + core::fmt::Debug + 'static {
    /// Stable event name/type identifier (e.g. "cart.line.added").
    fn event_type(&self) -> &'static str;
}
