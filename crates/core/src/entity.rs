//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Two entities with the same identifier are the same entity, whatever their
/// other attributes say. Cart lines are matched to products exclusively through
/// this identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Identity comparison (ignores every attribute except the id).
    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
