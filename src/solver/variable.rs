/// The base trait for a variable identifier in a problem.
///
/// Blanket-implemented: any equatable, hashable, thread-safe type qualifies.
pub trait Variable:
    Clone + std::fmt::Debug + Eq + std::hash::Hash + Send + Sync + 'static
{
}
impl<T> Variable for T where
    T: Clone + std::fmt::Debug + Eq + std::hash::Hash + Send + Sync + 'static
{
}

/// The base trait for a value in a variable's domain.
pub trait DomainValue:
    Clone + std::fmt::Debug + Eq + std::hash::Hash + Send + Sync + 'static
{
}
impl<T> DomainValue for T where
    T: Clone + std::fmt::Debug + Eq + std::hash::Hash + Send + Sync + 'static
{
}
