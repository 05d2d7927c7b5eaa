//! Type-erased container for initialized feature slices.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Feature state that can live in the shared API state.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    /// Downcasting hook for the registry.
    fn as_any(&self) -> &dyn Any;
}

/// A slice ready to be stored, keyed by its concrete type.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), state: Box::new(state) }
    }

    /// Borrows the state as `T` if that is what was stored.
    #[must_use]
    pub fn downcast_ref<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ledger(u8);

    impl FeatureSlice for Ledger {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn slice_is_keyed_by_its_type() {
        let slice = InitializedSlice::new(Ledger(3));
        assert_eq!(slice.id, TypeId::of::<Ledger>());
        assert_eq!(slice.downcast_ref::<Ledger>().map(|l| l.0), Some(3));
    }
}
