use {
    crate::{Borsh, Codec, Item},
    conduit_types::{StdError, StdResult, Storage},
};

/// Numbers that a [`Counter`] can step.
pub trait Step: Copy {
    fn checked_step(self, step: Self) -> StdResult<Self>;
}

impl Step for u64 {
    fn checked_step(self, step: Self) -> StdResult<Self> {
        self.checked_add(step).ok_or_else(StdError::overflow::<u64>)
    }
}

/// A single number that is monotonically incremented by the given step size.
///
/// Internally, this is an abstraction over an [`Item`](crate::Item).
pub struct Counter<'a, T, C = Borsh>
where
    C: Codec<T>,
{
    item: Item<'a, T, C>,
    base: T,
    step: T,
}

impl<'a, T, C> Counter<'a, T, C>
where
    T: Step,
    C: Codec<T>,
{
    pub const fn new(storage_key: &'a str, base: T, step: T) -> Self {
        Self {
            item: Item::new(storage_key),
            base,
            step,
        }
    }

    /// Load the current counter value.
    pub fn current(&self, storage: &dyn Storage) -> StdResult<T> {
        self.item
            .may_load(storage)
            .map(|maybe_value| maybe_value.unwrap_or(self.base))
    }

    /// Increment the value by the step size; return the values before and after
    /// incrementing.
    pub fn increment(&self, storage: &mut dyn Storage) -> StdResult<(T, T)> {
        let old_value = self.current(storage)?;
        let new_value = old_value.checked_step(self.step)?;

        self.item.save(storage, &new_value)?;

        Ok((old_value, new_value))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, conduit_types::MockStorage};

    #[test]
    fn counter_works() {
        let counter = Counter::<u64>::new("counter", 0, 1);
        let mut storage = MockStorage::new();

        for i in 0..10 {
            assert_eq!(counter.current(&storage).unwrap(), i);
            assert_eq!(counter.increment(&mut storage).unwrap(), (i, i + 1));
        }
    }

    #[test]
    fn counter_overflow_is_an_error() {
        let counter = Counter::<u64>::new("count", u64::MAX, 1);
        let mut storage = MockStorage::new();

        assert!(matches!(
            counter.increment(&mut storage),
            Err(StdError::Overflow { .. })
        ));
    }
}
