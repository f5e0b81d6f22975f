//! core::failure
//!
//! Failure views: lattices with a failed fault domain removed.
//!
//! A failure view keeps exactly the sectors whose value on the failed
//! dimension differs from the failed value. Surviving sectors keep their
//! endpoint order, and dimension value sets are rebuilt from the survivors,
//! so a value used only by removed sectors disappears from the view.

use super::lattice::{Lattice, LatticeError};
use super::types::FaultDomain;

impl<T: Clone> Lattice<T> {
    /// Derive a new lattice modeling the loss of `failed_value` on `dimension`.
    ///
    /// A value that was never registered removes nothing. The source lattice
    /// is not modified.
    ///
    /// `dimension` resolves through [`Lattice::dimension_index`]. If the
    /// lattice was built with a repeated dimension name, only the first
    /// dimension carrying that name is filtered.
    ///
    /// # Errors
    ///
    /// Returns `LatticeError::UnknownDimension` if `dimension` is not one of
    /// this lattice's dimensions.
    ///
    /// # Example
    ///
    /// ```
    /// use shuffleshard::core::lattice::Lattice;
    ///
    /// let mut lattice = Lattice::new(["AZ", "Version"]);
    /// lattice.add_endpoints_for_sector(&["a", "1"], ["A"]).unwrap();
    /// lattice.add_endpoints_for_sector(&["b", "1"], ["B"]).unwrap();
    ///
    /// let view = lattice.derive_failure_view("AZ", "a").unwrap();
    /// assert_eq!(view.all_endpoints(), vec!["B"]);
    /// assert_eq!(view.dimension_values("AZ"), vec!["b"]);
    /// assert_eq!(lattice.endpoint_count(), 2);
    /// ```
    pub fn derive_failure_view(
        &self,
        dimension: &str,
        failed_value: &str,
    ) -> Result<Lattice<T>, LatticeError> {
        let index = self
            .dimension_index(dimension)
            .ok_or_else(|| LatticeError::UnknownDimension(dimension.to_string()))?;

        let mut view = self.empty_like();
        for (coordinate, endpoints) in self.sectors() {
            if coordinate.get(index) == Some(failed_value) {
                continue;
            }
            view.extend_sector(coordinate, endpoints.iter().cloned());
        }
        Ok(view)
    }

    /// Apply several failures in order, each to the previous view.
    ///
    /// With no failures the result is a copy of `self`.
    ///
    /// # Errors
    ///
    /// Returns the first `LatticeError::UnknownDimension` encountered.
    pub fn derive_failure_view_all<'a, I>(&self, failures: I) -> Result<Lattice<T>, LatticeError>
    where
        I: IntoIterator<Item = &'a FaultDomain>,
    {
        failures
            .into_iter()
            .try_fold(self.clone(), |view, failure| {
                view.derive_failure_view(failure.dimension(), failure.value())
            })
    }
}
