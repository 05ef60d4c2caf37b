pub trait VecExtensions<T> {
    /// Removes the elements at `positions` and returns them in ascending position order.
    /// Returns `Err(position)` with the first out-of-range position and leaves
    /// the vector untouched.
    fn remove_positions(&mut self, positions: &[usize]) -> Result<Vec<T>, usize>;
}

impl<T> VecExtensions<T> for Vec<T> {
    fn remove_positions(&mut self, positions: &[usize]) -> Result<Vec<T>, usize> {
        if let Some(&bad) = positions.iter().find(|&&p| p >= self.len()) {
            return Err(bad);
        }
        let mut sorted = positions.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let mut removed = sorted
            .iter()
            .rev()
            .map(|&p| self.remove(p))
            .collect::<Vec<_>>();
        removed.reverse();
        Ok(removed)
    }
}

pub trait SliceExtensions<T> {
    fn single_element(&self) -> Option<&T>;
}

impl<T> SliceExtensions<T> for [T] {
    fn single_element(&self) -> Option<&T> {
        match self.len() {
            1 => self.iter().next(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::{SliceExtensions, VecExtensions};

    #[test]
    fn remove_positions_should_return_removed_elements_in_order() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        assert_eq!(v.remove_positions(&[3, 0, 2]), Ok(vec!['a', 'c', 'd']));
        assert_eq!(v, vec!['b']);
    }

    #[test]
    fn remove_positions_should_not_touch_vec_on_bad_position() {
        let mut v = vec![1, 2];
        assert_eq!(v.remove_positions(&[0, 5]), Err(5));
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn single_element_should_only_match_one_element_slices() {
        assert_eq!([7].single_element(), Some(&7));
        assert_eq!([1, 2].single_element(), None);
        assert_eq!(Vec::<u8>::new().single_element(), None);
    }
}
