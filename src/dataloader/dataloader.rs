use super::error::SegDatasetError;

/// An indexable collection whose length is fixed once constructed.
pub trait Dataset {
    type Item;

    fn get(&self, index: usize) -> Result<Self::Item, SegDatasetError>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> DatasetIter<'_, Self>
    where
        Self: Sized,
    {
        DatasetIter::new(self)
    }
}

/// Loads samples in index order on the calling thread.
pub struct DatasetIter<'a, D: Dataset> {
    dataset: &'a D,
    next_index: usize,
}

impl<'a, D: Dataset> DatasetIter<'a, D> {
    fn new(dataset: &'a D) -> Self {
        DatasetIter {
            dataset,
            next_index: 0,
        }
    }
}

impl<D: Dataset> Iterator for DatasetIter<'_, D> {
    type Item = Result<D::Item, SegDatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.dataset.len() {
            return None;
        }
        let item = self.dataset.get(self.next_index);
        self.next_index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.len().saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl<D: Dataset> ExactSizeIterator for DatasetIter<'_, D> {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Squares(usize);

    impl Dataset for Squares {
        type Item = usize;

        fn get(&self, index: usize) -> Result<usize, SegDatasetError> {
            if index >= self.0 {
                return Err(SegDatasetError::IndexOutOfBounds {
                    index,
                    len: self.0,
                });
            }
            Ok(index * index)
        }

        fn len(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn iter_visits_every_index_in_order() {
        let squares = Squares(4);
        let items: Vec<usize> = squares.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(items, vec![0, 1, 4, 9]);
    }

    #[test]
    fn iter_reports_exact_len() {
        let squares = Squares(5);
        let mut iter = squares.iter();
        assert_eq!(iter.len(), 5);
        iter.next();
        assert_eq!(iter.len(), 4);
        assert!(Squares(0).is_empty());
        assert_eq!(Squares(0).iter().count(), 0);
    }
}
