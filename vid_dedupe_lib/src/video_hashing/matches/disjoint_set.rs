use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::mem;

//Maps each item to the index in `sets` of the set that holds it. Merged-away
//sets are left empty in place so that the surviving indices stay stable.
#[derive(Debug, Clone)]
pub(crate) struct DisjointSet<T>
where
    T: Ord,
{
    indices: BTreeMap<T, usize>,
    sets: Vec<BTreeSet<T>>,
}

//derived Default would require `T: Default`, which callers like
//`DisjointSet<&Path>` cannot satisfy
impl<T> Default for DisjointSet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self {
            indices: BTreeMap::new(),
            sets: Vec::new(),
        }
    }
}

impl<T> DisjointSet<T>
where
    T: Ord + Clone,
{
    pub fn insert(&mut self, item_1: T, item_2: T) {
        let (idx_1, idx_2) = (
            self.indices.get(&item_1).copied(),
            self.indices.get(&item_2).copied(),
        );

        //if both items already share a set there is nothing to do
        if idx_1.is_some() && idx_1 == idx_2 {
            return;
        }

        match (idx_1, idx_2) {
            //neither item has been seen before, so start a new set
            (None, None) => {
                let idx = self.sets.len();
                self.indices.insert(item_1.clone(), idx);
                self.indices.insert(item_2.clone(), idx);
                self.sets.push(BTreeSet::from([item_1, item_2]));
            }

            //one item is already in a set, so the other joins it
            (None, Some(idx)) | (Some(idx), None) => {
                self.indices.insert(item_1.clone(), idx);
                self.indices.insert(item_2.clone(), idx);
                self.sets[idx].insert(item_1);
                self.sets[idx].insert(item_2);
            }

            //each item is in its own set, so drain one into the other
            (Some(idx_1), Some(idx_2)) => {
                let (keep_idx, drain_idx) = if idx_1 < idx_2 {
                    (idx_1, idx_2)
                } else {
                    (idx_2, idx_1)
                };
                let drained = mem::take(&mut self.sets[drain_idx]);
                for item in &drained {
                    self.indices.insert(item.clone(), keep_idx);
                }
                self.sets[keep_idx].extend(drained);
            }
        }
    }

    pub fn contains_pair<T1>(&self, item_1: &T1, item_2: &T1) -> bool
    where
        T: Borrow<T1>,
        T1: Ord + ?Sized,
    {
        let (Some(idx_1), Some(idx_2)) = (self.indices.get(item_1), self.indices.get(item_2))
        else {
            return false;
        };

        idx_1 == idx_2
    }

    pub fn all_sets(&self) -> impl Iterator<Item = &BTreeSet<T>> {
        self.sets.iter().filter(|set| !set.is_empty())
    }
}

#[cfg(test)]
mod test {
    use super::DisjointSet;

    #[test]
    fn insert_creates_a_set() {
        let mut set = DisjointSet::<usize>::default();
        set.insert(1, 2);
        check_items_equal(&set, &[1, 2]);
        assert!(set.all_sets().count() == 1);
    }

    #[test]
    fn inserts_sharing_an_item_stay_in_one_set() {
        let mut set = DisjointSet::<usize>::default();
        set.insert(1, 2);
        set.insert(2, 3);
        set.insert(3, 3);
        check_items_equal(&set, &[1, 2, 3]);
        assert!(set.all_sets().count() == 1);
    }

    #[test]
    fn unrelated_inserts_stay_in_two_sets() {
        let mut set = DisjointSet::<usize>::default();
        set.insert(1, 2);
        set.insert(2, 3);
        set.insert(11, 12);
        check_items_equal(&set, &[1, 2, 3, 11, 12]);
        assert!(set.all_sets().count() == 2);
    }

    #[test]
    fn a_bridging_insert_merges_two_sets() {
        let mut set = DisjointSet::<usize>::default();
        set.insert(1, 2);
        set.insert(11, 12);
        assert!(set.all_sets().count() == 2);

        set.insert(2, 11);
        check_items_equal(&set, &[1, 2, 11, 12]);
        assert!(set.all_sets().count() == 1);
        assert!(set.contains_pair(&1, &12));
    }

    #[test]
    fn contains_pair() {
        let mut set = DisjointSet::<usize>::default();
        assert!(!set.contains_pair(&1, &2));
        set.insert(1, 2);
        assert!(set.contains_pair(&1, &2));

        set.insert(1, 3);
        assert!(set.contains_pair(&1, &3));
        assert!(set.contains_pair(&2, &3));

        set.insert(11, 12);
        assert!(set.contains_pair(&11, &12));
        assert!(!set.contains_pair(&1, &11));
    }

    fn check_items_equal(set: &DisjointSet<usize>, exp: &[usize]) {
        let mut act = set
            .all_sets()
            .flat_map(|s| s.iter().copied())
            .collect::<Vec<_>>();
        act.sort_unstable();
        assert_eq!(act, exp);
    }
}
