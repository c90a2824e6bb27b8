use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

/// Produce an independent copy of a value before it is stored.
///
/// Used by `#[atomic(copy_on_assign = true)]` on every write path. For
/// shared handles such as [`Arc`] the copy owns a fresh allocation, so the
/// stored value never aliases one the caller still holds.
pub trait Copying {
    fn copy(&self) -> Self;
}

impl<T: Clone> Copying for Arc<T> {
    fn copy(&self) -> Self {
        Arc::new(T::clone(self))
    }
}

impl<T: Clone> Copying for Box<T> {
    fn copy(&self) -> Self {
        Box::new(T::clone(self))
    }
}

impl<T: Copying> Copying for Option<T> {
    fn copy(&self) -> Self {
        self.as_ref().map(Copying::copy)
    }
}

impl<T: Copying> Copying for Vec<T> {
    fn copy(&self) -> Self {
        self.iter().map(Copying::copy).collect()
    }
}

impl<T: Copying> Copying for VecDeque<T> {
    fn copy(&self) -> Self {
        self.iter().map(Copying::copy).collect()
    }
}

impl<K: Clone + Ord, V: Copying> Copying for BTreeMap<K, V> {
    fn copy(&self) -> Self {
        self.iter().map(|(k, v)| (k.clone(), v.copy())).collect()
    }
}

impl<K: Clone + Eq + Hash, V: Copying> Copying for HashMap<K, V> {
    fn copy(&self) -> Self {
        self.iter().map(|(k, v)| (k.clone(), v.copy())).collect()
    }
}

/// Owned values with no shared state copy by cloning.
macro_rules! copying_via_clone {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Copying for $ty {
                fn copy(&self) -> Self {
                    self.clone()
                }
            }
        )*
    };
}

copying_via_clone!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    String, std::path::PathBuf,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_copy_is_a_new_allocation() {
        let shared = Arc::new(String::from("text"));
        let copied = shared.copy();
        assert_eq!(*copied, "text");
        assert!(!Arc::ptr_eq(&shared, &copied));
    }

    #[test]
    fn collections_copy_elements() {
        let shared = Arc::new(1u8);
        let copied = vec![Some(shared.clone()), None].copy();
        let Some(first) = &copied[0] else {
            panic!("element lost");
        };
        assert!(!Arc::ptr_eq(first, &shared));
        assert!(copied[1].is_none());
    }
}
