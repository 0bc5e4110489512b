use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Supplies values for the free variables of an expression during evaluation.
pub trait Bindings {
    fn value_of(&self, name: &str) -> Option<f64>;
}

impl<K, S> Bindings for HashMap<K, f64, S>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<K> Bindings for BTreeMap<K, f64>
where
    K: Borrow<str> + Ord,
{
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for [(&str, f64)] {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| *value)
    }
}

impl<const N: usize> Bindings for [(&str, f64); N] {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.as_slice().value_of(name)
    }
}

/// No variables bound at all.
impl Bindings for () {
    fn value_of(&self, _name: &str) -> Option<f64> {
        None
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    fn value_of(&self, name: &str) -> Option<f64> {
        (**self).value_of(name)
    }
}
