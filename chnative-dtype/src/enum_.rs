use std::collections::BTreeMap;
use std::sync::Arc;

/// A `name = value` pair of an enum type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumItem {
    /// The symbolic name.
    pub name: Arc<str>,
    /// The stored value.
    pub value: i16,
}

impl EnumItem {
    /// Create a new item.
    pub fn new(name: impl Into<Arc<str>>, value: i16) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The value to name mapping of an `Enum8` or `Enum16` type.
///
/// Both directions are kept in sync: when an item reuses a name or a value that is already
/// present, the later item wins and the entry it displaces is dropped from both maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EnumDType {
    value_to_name: BTreeMap<i16, Arc<str>>,
    name_to_value: BTreeMap<Arc<str>, i16>,
}

impl EnumDType {
    /// Builds the mapping from items in declaration order.
    pub fn new(items: impl IntoIterator<Item = EnumItem>) -> Self {
        let mut dtype = Self::default();
        for item in items {
            dtype.insert(item.name, item.value);
        }
        dtype
    }

    fn insert(&mut self, name: Arc<str>, value: i16) {
        if let Some(previous) = self.name_to_value.insert(name.clone(), value) {
            if previous != value {
                log::debug!("enum name '{name}' rebound from {previous} to {value}");
                self.value_to_name.remove(&previous);
            }
        }
        if let Some(previous) = self.value_to_name.insert(value, name.clone()) {
            if previous != name {
                log::debug!("enum value {value} rebound from '{previous}' to '{name}'");
                self.name_to_value.remove(&previous);
            }
        }
    }

    /// The name bound to `value`.
    pub fn name_of(&self, value: i16) -> Option<&str> {
        self.value_to_name.get(&value).map(|name| name.as_ref())
    }

    /// The value bound to `name`.
    pub fn value_of(&self, name: &str) -> Option<i16> {
        self.name_to_value.get(name).copied()
    }

    /// Whether `name` is one of the enum's names.
    pub fn has_name(&self, name: &str) -> bool {
        self.name_to_value.contains_key(name)
    }

    /// Whether `value` is one of the enum's values.
    pub fn has_value(&self, value: i16) -> bool {
        self.value_to_name.contains_key(&value)
    }

    /// Items ordered by ascending value.
    pub fn iter(&self) -> impl Iterator<Item = (i16, &str)> + '_ {
        self.value_to_name
            .iter()
            .map(|(value, name)| (*value, name.as_ref()))
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.value_to_name.len()
    }

    /// Whether the enum has no items.
    pub fn is_empty(&self) -> bool {
        self.value_to_name.is_empty()
    }
}

impl FromIterator<EnumItem> for EnumDType {
    fn from_iter<T: IntoIterator<Item = EnumItem>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups() {
        let dtype = EnumDType::new([EnumItem::new("b", 2), EnumItem::new("a", 1)]);
        assert_eq!(dtype.name_of(1), Some("a"));
        assert_eq!(dtype.value_of("b"), Some(2));
        assert!(dtype.has_name("a"));
        assert!(!dtype.has_value(3));
        assert_eq!(dtype.iter().collect::<Vec<_>>(), vec![(1, "a"), (2, "b")]);
    }

    #[test]
    fn duplicate_name_keeps_last_value() {
        let dtype = EnumDType::new([EnumItem::new("a", 1), EnumItem::new("a", 2)]);
        assert_eq!(dtype.len(), 1);
        assert_eq!(dtype.value_of("a"), Some(2));
        assert!(!dtype.has_value(1));
    }

    #[test]
    fn duplicate_value_keeps_last_name() {
        let dtype = EnumDType::new([
            EnumItem::new("a", 1),
            EnumItem::new("b", 2),
            EnumItem::new("c", 1),
        ]);
        assert_eq!(dtype.name_of(1), Some("c"));
        assert!(!dtype.has_name("a"));
        assert_eq!(dtype.len(), 2);
    }
}
