use std::sync::{Arc, LazyLock};

use chnative_error::ChResult;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::{ParseOptions, TypeParser, TypeRef, lower};

static GLOBAL: LazyLock<TypeNameCache> = LazyLock::new(TypeNameCache::default);

/// Memoizes type-name lowering, keyed by the exact input string.
///
/// Equal names share one [`TypeRef`], so every column of a block whose header repeats a type
/// name points at the same type. Names that fail to parse are not cached.
#[derive(Debug, Default)]
pub struct TypeNameCache {
    entries: RwLock<HashMap<Arc<str>, TypeRef>>,
    options: ParseOptions,
}

impl TypeNameCache {
    /// An empty cache parsing with the given options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            entries: RwLock::default(),
            options,
        }
    }

    /// The process-wide cache.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// The type named `name`, parsed on first use.
    pub fn get_or_parse(&self, name: &str) -> ChResult<TypeRef> {
        if let Some(dtype) = self.entries.read().get(name) {
            return Ok(dtype.clone());
        }

        log::debug!("type name cache miss for '{name}'");
        let dtype = Arc::new(lower(&TypeParser::with_options(name, self.options).parse()?)?);
        Ok(self
            .entries
            .write()
            .entry(Arc::from(name))
            .or_insert(dtype)
            .clone())
    }

    /// Number of cached names.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached type.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_parsed_types() {
        let cache = TypeNameCache::default();
        let a = cache.get_or_parse("Array(UInt8)").unwrap();
        let b = cache.get_or_parse("Array(UInt8)").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);

        // Keyed by spelling, not by canonical name.
        let c = cache.get_or_parse("Array( UInt8 )").unwrap();
        assert_eq!(a, c);
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = TypeNameCache::default();
        assert!(cache.get_or_parse("Array(").is_err());
        assert!(cache.get_or_parse("Foo").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn honors_options() {
        let cache = TypeNameCache::with_options(ParseOptions { max_depth: 1 });
        assert!(cache.get_or_parse("Array(Int8)").is_ok());
        assert!(cache.get_or_parse("Array(Array(Int8))").is_err());
    }

    #[test]
    fn global_is_shared() {
        let a = TypeNameCache::global().get_or_parse("Tuple(Int8, IPv6)").unwrap();
        let b = TypeNameCache::global().get_or_parse("Tuple(Int8, IPv6)").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
