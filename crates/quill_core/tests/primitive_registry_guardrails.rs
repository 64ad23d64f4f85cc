use std::collections::HashMap;

use quill_core::lang::primitives::{self, PrimitiveCategory, PrimitiveId};
use quill_core::types::Atomic;

#[test]
fn primitive_spellings_unique_and_resolvable() {
    let mut seen: HashMap<String, PrimitiveId> = HashMap::new();

    for info in primitives::PRIMITIVE_TYPES {
        assert_eq!(
            primitives::from_str(info.canonical),
            Some(info.id),
            "primitive canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(primitives::as_str(info.id), info.canonical);

        for spelling in std::iter::once(&info.canonical).chain(info.aliases.iter()) {
            if let Some(prev) = seen.insert(spelling.to_ascii_lowercase(), info.id) {
                panic!("duplicate primitive spelling {:?}: {:?} and {:?}", spelling, prev, info.id);
            }
        }
    }
}

#[test]
fn canonical_spellings_are_lowercase() {
    for info in primitives::PRIMITIVE_TYPES {
        assert_eq!(info.canonical, info.canonical.to_ascii_lowercase());
    }
}

#[test]
fn atomic_predicates_agree_with_registry() {
    for info in primitives::PRIMITIVE_TYPES {
        let atomic = Atomic::new(info.canonical);
        assert_eq!(
            atomic.is_scalar_type(),
            info.category == PrimitiveCategory::Scalar,
            "scalar predicate disagrees for {}",
            info.canonical
        );
        assert_eq!(atomic.is_numeric_type(), info.numeric);
        assert!(!atomic.is_class_like());
    }
}
