//! Well-formedness checks on the extension table.

use std::collections::HashSet;

use sift_core::{classify, extension_table, validate_extension_table, FileCategory};

#[test]
fn no_extension_is_registered_twice() {
    validate_extension_table().unwrap();

    let mut seen = HashSet::new();
    for (_, extensions) in extension_table() {
        for ext in *extensions {
            assert!(seen.insert(*ext), "duplicate extension: {}", ext);
        }
    }
}

#[test]
fn every_registered_extension_classifies_to_its_category() {
    for (category, extensions) in extension_table() {
        for ext in *extensions {
            let name = format!("file.{}", ext);
            assert_eq!(classify(&name), *category, "{}", name);
            let upper = format!("FILE.{}", ext.to_uppercase());
            assert_eq!(classify(&upper), *category, "{}", upper);
        }
    }
}

#[test]
fn extensions_are_lowercase_without_dots() {
    for (_, extensions) in extension_table() {
        for ext in *extensions {
            assert!(!ext.is_empty());
            assert!(!ext.contains('.'));
            assert_eq!(*ext, ext.to_lowercase());
        }
    }
}

#[test]
fn every_known_category_has_extensions() {
    for category in FileCategory::ALL {
        if category == FileCategory::Unknown {
            continue;
        }
        assert!(
            extension_table()
                .iter()
                .any(|(c, exts)| *c == category && !exts.is_empty()),
            "no extensions for {}",
            category
        );
    }
}
