// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Output sinks for generated files.
//!
//! The generator writes exactly one file per [`SourceFiler::create_source`]
//! call and closes it by dropping the writer. Files are rendered fully in
//! memory first, so a sink never sees a partial file.

use ecow::EcoString;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Opens output files for generated types.
pub trait SourceFiler {
    /// Opens a fresh file for the type `qualified_name`, generated on behalf
    /// of the declaration `originating`.
    fn create_source(
        &mut self,
        qualified_name: &str,
        originating: &str,
    ) -> io::Result<Box<dyn Write + '_>>;
}

/// Keeps generated files in memory, keyed by qualified type name.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiler {
    files: BTreeMap<EcoString, Vec<u8>>,
}

impl MemoryFiler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a generated file, if it exists and is UTF-8.
    #[must_use]
    pub fn get(&self, qualified_name: &str) -> Option<&str> {
        self.files
            .get(qualified_name)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Names of all generated files, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(EcoString::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceFiler for MemoryFiler {
    fn create_source(
        &mut self,
        qualified_name: &str,
        _originating: &str,
    ) -> io::Result<Box<dyn Write + '_>> {
        if self.files.contains_key(qualified_name) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("'{qualified_name}' was already created"),
            ));
        }
        let buffer = self.files.entry(qualified_name.into()).or_default();
        Ok(Box::new(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_written_files() {
        let mut filer = MemoryFiler::new();
        {
            let mut file = filer.create_source("app.Foo", "app.Foo").unwrap();
            file.write_all(b"class Foo {}").unwrap();
        }
        assert_eq!(filer.get("app.Foo"), Some("class Foo {}"));
        assert_eq!(filer.names().collect::<Vec<_>>(), vec!["app.Foo"]);
    }

    #[test]
    fn refuses_to_recreate_a_file() {
        let mut filer = MemoryFiler::new();
        drop(filer.create_source("app.Foo", "app.Foo").unwrap());
        let err = filer.create_source("app.Foo", "app.Foo").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }
}
