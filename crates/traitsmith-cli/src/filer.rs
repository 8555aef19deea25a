// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Writes generated sources under an output root.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use tracing::debug;
use traitsmith_core::filer::SourceFiler;

/// A [`SourceFiler`] writing `<root>/<package path>/<Name>.java`.
///
/// Existing files from an earlier run are overwritten; creating the same
/// type twice in one run is an error.
#[derive(Debug)]
pub struct DirectoryFiler {
    root: Utf8PathBuf,
    created: HashSet<String>,
    written: Vec<Utf8PathBuf>,
}

impl DirectoryFiler {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            created: HashSet::new(),
            written: Vec::new(),
        }
    }

    /// Paths of every file created so far, in creation order.
    pub fn written(&self) -> &[Utf8PathBuf] {
        &self.written
    }

    /// Where the file for `qualified_name` lives.
    pub fn path_for(&self, qualified_name: &str) -> Utf8PathBuf {
        let relative = format!("{}.java", qualified_name.replace('.', "/"));
        self.root.join(Utf8Path::new(&relative))
    }
}

impl SourceFiler for DirectoryFiler {
    fn create_source(
        &mut self,
        qualified_name: &str,
        originating: &str,
    ) -> io::Result<Box<dyn Write + '_>> {
        if !self.created.insert(qualified_name.to_string()) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("'{qualified_name}' was already created"),
            ));
        }
        let path = self.path_for(qualified_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        debug!(%path, %originating, "created source file");
        self.written.push(path);
        Ok(Box::new(BufWriter::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn writes_into_package_directories() {
        let temp = TempDir::new().unwrap();
        let mut filer = DirectoryFiler::new(root(&temp));
        {
            let mut out = filer
                .create_source("com.example.GreeterTrait", "com.example.Greeter")
                .unwrap();
            out.write_all(b"package com.example;\n").unwrap();
        }
        let expected = root(&temp).join("com/example/GreeterTrait.java");
        assert_eq!(filer.written(), [expected.clone()]);
        assert_eq!(
            fs::read_to_string(expected).unwrap(),
            "package com.example;\n"
        );
    }

    #[test]
    fn default_package_lands_in_root() {
        let temp = TempDir::new().unwrap();
        let filer = DirectoryFiler::new(root(&temp));
        assert_eq!(filer.path_for("Greeter"), root(&temp).join("Greeter.java"));
    }

    #[test]
    fn second_creation_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut filer = DirectoryFiler::new(root(&temp));
        drop(filer.create_source("app.A", "app.Origin").unwrap());
        let Err(err) = filer.create_source("app.A", "app.Origin") else {
            panic!("duplicate creation should fail");
        };
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }
}
