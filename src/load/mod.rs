//! Load pipeline: (re)create every table and view in dependency order and
//! populate the tables from the two input files.

mod object;
pub mod populate;

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::schema::DependencyResolver;

pub use object::{Object, SchemaObject, Table, View};

/// What to do when an input file is missing or unreadable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingInputPolicy {
    /// Report it and leave the table empty
    #[default]
    Warn,
    /// Abort the run
    Fail,
}

/// Input files read by the population steps
#[derive(Debug, Clone)]
pub struct Inputs {
    /// `tld\tdescription` lines
    pub mapping_file: PathBuf,
    /// `position\tdomain\ttld1[\ttld2]` lines
    pub urls_file: PathBuf,
    pub missing_input: MissingInputPolicy,
}

/// Rows inserted per table, in load order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    pub tables: Vec<(&'static str, u64)>,
    pub views: Vec<&'static str>,
}

impl LoadSummary {
    pub fn rows(&self, table: &str) -> Option<u64> {
        self.tables
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, rows)| *rows)
    }
}

pub struct LoadPipeline<'a> {
    gateway: &'a mut Gateway,
    inputs: Inputs,
}

impl<'a> LoadPipeline<'a> {
    pub fn new(gateway: &'a mut Gateway, inputs: Inputs) -> Self {
        Self { gateway, inputs }
    }

    /// Objects in the order they are created
    pub fn objects() -> Result<Vec<Object>> {
        let order = DependencyResolver::new().load_order()?;
        Ok(order.into_iter().filter_map(Object::from_name).collect())
    }

    /// Recreate and populate everything. The first failure stops the run;
    /// objects handled before it stay as they are.
    pub fn run(&mut self) -> Result<LoadSummary> {
        let start = Instant::now();
        let mut summary = LoadSummary::default();

        for object in Self::objects()? {
            object.initialise(self.gateway)?;

            match object {
                Object::Table(_) => {
                    let rows = object.populate(self.gateway, &self.inputs)?;
                    info!(table = object.name(), rows, "loaded");
                    summary.tables.push((object.name(), rows));
                }
                Object::View(_) => {
                    info!(view = object.name(), "created");
                    summary.views.push(object.name());
                }
            }
        }

        info!(
            "Loaded {} tables and {} views in {:.1}s",
            summary.tables.len(),
            summary.views.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(summary)
    }
}
