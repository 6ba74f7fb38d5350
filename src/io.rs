//! JSON instance loader and result dumper.
//!
//! # Formats
//!
//! Input document:
//!
//! ```json
//! {
//!   "instance_id": "line-1",
//!   "task_list": [
//!     {"task_id": "A", "m": 1.0, "s": 0.1, "out_line_cost": 5.0, "predecessor_set": []}
//!   ],
//!   "q": 1.0,
//!   "c": 1.0
//! }
//! ```
//!
//! Result document: the same fields plus `station_list`
//! (`station_id`, ordered `task_list`) and `total_unit_cost`. `q` is
//! written back as `1/T`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Instance, Station, Task};

/// Persisted problem instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDocument {
    pub instance_id: String,
    pub task_list: Vec<Task>,
    pub q: f64,
    pub c: f64,
}

/// Persisted balancing result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDocument {
    pub instance_id: String,
    pub task_list: Vec<Task>,
    pub station_list: Vec<StationRecord>,
    pub q: f64,
    pub c: f64,
    pub total_unit_cost: f64,
}

/// Persisted station: ID and assigned task IDs in assignment order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub station_id: String,
    pub task_list: Vec<String>,
}

impl InstanceDocument {
    /// Validates the document and builds the instance.
    pub fn into_instance(self) -> Result<Instance> {
        Instance::new(self.instance_id, self.task_list, self.q, self.c)
    }
}

impl From<&Station> for StationRecord {
    fn from(station: &Station) -> Self {
        Self {
            station_id: station.id.clone(),
            task_list: station
                .assigned_task_ids()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<&Instance> for ResultDocument {
    fn from(instance: &Instance) -> Self {
        Self {
            instance_id: instance.id.clone(),
            task_list: instance.graph().tasks().to_vec(),
            station_list: instance.stations().iter().map(StationRecord::from).collect(),
            q: instance.production_rate(),
            c: instance.station_cost(),
            total_unit_cost: instance.total_unit_cost(),
        }
    }
}

/// Parses an instance from a JSON string.
pub fn instance_from_str(json: &str) -> Result<Instance> {
    let doc: InstanceDocument = serde_json::from_str(json)?;
    doc.into_instance()
}

/// Reads an instance from JSON.
pub fn read_instance<R: Read>(reader: R) -> Result<Instance> {
    let doc: InstanceDocument = serde_json::from_reader(reader)?;
    doc.into_instance()
}

/// Reads an instance from a JSON file.
pub fn read_instance_file(path: impl AsRef<Path>) -> Result<Instance> {
    read_instance(BufReader::new(File::open(path)?))
}

/// Writes the result document of `instance` as pretty JSON.
pub fn write_result<W: Write>(instance: &Instance, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &ResultDocument::from(instance))?;
    Ok(())
}

/// Writes the result document of `instance` to a file.
pub fn write_result_file(instance: &Instance, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_result(instance, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Serializes the result document of `instance` to a pretty JSON string.
pub fn result_to_string(instance: &Instance) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ResultDocument::from(instance))?)
}
