// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared export pipeline for the mapmesh front ends.
//!
//! - [`config`]: export settings, environment loading and validation
//! - [`obj`]: OBJ serializer (the only place axis order is applied)
//! - [`grid_record`]: lossless JSON record of the input grid
//! - [`pipeline`]: image or grid record in, OBJ and grid record out

pub mod config;
pub mod error;
pub mod grid_record;
pub mod obj;
pub mod pipeline;

pub use config::ExportConfig;
pub use error::{ProcessingError, Result};
pub use grid_record::{read_grid_record, write_grid_json, write_grid_record, GridRecord};
pub use obj::{write_obj, AxisOrder, ObjOptions};
pub use pipeline::{convert_image, mesh_for_config, rebuild_from_record, ExportSummary};
