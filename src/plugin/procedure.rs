use std::path::Path;

use crate::foundation::error::HikariResult;
use crate::geometry::mesh::Mesh;
use crate::geometry::turbulence::Turbulence;
use crate::geometry::volume::Volume;
use crate::scene::property::{PropertySpec, PropertyValue};

/// Resources bound to a procedure for one `run`.
pub struct ProcedureInputs<'a> {
    pub mesh: Option<&'a mut Mesh>,
    pub volume: Option<&'a mut Volume>,
    pub turbulence: Option<&'a Turbulence>,
    /// Directory relative file paths resolve against.
    pub base_dir: &'a Path,
}

/// Geometry generation and mutation capability, run once during scene construction.
pub trait Procedure: Send + Sync + std::fmt::Debug {
    fn properties(&self) -> &'static [PropertySpec];

    /// Called only with keys and types already checked against [`Procedure::properties`].
    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()>;

    fn run(&self, inputs: ProcedureInputs<'_>) -> HikariResult<()>;
}
