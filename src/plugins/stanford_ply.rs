use crate::foundation::error::{HikariError, HikariResult};
use crate::geometry::loader::{IoMode, MeshLoader, PlyLoader};
use crate::plugin::{Procedure, ProcedureInputs};
use crate::scene::property::{PropertyKind, PropertySpec, PropertyValue};

const PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new("filepath", PropertyKind::Str),
    PropertySpec::new("io_mode", PropertyKind::Str),
];

/// Replaces the bound mesh with the contents of an ASCII PLY file.
#[derive(Debug, Clone)]
pub struct StanfordPlyProcedure {
    filepath: String,
    io_mode: IoMode,
}

impl Default for StanfordPlyProcedure {
    fn default() -> Self {
        Self {
            filepath: String::new(),
            io_mode: IoMode::Read,
        }
    }
}

impl Procedure for StanfordPlyProcedure {
    fn properties(&self) -> &'static [PropertySpec] {
        PROPERTIES
    }

    fn set_property(&mut self, name: &str, value: &PropertyValue) -> HikariResult<()> {
        match name {
            "filepath" => self.filepath = value.as_str()?.to_owned(),
            "io_mode" => self.io_mode = IoMode::parse(value.as_str()?)?,
            _ => {}
        }
        Ok(())
    }

    fn run(&self, inputs: ProcedureInputs<'_>) -> HikariResult<()> {
        let mesh = inputs
            .mesh
            .ok_or_else(|| HikariError::validation("no mesh bound to 'mesh'"))?;
        if self.filepath.is_empty() {
            return Err(HikariError::validation("'filepath' is not set"));
        }
        let path = inputs.base_dir.join(&self.filepath);
        *mesh = PlyLoader.load(&path, self.io_mode)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugins/stanford_ply.rs"]
mod tests;
