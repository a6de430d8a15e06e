use std::collections::BTreeMap;

use crate::foundation::error::{HikariError, HikariResult};
use crate::plugin::procedure::Procedure;
use crate::plugin::shader::Shader;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PluginKind {
    Shader,
    Procedure,
}

impl PluginKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shader => "Shader",
            Self::Procedure => "Procedure",
        }
    }
}

#[derive(Clone, Copy)]
pub enum PluginFactory {
    Shader(fn() -> Box<dyn Shader>),
    Procedure(fn() -> Box<dyn Procedure>),
}

impl PluginFactory {
    pub fn kind(&self) -> PluginKind {
        match self {
            Self::Shader(_) => PluginKind::Shader,
            Self::Procedure(_) => PluginKind::Procedure,
        }
    }
}

impl std::fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PluginFactory::{}", self.kind().as_str())
    }
}

/// A registered implementation.
#[derive(Clone, Copy, Debug)]
pub struct PluginInfo {
    pub name: &'static str,
    pub help: &'static str,
    pub factory: PluginFactory,
}

/// Implementation names to factories, plus the aliases opened by a scene.
#[derive(Clone, Debug, Default)]
pub struct PluginRegistry {
    implementations: BTreeMap<&'static str, PluginInfo>,
    aliases: BTreeMap<String, &'static str>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in implementation.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        for info in crate::plugins::builtins() {
            reg.implementations.insert(info.name, info);
        }
        reg
    }

    pub fn register(&mut self, info: PluginInfo) -> HikariResult<()> {
        if self.implementations.contains_key(info.name) {
            return Err(HikariError::name_conflict(info.name));
        }
        self.implementations.insert(info.name, info);
        Ok(())
    }

    pub fn implementations(&self) -> impl Iterator<Item = &PluginInfo> {
        self.implementations.values()
    }

    /// Binds `alias` to a registered implementation.
    pub fn open(&mut self, alias: &str, implementation: &str) -> HikariResult<PluginKind> {
        let (&name, info) = self
            .implementations
            .get_key_value(implementation)
            .ok_or_else(|| HikariError::unknown_plugin(implementation))?;
        let kind = info.factory.kind();
        self.aliases.insert(alias.to_owned(), name);
        Ok(kind)
    }

    /// Resolves an alias, falling back to a direct implementation name.
    pub fn resolve(&self, name: &str) -> HikariResult<&PluginInfo> {
        let implementation = self.aliases.get(name).copied().unwrap_or(name);
        self.implementations
            .get(implementation)
            .ok_or_else(|| HikariError::unknown_plugin(name))
    }

    pub fn new_shader(&self, name: &str) -> HikariResult<Box<dyn Shader>> {
        match self.resolve(name)?.factory {
            PluginFactory::Shader(make) => Ok(make()),
            PluginFactory::Procedure(_) => Err(HikariError::validation(format!(
                "plugin '{name}' is a Procedure, not a Shader"
            ))),
        }
    }

    pub fn new_procedure(&self, name: &str) -> HikariResult<Box<dyn Procedure>> {
        match self.resolve(name)?.factory {
            PluginFactory::Procedure(make) => Ok(make()),
            PluginFactory::Shader(_) => Err(HikariError::validation(format!(
                "plugin '{name}' is a Shader, not a Procedure"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plugin/registry.rs"]
mod tests;
