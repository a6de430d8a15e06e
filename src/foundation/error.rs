use std::path::{Path, PathBuf};

/// Convenience result type used across Hikari.
pub type HikariResult<T> = Result<T, HikariError>;

/// Top-level error taxonomy used by scene construction and rendering.
#[derive(thiserror::Error, Debug)]
pub enum HikariError {
    /// An entity name was reused. Names share one namespace across every entity kind.
    #[error("name conflict: entity '{0}' already exists")]
    NameConflict(String),

    /// A property key is not recognized by the entity (or plugin) it was set on.
    #[error("unknown property: '{property}' on '{entity}'")]
    UnknownProperty {
        /// Entity the property was set on.
        entity: String,
        /// Rejected property key.
        property: String,
    },

    /// A plugin alias or implementation name was never registered.
    #[error("unknown plugin: '{0}'")]
    UnknownPlugin(String),

    /// An entity name was referenced before it was created.
    #[error("entity not found: '{0}'")]
    NotFound(String),

    /// A procedure failed while running; the plugin's error is kept as the source.
    #[error("procedure error: '{procedure}' failed")]
    Procedure {
        /// Name of the procedure entity that failed.
        procedure: String,
        /// Underlying plugin failure.
        #[source]
        source: Box<HikariError>,
    },

    /// A render was requested without the bindings it needs.
    #[error("scene incomplete: {0}")]
    SceneIncomplete(String),

    /// File IO failed while loading geometry, textures or persisting a framebuffer.
    #[error("io error: {context} '{}'", path.display())]
    Io {
        /// What was being attempted.
        context: String,
        /// File involved.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid user-provided data (property types, degenerate transforms, settings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure inside the render pipeline itself.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HikariError {
    /// Build a [`HikariError::NameConflict`] value.
    pub fn name_conflict(name: impl Into<String>) -> Self {
        Self::NameConflict(name.into())
    }

    /// Build a [`HikariError::UnknownProperty`] value.
    pub fn unknown_property(entity: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            entity: entity.into(),
            property: property.into(),
        }
    }

    /// Build a [`HikariError::UnknownPlugin`] value.
    pub fn unknown_plugin(name: impl Into<String>) -> Self {
        Self::UnknownPlugin(name.into())
    }

    /// Build a [`HikariError::NotFound`] value.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Wrap a plugin failure as a [`HikariError::Procedure`].
    pub fn procedure(procedure: impl Into<String>, source: HikariError) -> Self {
        Self::Procedure {
            procedure: procedure.into(),
            source: Box::new(source),
        }
    }

    /// Build a [`HikariError::SceneIncomplete`] value.
    pub fn scene_incomplete(msg: impl Into<String>) -> Self {
        Self::SceneIncomplete(msg.into())
    }

    /// Build a [`HikariError::Io`] value.
    pub fn io(context: impl Into<String>, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            path: path.to_path_buf(),
            source,
        }
    }

    /// Build a [`HikariError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HikariError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
