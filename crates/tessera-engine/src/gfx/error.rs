use std::fmt;

/// GPU resource acquisition failures.
///
/// All of these are fatal at initialization: the renderer cannot run without
/// its pipeline. Compiler diagnostics are kept verbatim in `log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GfxError {
    ShaderCompile { label: String, log: String },
    ShaderValidate { label: String, log: String },
    MissingEntryPoint { label: String, entry: &'static str },
    MissingBinding { label: String, name: String },
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GfxError::ShaderCompile { label, log } => {
                write!(f, "could not compile shader `{label}`\n\n{log}")
            }
            GfxError::ShaderValidate { label, log } => {
                write!(f, "shader `{label}` failed validation\n\n{log}")
            }
            GfxError::MissingEntryPoint { label, entry } => {
                write!(f, "shader `{label}` has no entry point `{entry}`")
            }
            GfxError::MissingBinding { label, name } => {
                write!(f, "shader `{label}` has no resource binding named `{name}`")
            }
        }
    }
}

impl std::error::Error for GfxError {}
