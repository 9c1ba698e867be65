//! System-wide constants and default file names.

/// Project settings file, located at the root of a project directory.
pub const PROJECT_FILE: &str = "Stackwire.yaml";

/// Prefix of per-stack configuration files (`Stackwire.<stack>.yaml`).
pub const STACK_FILE_PREFIX: &str = "Stackwire";

/// Extension shared by project and stack files.
pub const CONFIG_EXTENSION: &str = "yaml";

/// Stack used when none is selected.
pub const DEFAULT_STACK: &str = "dev";

/// Environment variable selecting the active stack.
pub const STACK_ENV: &str = "STACKWIRE_STACK";

/// Environment variable selecting the project directory.
pub const CWD_ENV: &str = "STACKWIRE_CWD";

/// Text shown in place of a secret value.
pub const SECRET_PLACEHOLDER: &str = "[secret]";

/// Domain separator mixed into secret fingerprints.
pub const SECRET_DIGEST_DOMAIN: &str = "stackwire:secret:v2:";

/// Top-level stack file key holding the fingerprint salt.
pub const ENCRYPTION_SALT_KEY: &str = "encryptionsalt";

/// Returns the stack file name for `stack` (e.g. `Stackwire.dev.yaml`).
#[must_use]
pub fn stack_file_name(stack: &str) -> String {
    format!("{STACK_FILE_PREFIX}.{stack}.{CONFIG_EXTENSION}")
}
