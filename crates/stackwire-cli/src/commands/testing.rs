//! Project fixtures shared by the command tests.

use std::path::Path;

use stackwire_common::types::StackName;
use tempfile::TempDir;

use super::Context;

/// Database password every fixture project starts with.
pub const PASSWORD: &str = "Tr0ub4dor-3";

/// Writes the `dev` stack file with the given database password.
pub fn write_stack(dir: &Path, password: &str) {
    let yaml = format!(
        "encryptionsalt: 6a0e3d94b1f27c58e4a9\n\
         config:\n  \
         shop:frontendPort: 3001\n  \
         shop:backendPort: 3000\n  \
         shop:mongoPort: 27017\n  \
         shop:mongoHost: mongo\n  \
         shop:database: cart\n  \
         shop:nodeEnvironment: development\n  \
         shop:protocol: http://\n  \
         shop:mongoUsername: admin\n  \
         shop:mongoPassword:\n    \
         secure: {password}\n"
    );
    std::fs::write(dir.join("Stackwire.dev.yaml"), yaml).unwrap();
}

/// Creates a `shop` project with a `dev` stack in a temporary directory.
pub fn project(password: &str) -> (TempDir, Context) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Stackwire.yaml"), "name: shop\n").unwrap();
    write_stack(dir.path(), password);
    let ctx = Context {
        cwd: dir.path().to_path_buf(),
        stack: StackName::new("dev").unwrap(),
    };
    (dir, ctx)
}
