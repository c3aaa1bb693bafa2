//! Externals plugin: keeps project dependencies out of the bundle.

/// Marks every non-allowlisted dependency as external to the bundle, so it is
/// resolved from `node_modules` at runtime instead of being inlined.
///
/// Always registered, directly after the polyfills.
pub struct ExternalsPlugin {
    externals: Vec<String>,
}

impl ExternalsPlugin {
    pub fn new(externals: Vec<String>) -> Self {
        Self { externals }
    }

    /// One `--external:` flag per external package.
    pub fn bundler_args(&self) -> Vec<String> {
        self.externals
            .iter()
            .map(|name| format!("--external:{name}"))
            .collect()
    }
}
