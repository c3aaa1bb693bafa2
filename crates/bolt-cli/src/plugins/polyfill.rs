//! Polyfill plugin: injects a shim module ahead of user code.

/// Injects one polyfill shim into every bundle.
///
/// One instance per configured polyfill, registered first so shims are
/// evaluated before any user code.
pub struct PolyfillPlugin {
    specifier: String,
}

impl PolyfillPlugin {
    pub fn new(specifier: String) -> Self {
        Self { specifier }
    }

    pub fn bundler_args(&self) -> Vec<String> {
        vec![format!("--inject:{}", self.specifier)]
    }
}
