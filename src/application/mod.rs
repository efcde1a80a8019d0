use crate::config::DiscoveryConfig;
use crate::domain::error::DiscoveryError;
use crate::domain::function::ShaderProgram;
use crate::domain::identity::FunctionIdentity;
use crate::domain::session;
use crate::ports::{ShaderBackend, SymbolResolver};
use rayon::prelude::*;

/// Discovers shader programs and hands them to a backend.
pub struct DiscoverUsecase<'a, R> {
    pub resolver: &'a R,
    pub config: &'a DiscoveryConfig,
}

impl<'a, R: SymbolResolver> DiscoverUsecase<'a, R> {
    pub fn discover(&self, root: &FunctionIdentity) -> Result<ShaderProgram<R::Body>, DiscoveryError> {
        session::discover_program(self.resolver, &self.config.markers, root)
    }

    /// One independent session per root. Results keep the order of `roots`.
    pub fn discover_all(&self, roots: &[FunctionIdentity]) -> Vec<Result<ShaderProgram<R::Body>, DiscoveryError>>
    where
        R: Sync,
        R::Body: Send,
    {
        if self.config.parallel {
            roots.par_iter().map(|root| self.discover(root)).collect()
        } else {
            roots.iter().map(|root| self.discover(root)).collect()
        }
    }

    /// Discover every root and emit the programs with `backend`.
    /// The first discovery error aborts the run.
    pub fn run(&self, roots: &[FunctionIdentity], backend: &dyn ShaderBackend<R::Body>) -> anyhow::Result<String>
    where
        R: Sync,
        R::Body: Send,
    {
        let programs = self
            .discover_all(roots)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        backend.emit_all(&programs)
    }
}
