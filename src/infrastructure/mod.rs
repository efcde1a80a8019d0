// Infrastructure implementations for shadergraph.

pub mod concurrency;
pub mod index;
pub mod project_loader;
pub mod resolver;
pub mod syntax;

pub use project_loader::ProjectLoader;
pub use resolver::SynSymbolResolver;
pub use syntax::ShaderBody;
