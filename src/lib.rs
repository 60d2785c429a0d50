//! # routegraph
//!
//! **Dead-code and unused-route analysis** for convention-routed
//! JavaScript/TypeScript projects (Next.js-style app and pages routers).
//!
//! routegraph builds a module graph from real import statements, walks it
//! from the files the framework invokes by convention, and reports what
//! nothing reaches: orphan files, import cycles, and API endpoints no call
//! site in the repository references.
//!
//! ## Pipeline
//!
//! 1. **Locate** - enumerate project files through include/exclude globs
//! 2. **Extract** - parse each script file's imports and exports (OXC)
//! 3. **Link** - resolve specifiers (tsconfig aliases, relative paths) and
//!    build the dependency multigraph in two phases
//! 4. **Walk** - reachability from convention entry points, cycle detection
//! 5. **Match** - declared API routes against outbound call sites
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routegraph::{run_analysis, AnalyzerConfig};
//!
//! let cfg = AnalyzerConfig::new("/path/to/project");
//! let report = run_analysis(&cfg).unwrap();
//! for file in &report.files {
//!     println!("{} -> {:?} ({}%)", file.path, file.classification, file.confidence);
//! }
//! ```
//!
//! A run fails only when the project root itself cannot be read; every
//! per-file failure (unreadable file, parse failure, malformed tsconfig)
//! is downgraded to a warning on the report.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod locator;
pub mod types;

pub use analyzer::run_analysis;
pub use config::{AnalyzerConfig, ConfidenceKnobs, RouterMode};
pub use error::{AnalyzeError, Result};
pub use types::{
    AnalysisReport, ApiEndpoint, ComponentGraph, ComponentNode, ComponentRole, DependencyEdge,
    EdgeKind, EndpointUsage, ExportInfo, ExportKind, FileClassification, FileReport, GraphStats,
    ImportInfo, ImportedName, Reference, ScannedFile,
};
