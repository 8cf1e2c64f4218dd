pub mod error;
pub mod state;
pub mod seed;
pub mod graph;
pub mod topology;
pub mod laplacian;
pub mod metrics;
pub mod resistance;
pub mod drift;
pub mod integrators;
pub mod path;
pub mod solver;
pub mod reference;

// Core types
pub type F = f64;
pub use state::{State, Time};
pub use seed::SeedStream;
pub use error::{ConfigurationError, SimulationError, ReferenceUnavailable};

// Graphs and spectra
pub use graph::{Graph, Edge};
pub use topology::{Topology, TopologyKind, EdgeWeights};
pub use laplacian::{Laplacian, Spectrum};
pub use metrics::GraphMetrics;

// Dynamics
pub use resistance::{ResistanceKind, ResistanceField};
pub use drift::{Drift, LaplacianDiffusion};
pub use integrators::{OdeIntegrator, ForwardEuler, Heun, RungeKutta4};
pub use path::{Trajectory, StepSpec};
pub use solver::Solver;
pub use reference::SpectralReference;

/// Absolute tolerance on the Laplacian null space.
pub const ZERO_EIGENVALUE_TOL: F = 1e-9;
