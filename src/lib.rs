pub mod config;
pub mod energy;
pub mod error;
pub mod finite_size;
pub mod lattice;
pub mod metropolis;
pub mod observables;
pub mod report;
pub mod scheduler;
pub mod sink;
pub mod utils;

pub use config::{DeltaMode, LatticePolicy, SimConfig, SimulationParameters, TemperatureSchedule};
pub use error::IsingError;
pub use lattice::{Lattice, LatticeSnapshot, NeighborSet, Spin};
pub use metropolis::StepInfo;
pub use observables::{ObservableAccumulator, ObservableSeries, TemperaturePoint};
pub use scheduler::{Phase, Scheduler};
pub use sink::{ChannelSink, DropPolicy, NullSink, SinkEvent, SnapshotReceiver, VisualizationSink};
