/// MPRIS media player watcher and control
pub mod mpris;
