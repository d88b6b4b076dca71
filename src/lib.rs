// Ducky keyboard alert light
// Alertmanager webhook receiver, alert counter and the backlight signal loop

pub mod alerts;
pub mod signal;
pub mod webhook;

pub use alerts::{AlertBatch, AlertCounter, AlertStatus, BatchOutcome};
pub use signal::SignalLoop;
pub use webhook::router;
