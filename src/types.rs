/// What a single failed export does to the rest of the batch.
///
/// `AbortBatch` propagates the first error and abandons the run, so a
/// completed run is known to have attempted everything. `SkipAndRecord`
/// logs the failure, drops that notebook's record, and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FailureMode {
    #[value(name = "abort-batch")]
    AbortBatch,
    #[value(name = "skip-and-record")]
    SkipAndRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}
