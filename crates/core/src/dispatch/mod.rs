mod scheduler;

pub use scheduler::{
    DispatchOutcome, DispatchReceipt, DispatchScheduler, DispatchStatus, DispatchSummary,
};
