/// terminal logging for the example runner
pub mod logger;
