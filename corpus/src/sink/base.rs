use std::future::Future;

use crate::error::CorpusResult;
use crate::types::CorpusRecord;

/// Trait for append-only stores receiving classified articles.
///
/// [`CorpusSink`] implementations receive records strictly in classification order, from a
/// single classifier. Appends are best effort: there is no durability contract beyond the
/// record having been handed to the underlying store.
///
/// The trait also provides an optional [`CorpusSink::shutdown`] method with a default no-op
/// implementation. Override it if the sink needs to flush or release resources once the
/// classifier stops.
pub trait CorpusSink {
    /// Returns the name of the sink.
    fn name() -> &'static str;

    /// Propagates the end of the run to the sink.
    fn shutdown(&self) -> impl Future<Output = CorpusResult<()>> + Send {
        async { Ok(()) }
    }

    /// Appends one record.
    fn append(&self, record: &CorpusRecord) -> impl Future<Output = CorpusResult<()>> + Send;
}
