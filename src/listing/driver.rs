//! Lister - drives a listing run over the requested paths

use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::error::ListError;
use crate::store::Store;

use super::config::ListConfig;
use super::invoker::Traversal;
use super::policy::AggregationPolicy;
use super::sink::UnitSink;
use super::types::OutputUnit;

/// Lists paths one at a time and feeds their entries to the aggregation
/// policy selected by [`ListConfig::streaming`].
pub struct Lister {
    store: Arc<dyn Store>,
    config: ListConfig,
}

impl Lister {
    pub fn new(store: Arc<dyn Store>, config: ListConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// List every path in order, emitting output units into `sink`.
    ///
    /// Stops at the first error. Units already emitted (streaming only) stay
    /// emitted; a batch run that fails emits nothing.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(paths = paths.len(), streaming = self.config.streaming)
    )]
    pub async fn run<S: UnitSink + ?Sized>(
        &self,
        paths: &[String],
        sink: &mut S,
        cancel: &CancelToken,
    ) -> Result<(), ListError> {
        let mut policy = if self.config.streaming {
            AggregationPolicy::streaming()
        } else {
            AggregationPolicy::batch(paths)
        };
        let options = self.config.ls_options();

        for (index, path) in paths.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(ListError::Cancelled);
            }

            tracing::debug!(path = %path, "listing path");
            let mut traversal =
                Traversal::spawn(Arc::clone(&self.store), path, options, cancel.clone());
            let mut count = 0usize;
            while let Some(entry) = traversal.next().await {
                count += 1;
                policy.on_entry(path, entry, sink)?;
            }
            traversal.finish().await?;

            tracing::debug!(path = %path, entries = count, "listed path");
            policy.on_group_complete(index, path);
        }

        policy.on_run_complete(sink)
    }

    /// Run and collect every emitted unit, alongside the terminal result.
    pub async fn collect(
        &self,
        paths: &[String],
        cancel: &CancelToken,
    ) -> (Vec<OutputUnit>, Result<(), ListError>) {
        let mut units = Vec::new();
        let result = self.run(paths, &mut units, cancel).await;
        (units, result)
    }
}
