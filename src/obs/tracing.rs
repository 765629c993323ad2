// crates.io
use tracing::{Instrument, Span, instrument::Instrumented};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
// self
use crate::{_prelude::*, obs::Operation};

const DEFAULT_FILTER: &str = "info";

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. When a global subscriber is already
/// installed it stays in place and the failure is reported through it at debug level.
pub fn init_tracing() {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
	let subscriber =
		tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer());

	if let Err(e) = subscriber.try_init() {
		tracing::debug!(error = %e, "Global tracing subscriber already installed.");
	}
}

/// A span builder used around upstream operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	span: Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(op: Operation, stage: &'static str) -> Self {
		let span = tracing::info_span!("twitch_pfp_proxy.op", op = op.as_str(), stage);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		fut.instrument(self.span.clone())
	}
}
