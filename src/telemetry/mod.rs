use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Default, Debug, Clone)]
pub struct Builder {
	log_level: Option<String>,
}

pub fn builder() -> Builder {
	Builder::default()
}

impl Builder {
	/// Set the log level on the builder
	pub fn with_log_level(mut self, log_level: &str) -> Self {
		self.log_level = Some(log_level.to_owned());
		self
	}

	/// Build a tracing dispatcher writing compact logs to stderr
	pub fn build(self) -> Result<Box<dyn Subscriber + Send + Sync + 'static>> {
		let level = self.log_level.as_deref().unwrap_or("warn");
		let filter = EnvFilter::try_new(level)
			.with_context(|| format!("invalid log filter '{level}'"))?;
		let layer = tracing_subscriber::fmt::layer()
			.compact()
			.with_ansi(true)
			.with_target(true)
			.with_span_events(FmtSpan::NONE)
			.with_writer(std::io::stderr)
			.with_filter(filter);
		Ok(Box::new(tracing_subscriber::registry().with(layer)))
	}

	/// Install the tracing pipeline for the process
	pub fn init(self) -> Result<()> {
		self.build()?.try_init().context("a tracing subscriber is already installed")
	}
}

#[cfg(test)]
mod tests {
	use tracing::Level;
	use tracing_subscriber::util::SubscriberInitExt;

	use crate::telemetry;

	#[test]
	fn filter_directives_are_validated() {
		assert!(telemetry::builder().with_log_level("debug").build().is_ok());
		assert!(telemetry::builder().with_log_level("filterplan_core=trace,warn").build().is_ok());
		assert!(telemetry::builder().with_log_level("filterplan=loud").build().is_err());
	}

	#[test]
	fn default_level_is_warn() {
		let _enter = telemetry::builder().build().unwrap().set_default();
		assert!(tracing::enabled!(Level::WARN));
		assert!(!tracing::enabled!(Level::INFO));
	}
}
