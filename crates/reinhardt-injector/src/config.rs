//! Injector behavior flags.
//!
//! Configuration only tunes how the engine behaves. It never wires components:
//! registrations and bindings always come from code.
//!
//! ```toml
//! [injector]
//! auto_add = true
//! auto_bind_interfaces = false
//! strict_many = false
//! max_depth = 100
//! ```

use crate::cycle_detection::MAX_RESOLUTION_DEPTH;
use crate::error::{DiError, DiResult};
use serde::{Deserialize, Serialize};

/// Behavior flags of an [`Injector`](crate::Injector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorConfig {
	/// Lookups implicitly register missing types instead of failing.
	pub auto_add: bool,

	/// Registering a type also binds every interface it declares to it.
	pub auto_bind_interfaces: bool,

	/// `get_components` fails on unregistered types instead of skipping them
	/// when auto-add is off.
	pub strict_many: bool,

	/// Maximum construction depth.
	pub max_depth: usize,
}

impl Default for InjectorConfig {
	fn default() -> Self {
		Self {
			auto_add: true,
			auto_bind_interfaces: false,
			strict_many: false,
			max_depth: MAX_RESOLUTION_DEPTH,
		}
	}
}

#[derive(Deserialize)]
struct ConfigFile {
	#[serde(default)]
	injector: InjectorConfig,
}

impl InjectorConfig {
	/// Creates a configuration builder.
	pub fn builder() -> InjectorConfigBuilder {
		InjectorConfigBuilder::default()
	}

	/// Parses the `[injector]` table of a TOML document.
	///
	/// Missing keys (or a missing table) fall back to the defaults.
	///
	/// ```
	/// use reinhardt_injector::InjectorConfig;
	///
	/// let config = InjectorConfig::from_toml_str("[injector]\nauto_add = false\n").unwrap();
	/// assert!(!config.auto_add);
	/// assert_eq!(config.max_depth, 100);
	/// ```
	pub fn from_toml_str(source: &str) -> DiResult<Self> {
		let file: ConfigFile = toml::from_str(source)?;
		file.injector.validate()?;
		Ok(file.injector)
	}

	/// Checks value ranges.
	pub fn validate(&self) -> DiResult<()> {
		if self.max_depth == 0 {
			return Err(DiError::Config(
				"max_depth must be greater than zero".to_string(),
			));
		}
		Ok(())
	}
}

/// Builder for [`InjectorConfig`].
#[derive(Debug, Default)]
pub struct InjectorConfigBuilder {
	config: InjectorConfig,
}

impl InjectorConfigBuilder {
	/// Sets [`InjectorConfig::auto_add`].
	pub fn auto_add(mut self, enabled: bool) -> Self {
		self.config.auto_add = enabled;
		self
	}

	/// Sets [`InjectorConfig::auto_bind_interfaces`].
	pub fn auto_bind_interfaces(mut self, enabled: bool) -> Self {
		self.config.auto_bind_interfaces = enabled;
		self
	}

	/// Sets [`InjectorConfig::strict_many`].
	pub fn strict_many(mut self, enabled: bool) -> Self {
		self.config.strict_many = enabled;
		self
	}

	/// Sets [`InjectorConfig::max_depth`].
	pub fn max_depth(mut self, depth: usize) -> Self {
		self.config.max_depth = depth;
		self
	}

	/// Builds the configuration.
	pub fn build(self) -> InjectorConfig {
		self.config
	}
}
