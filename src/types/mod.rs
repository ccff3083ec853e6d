//! Data model: provider identity, model capabilities, temperature
//! constraints, and the generation request/response boundary types.

pub mod capabilities;
pub mod common;
pub mod response;
pub mod temperature;

pub use capabilities::ModelCapabilities;
pub use common::{ProviderType, ToolModelCategory};
pub use response::{DEFAULT_TEMPERATURE, GenerationRequest, ModelResponse, TokenUsage};
pub use temperature::TemperatureConstraint;
