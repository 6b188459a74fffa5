//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ModelGateway` - the remote multimodal model provider

mod model_gateway;

pub use model_gateway::{
    ContentPart, GatewayError, GatewayInfo, GenerationRequest, GenerationResponse, ModelGateway,
};
