mod blend;
mod health;
mod user_attributes;

pub use blend::{PublishBlendRequest, PublishBlendResponse};
pub use health::HealthResponse;
pub use user_attributes::{UpdateUserAttributesRequest, UpdateUserAttributesResponse};
