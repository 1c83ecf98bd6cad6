//! API routes.

pub mod generations;
pub mod health;

pub use generations::{
    generate_handler, get_generation_handler, list_generations_handler, GenerateResponse,
    ListQuery,
};
pub use health::health_routes;
