pub mod document_encoder;
pub mod gemini_client;
pub mod generative;

pub use document_encoder::{encode_document, EncodedPayload};
pub use gemini_client::GeminiClient;
pub use generative::{GenerationRequest, GenerativeModel, Part, ResponseSchema};
