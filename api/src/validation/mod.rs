//! Input validation and sanitization for the TrustNet API.
//!
//! Three pieces:
//!
//! 1. **Extractors** — `ValidatedJson<T>`, a drop-in replacement for
//!    `Json<T>` that sanitizes and validates payloads before business
//!    logic runs.
//! 2. **Validators** — reusable field-level checks.
//! 3. **Sanitizers** — functions to clean and normalize input data.
//!
//! Validation failures report **every** violated field, not just the
//! first, as a 400 with a `VALIDATION_ERROR` code and field-level details.

pub mod extractors;
pub mod requests;
pub mod sanitizers;
pub mod validators;

pub use extractors::{FieldError, Validatable, ValidatedJson, ValidationBuilder};
