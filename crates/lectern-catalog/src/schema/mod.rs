//! Form schemas.
//!
//! Validation rules applied to user input before anything is sent.

mod errors;
mod forms;

pub use errors::ValidationErrors;
pub use forms::{is_valid_email, ProfileEditForm, SignInForm, SignUpForm};
