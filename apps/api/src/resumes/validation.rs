use crate::errors::AppError;
use crate::models::resume::ResumeFields;

/// The only rule: a résumé needs a name. Section fields accept any text.
pub fn validate_fields(fields: &ResumeFields) -> Result<(), AppError> {
    if fields.resume_name.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
