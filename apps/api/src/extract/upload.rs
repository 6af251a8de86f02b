use axum::extract::Multipart;

use crate::errors::AppError;
use crate::extract::Upload;

/// Multipart field that carries the resume file.
pub const FILE_FIELD: &str = "file";
const RESUME_TEXT_FIELD: &str = "resume_text";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// Everything the page form sends when the user presses Upload.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// `None` when the file input was left empty.
    pub file: Option<Upload>,
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
}

impl UploadForm {
    /// Moves the file out, leaving the draft text fields behind.
    pub fn take_file(&mut self) -> Result<Upload, AppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::Validation("No file was uploaded.".to_string()))
    }
}

fn read_error(e: impl std::fmt::Display) -> AppError {
    AppError::Validation(format!("Could not read the upload: {e}"))
}

/// Reads the whole multipart body: the first `file` field plus the page's
/// draft text fields, if present.
pub async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        match field.name() {
            Some(FILE_FIELD) if form.file.is_none() => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(String::from);
                let data = field.bytes().await.map_err(read_error)?;

                // Browsers send an empty, unnamed part for an untouched file input.
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                form.file = Some(Upload {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some(RESUME_TEXT_FIELD) => {
                form.resume_text = Some(field.text().await.map_err(read_error)?);
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                form.job_description = Some(field.text().await.map_err(read_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Reads the first `file` field of a multipart body into memory.
pub async fn read_upload(multipart: &mut Multipart) -> Result<Upload, AppError> {
    let mut form = read_upload_form(multipart).await?;
    form.take_file()
}
