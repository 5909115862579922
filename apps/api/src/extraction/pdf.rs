use super::ContainerError;

pub(crate) fn extract(bytes: &[u8]) -> Result<String, ContainerError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ContainerError::Pdf(e.to_string()))
}
