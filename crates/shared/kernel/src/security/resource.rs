use std::borrow::Cow;

#[rsvp_derive::rsvp_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Record key validation for ids supplied by clients.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Returns the bare record key for `expected_table`.
    ///
    /// Accepts either `key` or `table:key`. Only an exact `expected_table:`
    /// prefix is stripped; any other colon is part of the key.
    ///
    /// # Errors
    /// [`ResourceGuardError::Validation`] when the key is empty.
    pub fn key<I, T>(id: I, expected_table: T) -> Result<String, ResourceGuardError>
    where
        I: AsRef<str>,
        T: AsRef<str>,
    {
        let id = id.as_ref().trim();
        let table_ref = expected_table.as_ref();

        let key = id
            .strip_prefix(table_ref)
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(id);

        if key.is_empty() {
            return Err(ResourceGuardError::Validation {
                message: "Record key is empty".into(),
                context: Some(table_ref.to_owned().into()),
            });
        }
        Ok(key.to_owned())
    }
}
