use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors};

/// Per-field error messages shown next to form inputs.
///
/// Errors that do not belong to a single input (e.g. bad credentials)
/// are kept separately as non-field errors.
#[derive(Debug, Default)]
pub struct FormErrors {
	fields: BTreeMap<String, Vec<String>>,
	non_field: Vec<String>,
}

impl FormErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: &str, message: impl Into<String>) {
		self.fields
			.entry(field.to_owned())
			.or_default()
			.push(message.into());
	}

	pub fn add_non_field(&mut self, message: impl Into<String>) {
		self.non_field.push(message.into());
	}

	/// Returns the messages for a field, or an empty slice.
	pub fn get(&self, field: &str) -> &[String] {
		self.fields.get(field).map_or(&[], Vec::as_slice)
	}

	pub fn has(&self, field: &str) -> bool {
		!self.get(field).is_empty()
	}

	pub fn non_field(&self) -> &[String] {
		&self.non_field
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty() && self.non_field.is_empty()
	}

	/// Merges the outcome of a [`validator::Validate::validate`] call.
	pub fn extend(&mut self, result: Result<(), ValidationErrors>) {
		let Err(errors) = result else {
			return;
		};

		for (field, errors) in errors.field_errors() {
			for error in errors {
				self.add(&field.to_string(), message(error));
			}
		}
	}
}

impl From<ValidationErrors> for FormErrors {
	fn from(errors: ValidationErrors) -> Self {
		let mut form = Self::new();
		form.extend(Err(errors));
		form
	}
}

fn message(error: &ValidationError) -> String {
	error
		.message
		.as_ref()
		.map_or_else(|| error.code.to_string(), ToString::to_string)
}
