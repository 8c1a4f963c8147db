//! Creation-time validation for activity input.
//!
//! Checks run in a fixed order and the first failure short-circuits:
//!
//! 1. title non-empty
//! 2. activity type non-empty and within the character limit
//! 3. start date present and inside the [`DateWindow`]
//! 4. end date, if present, not before the start date
//! 5. description word count
//! 6. image count, then per image: size, then content type

use chrono::NaiveDate;

use crate::config::PolicyConfig;
use crate::error::{Field, ValidationError, ValidationKind};
use crate::model::{ImageUpload, NewActivity};
use crate::period::DateWindow;

/// Input that passed [`validate_for_creation`], with text fields trimmed.
///
/// Images are still raw; the service uploads them before stamping the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedActivity {
    pub title: String,
    pub activity_type: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub images: Vec<ImageUpload>,
    pub unit_id: Option<String>,
}

/// Number of whitespace-separated words in `text`.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True for `image/*` MIME types (parameters such as `; charset` ignored).
#[must_use]
pub fn is_image_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty())
}

/// Validate creation input against `policy`, relative to `today`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, naming the field.
pub fn validate_for_creation(
    input: NewActivity,
    policy: &PolicyConfig,
    today: NaiveDate,
) -> Result<ValidatedActivity, ValidationError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(ValidationError::new(Field::Title, ValidationKind::TitleEmpty));
    }

    let activity_type = input.activity_type.trim();
    if activity_type.is_empty() {
        return Err(ValidationError::new(
            Field::ActivityType,
            ValidationKind::ActivityTypeEmpty,
        ));
    }
    let chars = activity_type.chars().count();
    if chars > policy.max_activity_type_chars {
        return Err(ValidationError::new(
            Field::ActivityType,
            ValidationKind::ActivityTypeTooLong {
                max: policy.max_activity_type_chars,
                chars,
            },
        ));
    }

    let Some(start_date) = input.start_date else {
        return Err(ValidationError::new(
            Field::StartDate,
            ValidationKind::StartDateMissing,
        ));
    };
    let window = DateWindow::around(
        today,
        policy.backdate_grace_days,
        policy.schedule_horizon_days,
    );
    if !window.contains(start_date) {
        return Err(ValidationError::new(
            Field::StartDate,
            ValidationKind::DateOutOfRange {
                date: start_date,
                earliest: window.earliest,
                latest: window.latest,
            },
        ));
    }

    if let Some(end_date) = input.end_date {
        if end_date < start_date {
            return Err(ValidationError::new(
                Field::EndDate,
                ValidationKind::EndBeforeStart {
                    start: start_date,
                    end: end_date,
                },
            ));
        }
    }

    let description = input
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);
    if let Some(text) = &description {
        let words = word_count(text);
        if words > policy.max_description_words {
            return Err(ValidationError::new(
                Field::Description,
                ValidationKind::DescriptionTooLong {
                    max: policy.max_description_words,
                    words,
                },
            ));
        }
    }

    validate_images(&input.images, policy)?;

    Ok(ValidatedActivity {
        title: title.to_string(),
        activity_type: activity_type.to_string(),
        description,
        start_date,
        end_date: input.end_date,
        images: input.images,
        unit_id: input.unit_id,
    })
}

fn validate_images(images: &[ImageUpload], policy: &PolicyConfig) -> Result<(), ValidationError> {
    if images.len() > policy.max_images {
        return Err(ValidationError::new(
            Field::Images,
            ValidationKind::TooManyImages {
                max: policy.max_images,
                count: images.len(),
            },
        ));
    }

    for image in images {
        if image.bytes.len() > policy.max_image_bytes {
            return Err(ValidationError::new(
                Field::Images,
                ValidationKind::ImageTooLarge {
                    filename: image.original_filename.clone(),
                    max_bytes: policy.max_image_bytes,
                    bytes: image.bytes.len(),
                },
            ));
        }
        if !is_image_content_type(&image.content_type) {
            return Err(ValidationError::new(
                Field::Images,
                ValidationKind::InvalidImageType {
                    filename: image.original_filename.clone(),
                    content_type: image.content_type.clone(),
                },
            ));
        }
    }

    Ok(())
}
